//! # excubiae CLI Entry Point
//!
//! Assembles subcommands, installs logging, and prints each report as JSON.

use clap::Parser;

/// Excubiae offline tooling.
///
/// Builds allowlist trees, binds Semaphore scopes, and decodes the
/// configuration bytes appended to policy and checker clones.
#[derive(Parser, Debug)]
#[command(name = "excubiae", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Allowlist Merkle trees.
    Merkle(excubiae_cli::merkle::MerkleArgs),
    /// Semaphore scope binding.
    Scope(excubiae_cli::scope::ScopeArgs),
    /// Decode appended configuration bytes.
    DecodeConfig(excubiae_cli::config::DecodeConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let report = match cli.command {
        Commands::Merkle(args) => excubiae_cli::merkle::run(args)?,
        Commands::Scope(args) => serde_json::to_value(excubiae_cli::scope::run(args)?)?,
        Commands::DecodeConfig(args) => excubiae_cli::config::run(args)?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
