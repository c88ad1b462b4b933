//! A demo consumer: a ballot that gates registration, voting, and reward
//! eligibility behind policies. The ballot is the policies' target.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use excubiae_checker::erc721::token_evidence;
use excubiae_checker::memory::InMemoryNft;
use excubiae_checker::{
    AdvancedErc721Bindings, AdvancedErc721Checker, AdvancedErc721Config, BaseErc721Checker,
    BaseErc721Config, CheckerError, IntoAdvancedCheckerHandle, IntoCheckerHandle, NftRegistry,
};
use excubiae_clone::{Factory, Instance};
use excubiae_core::{Address, Bound, Phase, Word};
use excubiae_policy::{
    AdvancedPolicy, AdvancedPolicyConfig, BasePolicy, BasePolicyConfig, PhaseFlags, Policy,
    PolicyError,
};
use thiserror::Error;

const OPTIONS: u8 = 2;

#[derive(Error, Debug, PartialEq, Eq)]
enum VotingError {
    #[error("not registered")]
    NotRegistered,
    #[error("already voted")]
    AlreadyVoted,
    #[error("not voted")]
    NotVoted,
    #[error("invalid option")]
    InvalidOption,
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

// ── Single-phase ballot ────────────────────────────────────────────────

struct BaseVoting {
    address: Address,
    policy: Instance<BasePolicy>,
    voted: BTreeSet<Address>,
    counts: BTreeMap<u8, u64>,
}

impl BaseVoting {
    fn register(&mut self, voter: &Address, token_id: Word) -> Result<(), VotingError> {
        self.policy
            .logic_mut()
            .map_err(PolicyError::from)?
            .enforce(&self.address, voter, &token_evidence(token_id))?;
        Ok(())
    }

    fn registered(&self, voter: &Address) -> bool {
        self.policy
            .logic()
            .map(|p| p.enforced(&self.address, voter))
            .unwrap_or(false)
    }

    fn vote(&mut self, voter: &Address, option: u8) -> Result<(), VotingError> {
        if !self.registered(voter) {
            return Err(VotingError::NotRegistered);
        }
        if self.voted.contains(voter) {
            return Err(VotingError::AlreadyVoted);
        }
        if option >= OPTIONS {
            return Err(VotingError::InvalidOption);
        }
        self.voted.insert(*voter);
        *self.counts.entry(option).or_default() += 1;
        Ok(())
    }
}

struct Tokens {
    signup: Arc<InMemoryNft>,
    reward: Arc<InMemoryNft>,
    signup_bound: Bound<dyn NftRegistry>,
    reward_bound: Bound<dyn NftRegistry>,
}

fn tokens() -> Tokens {
    let signup = Arc::new(InMemoryNft::new());
    let reward = Arc::new(InMemoryNft::new());
    let signup_shared: Arc<dyn NftRegistry> = signup.clone();
    let reward_shared: Arc<dyn NftRegistry> = reward.clone();
    Tokens {
        signup_bound: Bound::new(Address::derive(b"signup-nft"), signup_shared),
        reward_bound: Bound::new(Address::derive(b"reward-nft"), reward_shared),
        signup,
        reward,
    }
}

fn deployer() -> Address {
    Address::derive(b"deployer")
}

fn base_voting(tokens: &Tokens) -> BaseVoting {
    let checker = Factory::<BaseErc721Checker>::for_logic()
        .deploy(
            BaseErc721Config {
                nft: tokens.signup_bound.address(),
            },
            tokens.signup_bound.clone(),
        )
        .unwrap()
        .into_handle();
    let mut policy = Factory::<BasePolicy>::for_logic()
        .deploy(
            BasePolicyConfig {
                owner: deployer(),
                checker: checker.address(),
            },
            checker,
        )
        .unwrap();
    let address = Address::derive(b"base-voting");
    policy
        .logic_mut()
        .unwrap()
        .set_target(&deployer(), address)
        .unwrap();
    BaseVoting {
        address,
        policy,
        voted: BTreeSet::new(),
        counts: BTreeMap::new(),
    }
}

#[test]
fn test_base_voting_flow() {
    let tokens = tokens();
    let voter = Address::derive(b"voter");
    let token_id = tokens.signup.mint(voter);
    let mut ballot = base_voting(&tokens);

    assert!(!ballot.registered(&voter));
    assert_eq!(ballot.vote(&voter, 0), Err(VotingError::NotRegistered));

    // Someone else's token.
    let thief = Address::derive(b"thief");
    assert_eq!(
        ballot.register(&thief, token_id),
        Err(VotingError::Policy(PolicyError::UnsuccessfulCheck { subject: thief }))
    );
    // A token that does not exist.
    assert!(matches!(
        ballot.register(&voter, Word::from_u64(42)),
        Err(VotingError::Policy(PolicyError::Check(CheckerError::Registry(_))))
    ));

    ballot.register(&voter, token_id).unwrap();
    assert!(ballot.registered(&voter));
    assert_eq!(
        ballot.register(&voter, token_id),
        Err(VotingError::Policy(PolicyError::AlreadyEnforced { subject: voter }))
    );

    assert_eq!(ballot.vote(&voter, 3), Err(VotingError::InvalidOption));
    ballot.vote(&voter, 1).unwrap();
    assert_eq!(ballot.vote(&voter, 1), Err(VotingError::AlreadyVoted));
    assert_eq!(ballot.counts.get(&1), Some(&1));
}

#[test]
fn test_policy_rejects_direct_enforcement_by_voter() {
    let tokens = tokens();
    let voter = Address::derive(b"voter");
    let token_id = tokens.signup.mint(voter);
    let mut ballot = base_voting(&tokens);
    let policy = ballot.policy.logic_mut().unwrap();
    assert_eq!(
        policy.enforce(&voter, &voter, &token_evidence(token_id)),
        Err(PolicyError::TargetOnly { caller: voter })
    );
}

// ── Three-phase ballot ─────────────────────────────────────────────────

struct AdvancedVoting {
    address: Address,
    policy: Instance<AdvancedPolicy>,
    counts: BTreeMap<u8, u64>,
}

impl AdvancedVoting {
    fn policy(&mut self) -> Result<&mut AdvancedPolicy, VotingError> {
        Ok(self.policy.logic_mut().map_err(PolicyError::from)?)
    }

    fn record(&self, voter: &Address) -> excubiae_policy::AdvancedRecord {
        self.policy
            .logic()
            .map(|p| p.enforced(&self.address, voter))
            .unwrap_or_default()
    }

    fn register(&mut self, voter: &Address, token_id: Word) -> Result<(), VotingError> {
        let address = self.address;
        self.policy()?
            .enforce(&address, voter, &token_evidence(token_id), Phase::Pre)?;
        Ok(())
    }

    fn vote(&mut self, voter: &Address, option: u8) -> Result<(), VotingError> {
        if !self.record(voter).pre_done {
            return Err(VotingError::NotRegistered);
        }
        if option >= OPTIONS {
            return Err(VotingError::InvalidOption);
        }
        let address = self.address;
        self.policy()?
            .enforce(&address, voter, &[], Phase::Main)?;
        *self.counts.entry(option).or_default() += 1;
        Ok(())
    }

    fn eligible(&mut self, voter: &Address, token_id: Word) -> Result<(), VotingError> {
        let record = self.record(voter);
        if !record.pre_done {
            return Err(VotingError::NotRegistered);
        }
        if record.main_count == 0 {
            return Err(VotingError::NotVoted);
        }
        let address = self.address;
        self.policy()?
            .enforce(&address, voter, &token_evidence(token_id), Phase::Post)?;
        Ok(())
    }
}

fn advanced_voting(tokens: &Tokens) -> AdvancedVoting {
    let base = Factory::<BaseErc721Checker>::for_logic()
        .deploy(
            BaseErc721Config {
                nft: tokens.signup_bound.address(),
            },
            tokens.signup_bound.clone(),
        )
        .unwrap()
        .into_handle();
    let config = AdvancedErc721Config {
        signup_nft: tokens.signup_bound.address(),
        reward_nft: tokens.reward_bound.address(),
        base_checker: base.address(),
        min_balance: Word::from_u64(1),
        min_token_id: Word::ZERO,
        max_token_id: Word::from_u64(10),
    };
    let checker = Factory::<AdvancedErc721Checker>::for_logic()
        .deploy(
            config,
            AdvancedErc721Bindings {
                signup_nft: tokens.signup_bound.clone(),
                reward_nft: tokens.reward_bound.clone(),
                base_checker: base,
            },
        )
        .unwrap()
        .into_advanced_handle();
    let mut policy = Factory::<AdvancedPolicy>::for_logic()
        .deploy(
            AdvancedPolicyConfig {
                owner: deployer(),
                checker: checker.address(),
                flags: PhaseFlags {
                    skip_pre: false,
                    skip_post: false,
                    allow_multiple_main: true,
                },
            },
            checker,
        )
        .unwrap();
    let address = Address::derive(b"advanced-voting");
    policy
        .logic_mut()
        .unwrap()
        .set_target(&deployer(), address)
        .unwrap();
    AdvancedVoting {
        address,
        policy,
        counts: BTreeMap::new(),
    }
}

#[test]
fn test_advanced_voting_lifecycle() {
    let tokens = tokens();
    let voter = Address::derive(b"voter");
    let token_id = tokens.signup.mint(voter);
    let mut ballot = advanced_voting(&tokens);

    assert_eq!(ballot.vote(&voter, 0), Err(VotingError::NotRegistered));
    assert_eq!(ballot.eligible(&voter, token_id), Err(VotingError::NotRegistered));

    ballot.register(&voter, token_id).unwrap();
    assert_eq!(ballot.eligible(&voter, token_id), Err(VotingError::NotVoted));
    assert_eq!(ballot.vote(&voter, 3), Err(VotingError::InvalidOption));

    ballot.vote(&voter, 0).unwrap();
    ballot.vote(&voter, 0).unwrap();
    assert_eq!(ballot.counts.get(&0), Some(&2));
    assert_eq!(ballot.record(&voter).main_count, 2);

    ballot.eligible(&voter, token_id).unwrap();
    assert_eq!(
        ballot.eligible(&voter, token_id),
        Err(VotingError::Policy(PolicyError::AlreadyEnforced { subject: voter }))
    );
}

#[test]
fn test_advanced_voting_reward_holder_not_eligible() {
    let tokens = tokens();
    let voter = Address::derive(b"voter");
    let token_id = tokens.signup.mint(voter);
    let mut ballot = advanced_voting(&tokens);

    ballot.register(&voter, token_id).unwrap();
    ballot.vote(&voter, 1).unwrap();
    tokens.reward.mint(voter);
    assert_eq!(
        ballot.eligible(&voter, token_id),
        Err(VotingError::Policy(PolicyError::UnsuccessfulCheck { subject: voter }))
    );
}
