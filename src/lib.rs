//! `duelist`: seedable dueling-bandit primitives.
//!
//! Designed for *pairwise preference* problems: each round you can show a comparator
//! (a person, a rater model, a simulated human) two candidates and learn only which
//! one they preferred. The goal is to find the **Condorcet winner**, the arm that
//! beats every other arm more than half the time.
//!
//! **Policies:**
//! - [`Rucb`]: Relative Upper Confidence Bound. Proposes `[champion, challenger]`
//!   pairs from optimistic pairwise win-rate bounds, records outcomes into a
//!   [`WinMatrix`], and predicts the winner ([`Rucb::predict_winner`]).
//! - [`DuelingPolicy`]: the `choose_action_set` / `record_action` / `reset`
//!   interface a duel loop drives.
//!
//! **Simulated comparators ("humans"):**
//! - [`HumanUcb`]: deterministic UCB1 over the rewards the human has seen.
//! - [`HumanThompsonSampling`]: Beta–Bernoulli Thompson sampling with caller priors.
//! - [`UtilityOracle`]: fixed true utilities, no learning.
//! - [`HumanPolicy`] is the shared interface; [`ExactChoiceProb`] is the optional
//!   closed-form "probability of picking `a1` over `a2`" capability, reached through
//!   [`HumanPolicy::exact`].
//!
//! **Numerics:**
//! - [`beta_dist_max_prob`]: exact probability that one Beta draw is the largest of
//!   several independent Beta draws (log-space exp-sinh quadrature over `statrs`
//!   Beta CDFs). This is the Thompson human's exact choice probability.
//!
//! **Glue:**
//! - [`run_duels`]: the policy → human → reward → record loop.
//!
//! **Goals:**
//! - **Deterministic by default**: every stochastic component owns a seeded RNG;
//!   same seed and same inputs give the same stream.
//! - **No partial updates**: invalid inputs return an [`Error`] before any state changes.
//! - **Small N**: dense `N x N` bookkeeping, recomputed each round.
//!
//! **Non-goals:**
//! - Not a general RL framework; only pairwise duels (`comparison_size = 2`).
//! - No other dueling algorithms (Sparring, MultiSBM, ...).
//! - No persistence, plotting or CLI. With the `serde` feature, configs and
//!   [`WinMatrix`] are serializable so callers can checkpoint.
//!
//! # Example
//!
//! ```rust
//! use duelist::{run_duels, DuelLoopConfig, Rucb, RucbConfig, UtilityOracle};
//!
//! let utilities = [0.9, 0.5, 0.1];
//! let mut rucb = Rucb::with_seed(RucbConfig::default(), 1).unwrap();
//! let mut human = UtilityOracle::with_seed(utilities.to_vec(), 2).unwrap();
//! let cfg = DuelLoopConfig { rounds: 2_000, seed: 3 };
//! run_duels(&mut rucb, &mut human, &utilities, cfg).unwrap();
//! assert_eq!(rucb.predict_winner(&[0, 1, 2]).unwrap(), Some(0));
//! ```
//!
//! ## Related work
//!
//! Zoghi, Whiteson, Munos & de Rijke (2014, arXiv:1312.3393) introduced RUCB and
//! proved `O(K log T)` regret when a Condorcet winner exists. Yue, Broder,
//! Kleinberg & Joachims (2012) set up the K-armed dueling bandit problem.

#![forbid(unsafe_code)]

mod error;
pub use error::{Error, Result};

mod beta;
pub use beta::*;

mod win_matrix;
pub use win_matrix::*;

mod rucb;
pub use rucb::*;

mod policy;
pub use policy::DuelingPolicy;

mod human;
pub use human::{ExactChoiceProb, HumanPolicy, HumanUcb, HumanUcbConfig};

mod thompson;
pub use thompson::*;

mod utility;
pub use utility::*;

mod harness;
pub use harness::*;
