//! Simulated human comparators ("oracles").
//!
//! A human policy is shown a set of available arms, picks one, and may later be told
//! the reward its pick earned. Some oracles can also state, in closed form, how likely
//! they are to pick `a1` over `a2`; that is a separate capability ([`ExactChoiceProb`])
//! discovered through [`HumanPolicy::exact`] rather than through a type hierarchy.

use std::collections::BTreeMap;

use crate::error::{check_time, Error, Result};

/// Common interface for simulated human comparators.
pub trait HumanPolicy {
    /// Pick one arm out of `available`.
    fn choose_action(&mut self, time: u64, available: &[usize]) -> Result<usize>;

    /// Tell the policy the reward its pick of `action` earned at `time`.
    fn record_reward(&mut self, time: u64, action: usize, reward: f64) -> Result<()>;

    /// Drop all history and return to the prior state.
    fn reset(&mut self);

    /// The exact choice-probability capability, when this oracle has one.
    fn exact(&self) -> Option<&dyn ExactChoiceProb> {
        None
    }
}

/// Oracles whose two-arm choice probability is available in closed form.
pub trait ExactChoiceProb {
    /// Probability that `choose_action(time, &[a1, a2])` returns `a1`.
    fn action_choice_prob(&self, time: u64, a1: usize, a2: usize) -> Result<f64>;
}

pub(crate) fn check_available(available: &[usize]) -> Result<()> {
    if available.is_empty() {
        return Err(Error::InvalidArgument(
            "choose_action: available action set is empty".to_string(),
        ));
    }
    Ok(())
}

/// Configuration for [`HumanUcb`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HumanUcbConfig {
    /// Exploration multiplier `C` in `mean + C * sqrt(ln(t) / n)`.
    pub ucb_constant: f64,
}

impl Default for HumanUcbConfig {
    fn default() -> Self {
        Self { ucb_constant: 1.0 }
    }
}

/// Observed reward statistics for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ArmStats {
    count: u64,
    mean: f64,
}

/// A human who picks by UCB1 over the rewards they have seen.
///
/// Unseen arms have an infinite upper bound, so they are always tried first.
/// Picks are deterministic given the history; exact ties go to the earliest arm in
/// `available`.
#[derive(Debug, Clone, Default)]
pub struct HumanUcb {
    cfg: HumanUcbConfig,
    stats: BTreeMap<usize, ArmStats>,
}

impl HumanUcb {
    /// # Errors
    ///
    /// [`Error::Config`] if `ucb_constant` is negative or not finite.
    pub fn new(cfg: HumanUcbConfig) -> Result<Self> {
        if !cfg.ucb_constant.is_finite() || cfg.ucb_constant < 0.0 {
            return Err(Error::Config(format!(
                "ucb_constant must be finite and >= 0, got {}",
                cfg.ucb_constant
            )));
        }
        Ok(Self {
            cfg,
            stats: BTreeMap::new(),
        })
    }

    /// Number of rewards recorded for `action`.
    pub fn count(&self, action: usize) -> u64 {
        self.stats.get(&action).map_or(0, |s| s.count)
    }

    /// Running mean reward for `action`, if it has been played.
    pub fn mean(&self, action: usize) -> Option<f64> {
        self.stats.get(&action).map(|s| s.mean)
    }

    /// Upper confidence bound for `action` at `time`.
    ///
    /// `+inf` for an arm that has never been rewarded, otherwise
    /// `mean + C * sqrt(ln(time) / count)`.
    pub fn ucb(&self, time: u64, action: usize) -> Result<f64> {
        check_time(time)?;
        Ok(self.ucb_unchecked(time, action))
    }

    fn ucb_unchecked(&self, time: u64, action: usize) -> f64 {
        match self.stats.get(&action) {
            None => f64::INFINITY,
            Some(s) => {
                s.mean + self.cfg.ucb_constant * ((time as f64).ln() / s.count as f64).sqrt()
            }
        }
    }
}

impl HumanPolicy for HumanUcb {
    fn choose_action(&mut self, time: u64, available: &[usize]) -> Result<usize> {
        check_time(time)?;
        check_available(available)?;
        let mut best = available[0];
        let mut best_ucb = self.ucb_unchecked(time, best);
        for &a in &available[1..] {
            let u = self.ucb_unchecked(time, a);
            // Strict: the first maximizer keeps the pick.
            if u > best_ucb {
                best = a;
                best_ucb = u;
            }
        }
        Ok(best)
    }

    fn record_reward(&mut self, time: u64, action: usize, reward: f64) -> Result<()> {
        check_time(time)?;
        if !reward.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "record_reward: reward must be finite, got {reward}"
            )));
        }
        let s = self.stats.entry(action).or_insert(ArmStats {
            count: 0,
            mean: 0.0,
        });
        let n = s.count as f64;
        s.mean = (s.mean * n + reward) / (n + 1.0);
        s.count += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.stats.clear();
    }

    fn exact(&self) -> Option<&dyn ExactChoiceProb> {
        Some(self)
    }
}

impl ExactChoiceProb for HumanUcb {
    /// Degenerate step-function probability: `1.0` if `a1` has the strictly larger
    /// UCB, `0.0` if strictly smaller, `0.5` on an exact tie.
    ///
    /// `HumanUcb` is deterministic, so this is "certainty given the current state"
    /// rather than a smooth probability. Note that on a tie `choose_action` always
    /// returns the first listed arm; `0.5` describes the tie, not the tie-break.
    fn action_choice_prob(&self, time: u64, a1: usize, a2: usize) -> Result<f64> {
        check_time(time)?;
        let u1 = self.ucb_unchecked(time, a1);
        let u2 = self.ucb_unchecked(time, a2);
        Ok(if u1 == u2 {
            0.5
        } else if u1 > u2 {
            1.0
        } else {
            0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded() -> HumanUcb {
        let mut p = HumanUcb::default();
        p.record_reward(1, 0, 1.0).unwrap();
        p.record_reward(2, 1, 0.0).unwrap();
        p.record_reward(3, 0, 0.0).unwrap();
        p
    }

    #[test]
    fn smoke() {
        let mut p = HumanUcb::default();
        let a = p.choose_action(1, &[0, 1]).unwrap();
        p.record_reward(1, a, 1.0).unwrap();
        p.reset();
        assert_eq!(p.count(a), 0);
    }

    #[test]
    fn hand_computed_ucb_values() {
        let p = seeded();
        let ln4 = 4f64.ln();
        assert!((p.ucb(4, 0).unwrap() - (0.5 + (ln4 / 2.0).sqrt())).abs() < 1e-12);
        assert!((p.ucb(4, 1).unwrap() - ln4.sqrt()).abs() < 1e-12);
        assert_eq!(p.ucb(4, 2).unwrap(), f64::INFINITY);
        assert_eq!(p.count(0), 2);
        assert_eq!(p.mean(0), Some(0.5));
        assert_eq!(p.mean(2), None);
    }

    #[test]
    fn chooses_highest_ucb() {
        let mut p = seeded();
        assert_eq!(p.choose_action(4, &[0, 1]).unwrap(), 0);
        assert_eq!(p.choose_action(4, &[0, 1, 2]).unwrap(), 2);
        assert_eq!(p.choose_action(4, &[1, 2]).unwrap(), 2);
    }

    #[test]
    fn ties_go_to_first_listed() {
        let mut p = HumanUcb::default();
        assert_eq!(p.choose_action(1, &[3, 1, 2]).unwrap(), 3);
        assert_eq!(p.action_choice_prob(1, 3, 1).unwrap(), 0.5);
    }

    #[test]
    fn step_function_probabilities() {
        let p = seeded();
        assert_eq!(p.action_choice_prob(4, 0, 1).unwrap(), 1.0);
        assert_eq!(p.action_choice_prob(4, 1, 0).unwrap(), 0.0);
        assert_eq!(p.action_choice_prob(4, 0, 2).unwrap(), 0.0);
        assert!(p.exact().is_some());
    }

    #[test]
    fn rejects_bad_inputs_without_mutation() {
        let mut p = seeded();
        assert!(matches!(p.choose_action(4, &[]), Err(Error::InvalidArgument(_))));
        assert!(matches!(p.choose_action(0, &[0]), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            p.record_reward(4, 0, f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(p.count(0), 2);
        assert!(matches!(
            HumanUcb::new(HumanUcbConfig { ucb_constant: -1.0 }),
            Err(Error::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn running_mean_matches_batch_mean(
            rewards in proptest::collection::vec(0.0f64..1.0, 1..64),
        ) {
            let mut p = HumanUcb::default();
            for (i, r) in rewards.iter().enumerate() {
                p.record_reward(i as u64 + 1, 7, *r).unwrap();
            }
            let batch = rewards.iter().sum::<f64>() / rewards.len() as f64;
            prop_assert_eq!(p.count(7), rewards.len() as u64);
            prop_assert!((p.mean(7).unwrap() - batch).abs() < 1e-9);
        }

        #[test]
        fn choice_is_a_member_and_matches_step_probability(
            obs in proptest::collection::vec((0usize..4, 0.0f64..1.0), 0..20),
            time in 1u64..1000,
        ) {
            let mut p = HumanUcb::default();
            for (i, (a, r)) in obs.iter().enumerate() {
                p.record_reward(i as u64 + 1, *a, *r).unwrap();
            }
            let choice = p.choose_action(time, &[0, 1]).unwrap();
            prop_assert!(choice == 0 || choice == 1);
            let prob = p.action_choice_prob(time, 0, 1).unwrap();
            if prob == 1.0 {
                prop_assert_eq!(choice, 0);
            } else if prob == 0.0 {
                prop_assert_eq!(choice, 1);
            }
        }
    }
}
