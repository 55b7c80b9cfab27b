//! A non-learning comparator with fixed true utilities.
//!
//! Each arm `i` pays a Bernoulli(`u[i]`) reward. To compare, the oracle draws one
//! reward per available arm and returns the arm with the highest draw, breaking ties
//! uniformly at random. For two arms this gives
//!
//! ```text
//!   P(a1 chosen over a2) = u1 (1 - u2) + (u1 u2 + (1 - u1)(1 - u2)) / 2
//!                        = 1/2 + (u1 - u2) / 2
//! ```
//!
//! so any strict ordering of utilities yields a Condorcet winner.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{check_time, Error, Result};
use crate::human::{check_available, ExactChoiceProb, HumanPolicy};

/// Fixed-utility stochastic comparator.
#[derive(Debug, Clone)]
pub struct UtilityOracle {
    utilities: Vec<f64>,
    rng: StdRng,
}

impl UtilityOracle {
    /// Create with a deterministic fixed seed (0).
    pub fn new(utilities: Vec<f64>) -> Result<Self> {
        Self::with_seed(utilities, 0)
    }

    /// # Errors
    ///
    /// [`Error::Config`] if `utilities` is empty or any entry is outside `[0, 1]`.
    pub fn with_seed(utilities: Vec<f64>, seed: u64) -> Result<Self> {
        if utilities.is_empty() {
            return Err(Error::Config("utilities must cover at least one arm".to_string()));
        }
        if let Some((arm, u)) = utilities
            .iter()
            .enumerate()
            .find(|(_, u)| !(0.0..=1.0).contains(*u))
        {
            return Err(Error::Config(format!(
                "arm {arm}: utility must be in [0, 1], got {u}"
            )));
        }
        Ok(Self {
            utilities,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn utilities(&self) -> &[f64] {
        &self.utilities
    }

    /// Arm with the highest utility (first on ties).
    pub fn best_arm(&self) -> usize {
        let mut best = 0;
        for (i, &u) in self.utilities.iter().enumerate() {
            if u > self.utilities[best] {
                best = i;
            }
        }
        best
    }

    fn check_arm(&self, arm: usize) -> Result<()> {
        if arm >= self.utilities.len() {
            return Err(Error::InvalidArgument(format!(
                "arm {arm} outside universe of {} arms",
                self.utilities.len()
            )));
        }
        Ok(())
    }
}

impl HumanPolicy for UtilityOracle {
    fn choose_action(&mut self, time: u64, available: &[usize]) -> Result<usize> {
        check_time(time)?;
        check_available(available)?;
        for &a in available {
            self.check_arm(a)?;
        }
        let draws: Vec<bool> = available
            .iter()
            .map(|&a| self.rng.random_bool(self.utilities[a]))
            .collect();
        let top = draws.iter().any(|&d| d);
        let tied: Vec<usize> = available
            .iter()
            .zip(&draws)
            .filter(|&(_, &d)| d == top)
            .map(|(&a, _)| a)
            .collect();
        Ok(tied[self.rng.random_range(0..tied.len())])
    }

    /// Validates `action`; the oracle does not learn.
    fn record_reward(&mut self, time: u64, action: usize, _reward: f64) -> Result<()> {
        check_time(time)?;
        self.check_arm(action)
    }

    /// Nothing to forget: utilities are fixed.
    fn reset(&mut self) {}

    fn exact(&self) -> Option<&dyn ExactChoiceProb> {
        Some(self)
    }
}

impl ExactChoiceProb for UtilityOracle {
    fn action_choice_prob(&self, time: u64, a1: usize, a2: usize) -> Result<f64> {
        check_time(time)?;
        self.check_arm(a1)?;
        self.check_arm(a2)?;
        if a1 == a2 {
            return Ok(1.0);
        }
        Ok(0.5 + (self.utilities[a1] - self.utilities[a2]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_preferences_are_respected() {
        let mut o = UtilityOracle::with_seed(vec![1.0, 0.0, 0.0], 3).unwrap();
        for t in 1..100 {
            assert_eq!(o.choose_action(t, &[1, 0]).unwrap(), 0);
        }
        assert_eq!(o.action_choice_prob(1, 0, 1).unwrap(), 1.0);
        assert_eq!(o.action_choice_prob(1, 1, 2).unwrap(), 0.5);
    }

    #[test]
    fn equal_utilities_split_ties_both_ways() {
        let mut o = UtilityOracle::with_seed(vec![0.0, 0.0], 5).unwrap();
        let firsts = (1..=2000)
            .filter(|&t| o.choose_action(t, &[0, 1]).unwrap() == 0)
            .count();
        assert!((800..1200).contains(&firsts), "firsts={firsts}");
    }

    #[test]
    fn best_arm_and_validation() {
        let o = UtilityOracle::new(vec![0.3, 0.5, 0.4]).unwrap();
        assert_eq!(o.best_arm(), 1);
        assert!(matches!(
            UtilityOracle::new(vec![0.3, 1.5]),
            Err(Error::Config(_))
        ));
        assert!(matches!(UtilityOracle::new(vec![]), Err(Error::Config(_))));
        assert!(matches!(
            o.action_choice_prob(1, 0, 3),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = UtilityOracle::with_seed(vec![0.5, 0.5, 0.5], 9).unwrap();
        let mut b = UtilityOracle::with_seed(vec![0.5, 0.5, 0.5], 9).unwrap();
        for t in 1..50 {
            assert_eq!(
                a.choose_action(t, &[0, 1, 2]).unwrap(),
                b.choose_action(t, &[0, 1, 2]).unwrap()
            );
        }
        a.reset();
        assert_eq!(a.utilities(), &[0.5, 0.5, 0.5]);
    }
}
