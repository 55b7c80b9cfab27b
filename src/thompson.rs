//! Thompson-sampling human comparator.
//!
//! Each arm carries a Beta posterior over its Bernoulli reward rate. To choose, the
//! human draws one sample per available arm and takes the largest. Rewards must be
//! exactly `0.0` or `1.0` (conjugate Beta–Bernoulli update).
//!
//! Notes:
//! - This policy is **seedable** so selection can be reproducible in tests.
//! - Default construction uses a fixed seed (deterministic by default).
//! - The prior is kept separately from the posterior so [`HumanPolicy::reset`]
//!   restores it exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};

use crate::beta::beta_dist_max_prob;
use crate::error::{check_time, Error, Result};
use crate::human::{check_available, ExactChoiceProb, HumanPolicy};

/// Per-arm Beta prior shapes, indexed by arm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThompsonPriors {
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
}

impl ThompsonPriors {
    /// `Beta(1, 1)` for each of `n_arms` arms.
    pub fn uniform(n_arms: usize) -> Self {
        Self {
            alpha: vec![1.0; n_arms],
            beta: vec![1.0; n_arms],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.alpha.len() != self.beta.len() {
            return Err(Error::Config(format!(
                "prior alpha has {} entries but beta has {}",
                self.alpha.len(),
                self.beta.len()
            )));
        }
        if self.alpha.is_empty() {
            return Err(Error::Config("priors must cover at least one arm".to_string()));
        }
        for (arm, (&a, &b)) in self.alpha.iter().zip(&self.beta).enumerate() {
            if !(a.is_finite() && b.is_finite()) || a <= 0.0 || b <= 0.0 {
                return Err(Error::Config(format!(
                    "arm {arm}: Beta prior must be positive, got ({a}, {b})"
                )));
            }
        }
        Ok(())
    }
}

/// Seedable Thompson-sampling human over a fixed universe of arms.
#[derive(Debug, Clone)]
pub struct HumanThompsonSampling {
    prior: ThompsonPriors,
    alpha: Vec<f64>,
    beta: Vec<f64>,
    rng: StdRng,
}

impl HumanThompsonSampling {
    /// Create with a deterministic fixed seed (0).
    pub fn new(prior: ThompsonPriors) -> Result<Self> {
        Self::with_seed(prior, 0)
    }

    /// Create with a fixed seed (reproducible).
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the prior vectors differ in length, are empty, or hold a
    /// non-positive shape.
    pub fn with_seed(prior: ThompsonPriors, seed: u64) -> Result<Self> {
        prior.validate()?;
        Ok(Self {
            alpha: prior.alpha.clone(),
            beta: prior.beta.clone(),
            prior,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Number of arms in the universe.
    pub fn n_arms(&self) -> usize {
        self.alpha.len()
    }

    /// Current posterior `(alpha, beta)` for `arm`.
    pub fn posterior(&self, arm: usize) -> Option<(f64, f64)> {
        Some((*self.alpha.get(arm)?, *self.beta.get(arm)?))
    }

    /// The prior the policy resets to.
    pub fn prior(&self) -> &ThompsonPriors {
        &self.prior
    }

    fn check_arm(&self, arm: usize) -> Result<()> {
        if arm >= self.n_arms() {
            return Err(Error::InvalidArgument(format!(
                "arm {arm} outside universe of {} arms",
                self.n_arms()
            )));
        }
        Ok(())
    }

    fn sample(&mut self, arm: usize) -> Result<f64> {
        let dist = Beta::new(self.alpha[arm], self.beta[arm]).map_err(|e| {
            Error::InvalidArgument(format!("arm {arm}: Beta posterior rejected: {e}"))
        })?;
        Ok(dist.sample(&mut self.rng))
    }
}

impl HumanPolicy for HumanThompsonSampling {
    fn choose_action(&mut self, time: u64, available: &[usize]) -> Result<usize> {
        check_time(time)?;
        check_available(available)?;
        for &a in available {
            self.check_arm(a)?;
        }
        let mut samples = Vec::with_capacity(available.len());
        for &a in available {
            samples.push(self.sample(a)?);
        }
        let top = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<usize> = available
            .iter()
            .zip(&samples)
            .filter(|&(_, &x)| x == top)
            .map(|(&a, _)| a)
            .collect();
        // Tiny shapes round draws to exactly 0.0 or 1.0, so ties are real.
        match tied.as_slice() {
            [] => Err(Error::NumericInvariant(format!(
                "no comparable Beta sample among {samples:?}"
            ))),
            [only] => Ok(*only),
            _ => Ok(tied[self.rng.random_range(0..tied.len())]),
        }
    }

    fn record_reward(&mut self, time: u64, action: usize, reward: f64) -> Result<()> {
        check_time(time)?;
        self.check_arm(action)?;
        if reward == 1.0 {
            self.alpha[action] += 1.0;
        } else if reward == 0.0 {
            self.beta[action] += 1.0;
        } else {
            return Err(Error::InvalidArgument(format!(
                "Thompson human only accepts rewards 0.0 or 1.0, got {reward}"
            )));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.alpha.clone_from(&self.prior.alpha);
        self.beta.clone_from(&self.prior.beta);
    }

    fn exact(&self) -> Option<&dyn ExactChoiceProb> {
        Some(self)
    }
}

impl ExactChoiceProb for HumanThompsonSampling {
    fn action_choice_prob(&self, time: u64, a1: usize, a2: usize) -> Result<f64> {
        check_time(time)?;
        self.check_arm(a1)?;
        self.check_arm(a2)?;
        beta_dist_max_prob(
            &[self.alpha[a1], self.alpha[a2]],
            &[self.beta[a1], self.beta[a2]],
            0,
        )
    }
}
