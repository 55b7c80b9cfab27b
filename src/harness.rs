//! Duel-loop glue.
//!
//! [`run_duels`] drives the call pattern every simulation shares: the dueling policy
//! proposes a pair, the simulated human picks one, the environment pays the human a
//! Bernoulli reward for their pick, and the policy records who won. Plotting,
//! persistence and multi-trial orchestration belong to the caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::human::HumanPolicy;
use crate::policy::DuelingPolicy;

/// Configuration for [`run_duels`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelLoopConfig {
    /// Rounds to play; round indices run `1..=rounds`.
    pub rounds: u64,
    /// Seed for the environment's reward draws.
    pub seed: u64,
}

impl Default for DuelLoopConfig {
    fn default() -> Self {
        Self {
            rounds: 1_000,
            seed: 0,
        }
    }
}

/// Summary of one [`run_duels`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelLoopReport {
    pub rounds: u64,
    /// Rounds whose pair was `[a, a]`.
    pub self_duels: u64,
    /// Rounds whose pair contained the highest-utility arm.
    pub best_arm_rounds: u64,
}

/// Play `cfg.rounds` duels between `policy` and `human`.
///
/// `utilities[i]` is the Bernoulli reward rate of arm `i`; the arm universe is
/// `0..utilities.len()`.
///
/// # Errors
///
/// [`Error::Config`] for empty or out-of-range utilities; any error raised by the
/// policy or the human is returned as-is and stops the loop.
pub fn run_duels<P, H>(
    policy: &mut P,
    human: &mut H,
    utilities: &[f64],
    cfg: DuelLoopConfig,
) -> Result<DuelLoopReport>
where
    P: DuelingPolicy + ?Sized,
    H: HumanPolicy + ?Sized,
{
    if utilities.is_empty() {
        return Err(Error::Config("utilities must cover at least one arm".to_string()));
    }
    if let Some(u) = utilities.iter().find(|u| !(0.0..=1.0).contains(*u)) {
        return Err(Error::Config(format!("utility {u} outside [0, 1]")));
    }
    let arms: Vec<usize> = (0..utilities.len()).collect();
    let best = arms
        .iter()
        .copied()
        .fold(0, |b, a| if utilities[a] > utilities[b] { a } else { b });

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut report = DuelLoopReport::default();
    debug!(rounds = cfg.rounds, arms = arms.len(), best, "duel loop: start");

    for t in 1..=cfg.rounds {
        let pair = policy.choose_action_set(t, &arms)?;
        if pair[0] == pair[1] {
            report.self_duels += 1;
        }
        if pair.contains(&best) {
            report.best_arm_rounds += 1;
        }
        let chosen = human.choose_action(t, &pair)?;
        let reward = if rng.random_bool(utilities[chosen]) {
            1.0
        } else {
            0.0
        };
        human.record_reward(t, chosen, reward)?;
        policy.record_action(t, &pair, chosen)?;
        report.rounds = t;
    }

    debug!(
        rounds = report.rounds,
        self_duels = report.self_duels,
        best_arm_rounds = report.best_arm_rounds,
        "duel loop: done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HumanThompsonSampling, Rucb, RucbConfig, ThompsonPriors, UtilityOracle};

    #[test]
    fn every_round_is_recorded() {
        let mut rucb = Rucb::with_seed(RucbConfig::default(), 1).unwrap();
        let mut human = UtilityOracle::with_seed(vec![0.8, 0.5, 0.2], 2).unwrap();
        let cfg = DuelLoopConfig {
            rounds: 500,
            seed: 3,
        };
        let report = run_duels(&mut rucb, &mut human, &[0.8, 0.5, 0.2], cfg).unwrap();
        assert_eq!(report.rounds, 500);
        assert!(report.best_arm_rounds <= 500);
        assert!(report.self_duels <= 500);
        assert_eq!(rucb.win_matrix().unwrap().total(), 500);
    }

    #[test]
    fn thompson_human_learns_alongside() {
        let mut rucb = Rucb::with_seed(RucbConfig::default(), 7).unwrap();
        let mut human = HumanThompsonSampling::with_seed(ThompsonPriors::uniform(3), 8).unwrap();
        let utilities = [0.9, 0.3, 0.1];
        let report = run_duels(
            &mut rucb,
            &mut human,
            &utilities,
            DuelLoopConfig {
                rounds: 300,
                seed: 9,
            },
        )
        .unwrap();
        assert_eq!(report.rounds, 300);
        // Every round paid the human exactly one reward.
        let pulls: f64 = (0..3)
            .map(|a| {
                let (al, be) = human.posterior(a).unwrap();
                al + be - 2.0
            })
            .sum();
        assert_eq!(pulls, 300.0);
    }

    #[test]
    fn rejects_bad_utilities() {
        let mut rucb = Rucb::new(RucbConfig::default()).unwrap();
        let mut human = UtilityOracle::new(vec![0.5]).unwrap();
        let cfg = DuelLoopConfig::default();
        assert!(matches!(
            run_duels(&mut rucb, &mut human, &[], cfg),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            run_duels(&mut rucb, &mut human, &[0.5, 1.2], cfg),
            Err(Error::Config(_))
        ));
        assert!(rucb.win_matrix().is_none());
    }

    #[test]
    fn human_errors_stop_the_loop() {
        // The human only knows two arms; the environment has three.
        let mut rucb = Rucb::with_seed(RucbConfig::default(), 0).unwrap();
        let mut human = UtilityOracle::new(vec![0.5, 0.5]).unwrap();
        let cfg = DuelLoopConfig {
            rounds: 200,
            seed: 0,
        };
        let err = run_duels(&mut rucb, &mut human, &[0.5, 0.5, 0.5], cfg).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
