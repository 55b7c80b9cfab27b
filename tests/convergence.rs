//! Long-run RUCB convergence against fixed-utility comparators.
//!
//! Each scenario plays 100k rounds, so these are the slowest tests in the crate.

use duelist::{run_duels, DuelLoopConfig, Rucb, RucbConfig, UtilityOracle};

fn converge(utilities: &[f64], seed: u64) -> (Option<usize>, usize) {
    let mut rucb = Rucb::with_seed(RucbConfig::default(), seed).unwrap();
    let mut human = UtilityOracle::with_seed(utilities.to_vec(), seed ^ 0x5eed).unwrap();
    let cfg = DuelLoopConfig {
        rounds: 100_000,
        seed: seed.wrapping_add(1),
    };
    let report = run_duels(&mut rucb, &mut human, utilities, cfg).unwrap();
    assert_eq!(report.rounds, 100_000);
    let arms: Vec<usize> = (0..utilities.len()).collect();
    (rucb.predict_winner(&arms).unwrap(), human.best_arm())
}

#[test]
fn single_dominant_arm_of_three() {
    let (winner, best) = converge(&[1.0, 0.0, 0.0], 11);
    assert_eq!(winner, Some(best));
}

#[test]
fn graded_utilities_of_three() {
    let (winner, best) = converge(&[0.5, 0.4, 0.3], 12);
    assert_eq!(winner, Some(best));
}

#[test]
fn single_dominant_arm_of_five() {
    let (winner, best) = converge(&[1.0, 0.0, 0.0, 0.0, 0.0], 13);
    assert_eq!(winner, Some(best));
}

#[test]
fn winner_need_not_be_arm_zero() {
    let (winner, best) = converge(&[0.3, 0.4, 0.5], 14);
    assert_eq!(best, 2);
    assert_eq!(winner, Some(2));
}

#[test]
fn converged_policy_mostly_self_duels() {
    let utilities = [0.9, 0.2, 0.1];
    let mut rucb = Rucb::with_seed(RucbConfig::default(), 21).unwrap();
    let mut human = UtilityOracle::with_seed(utilities.to_vec(), 22).unwrap();
    let cfg = DuelLoopConfig {
        rounds: 20_000,
        seed: 23,
    };
    let report = run_duels(&mut rucb, &mut human, &utilities, cfg).unwrap();
    // Once arm 0 is the lone champion, almost every round is [0, 0].
    assert!(report.self_duels > 15_000, "{report:?}");
    assert!(report.best_arm_rounds > 19_000, "{report:?}");
    assert_eq!(rucb.predict_winner(&[0, 1, 2]).unwrap(), Some(0));
}
