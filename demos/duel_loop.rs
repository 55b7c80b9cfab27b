//! Play RUCB against each simulated human and report what it concluded.
//!
//! Run with `cargo run --example duel_loop`.

use duelist::{
    run_duels, DuelLoopConfig, HumanPolicy, HumanThompsonSampling, HumanUcb, Rucb, RucbConfig,
    ThompsonPriors, UtilityOracle,
};

fn play(name: &str, human: &mut dyn HumanPolicy, utilities: &[f64]) -> duelist::Result<()> {
    let mut rucb = Rucb::with_seed(RucbConfig::default(), 7)?;
    let cfg = DuelLoopConfig {
        rounds: 20_000,
        seed: 11,
    };
    let report = run_duels(&mut rucb, human, utilities, cfg)?;
    let arms: Vec<usize> = (0..utilities.len()).collect();
    let winner = rucb.predict_winner(&arms)?;
    println!(
        "{name:>9}: winner={winner:?} self_duels={} best_arm_rounds={}/{}",
        report.self_duels, report.best_arm_rounds, report.rounds
    );
    Ok(())
}

fn main() -> duelist::Result<()> {
    let utilities = [0.7, 0.5, 0.45, 0.2];

    let mut oracle = UtilityOracle::with_seed(utilities.to_vec(), 1)?;
    play("utility", &mut oracle, &utilities)?;

    let mut thompson = HumanThompsonSampling::with_seed(ThompsonPriors::uniform(utilities.len()), 2)?;
    play("thompson", &mut thompson, &utilities)?;

    let mut ucb = HumanUcb::default();
    play("ucb", &mut ucb, &utilities)?;
    Ok(())
}
