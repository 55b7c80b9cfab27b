//! `DuelingPolicy`: the interface a duel loop drives.
//!
//! A dueling policy proposes an ordered pair of arms each round, is told which one
//! the comparator preferred, and folds that outcome into its state. [`Rucb`] is the
//! implementation shipped here; the trait lets drivers such as [`run_duels`] stay
//! generic over it.
//!
//! [`Rucb`]: crate::Rucb
//! [`run_duels`]: crate::run_duels

use crate::error::Result;

/// Common interface for pairwise (two-arm) dueling-bandit policies.
///
/// # Example
///
/// ```rust
/// use duelist::{DuelingPolicy, Rucb, RucbConfig};
///
/// fn one_round<P: DuelingPolicy>(policy: &mut P, t: u64, arms: &[usize]) {
///     let pair = policy.choose_action_set(t, arms).unwrap();
///     // ... show both arms to the comparator; pretend the first one won ...
///     policy.record_action(t, &pair, pair[0]).unwrap();
/// }
///
/// let mut rucb = Rucb::new(RucbConfig::default()).unwrap();
/// one_round(&mut rucb, 1, &[0, 1, 2]);
/// ```
pub trait DuelingPolicy {
    /// Propose `[champion, challenger]` for round `time` over `all_actions`.
    fn choose_action_set(&mut self, time: u64, all_actions: &[usize]) -> Result<[usize; 2]>;

    /// Record that `chosen` won the duel between the two `available` arms.
    fn record_action(&mut self, time: u64, available: &[usize], chosen: usize) -> Result<()>;

    /// Drop all history.
    fn reset(&mut self);
}

impl DuelingPolicy for crate::Rucb {
    fn choose_action_set(&mut self, time: u64, all_actions: &[usize]) -> Result<[usize; 2]> {
        self.choose_action_set(time, all_actions)
    }
    fn record_action(&mut self, time: u64, available: &[usize], chosen: usize) -> Result<()> {
        self.record_action(time, available, chosen)
    }
    fn reset(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rucb, RucbConfig};

    fn run_generic<P: DuelingPolicy>(p: &mut P, arms: &[usize]) {
        for t in 1..=20 {
            let pair = p.choose_action_set(t, arms).unwrap();
            p.record_action(t, &pair, pair[1]).unwrap();
        }
    }

    #[test]
    fn rucb_implements_dueling_policy() {
        let mut r = Rucb::with_seed(RucbConfig::default(), 4).unwrap();
        run_generic(&mut r, &[0, 1, 2]);
        assert_eq!(r.win_matrix().map(|w| w.total()), Some(20));
        DuelingPolicy::reset(&mut r);
        assert!(r.win_matrix().is_none());
    }
}
