//! RUCB (Relative Upper Confidence Bound) for dueling bandits.
//!
//! The policy keeps a win-count matrix `W` and, each round `t`, derives the optimistic
//! pairwise matrix
//!
//! ```text
//!   U[i][j] = W[i][j] / S[i][j] + sqrt(alpha * ln(t) / S[i][j]),   S = W + W^T
//! ```
//!
//! with never-compared pairs (`0/0`) set to `1.0` and the diagonal pinned to `0.5`.
//! Arms whose whole row is `>= 0.5` are the candidate champions `C`. A champion is
//! picked from `C` (biased toward the last unique candidate, kept in a one-slot
//! memory `B`), and its challenger is the arm with the highest `U[j][champion]`,
//! ties broken uniformly and the champion itself only kept when nothing ties it.
//!
//! Notes:
//! - This policy is **seedable**; default construction uses seed `0`.
//! - The arm universe must be exactly `{0, .., N-1}` and must not change between
//!   rounds. `W` is sized on the first selection.
//! - Every validation runs before any state changes, so an `Err` leaves `W` and `B`
//!   as they were.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{check_time, Error, Result};
use crate::win_matrix::WinMatrix;

/// Configuration for [`Rucb`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RucbConfig {
    /// Exploration constant in the confidence radius `sqrt(alpha * ln(t) / n)`.
    pub alpha: f64,
    /// Arms compared per round. Only `2` is supported.
    pub comparison_size: usize,
    /// Seed for the internal RNG.
    pub seed: u64,
}

impl Default for RucbConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            comparison_size: 2,
            seed: 0,
        }
    }
}

impl RucbConfig {
    fn validate(&self) -> Result<()> {
        if self.comparison_size != 2 {
            return Err(Error::Config(format!(
                "RUCB only supports pairwise duels (comparison_size = 2), got {}",
                self.comparison_size
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::Config(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// The optimistic matrix `U` and the candidate-champion set `C` for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBounds {
    n: usize,
    upper: Vec<f64>,
    candidates: Vec<usize>,
}

impl ConfidenceBounds {
    /// `U[i][j]`: optimistic estimate that `i` beats `j`.
    pub fn upper(&self, i: usize, j: usize) -> f64 {
        self.upper[i * self.n + j]
    }

    /// Arms not confidently beaten by anyone, ascending. May be empty.
    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    /// Arms `j` maximizing `U[j][champion]`.
    fn challengers(&self, champion: usize) -> Vec<usize> {
        let max_u = (0..self.n)
            .map(|j| self.upper(j, champion))
            .fold(f64::NEG_INFINITY, f64::max);
        (0..self.n)
            .filter(|&j| self.upper(j, champion) >= max_u)
            .collect()
    }
}

/// Compute `U` and `C` from the win counts at round `time`.
///
/// Pure: both action selection and the self-duel query go through here so they
/// cannot disagree on the formula.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `time == 0`.
/// - [`Error::NumericInvariant`] if any raw bound comes out infinite. With integer
///   counts only `0/0` (`NaN`) can occur, so an infinity means the bookkeeping is
///   broken.
pub fn confidence_bounds(wins: &WinMatrix, time: u64, alpha: f64) -> Result<ConfidenceBounds> {
    check_time(time)?;
    let n = wins.len();
    let log_t = (time as f64).ln();
    let mut upper = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let w = wins.get(i, j) as f64;
            let s = wins.duels_between(i, j) as f64;
            let raw = w / s + (alpha * log_t / s).sqrt();
            if raw.is_infinite() {
                return Err(Error::NumericInvariant(format!(
                    "U[{i}][{j}] is infinite (wins={w}, duels={s}, t={time})"
                )));
            }
            upper[i * n + j] = if i == j {
                0.5
            } else if raw.is_nan() {
                1.0
            } else {
                raw
            };
        }
    }
    let candidates = (0..n)
        .filter(|&i| (0..n).all(|j| upper[i * n + j] >= 0.5))
        .collect();
    Ok(ConfidenceBounds {
        n,
        upper,
        candidates,
    })
}

/// Seedable RUCB dueling-bandit policy.
#[derive(Debug, Clone)]
pub struct Rucb {
    cfg: RucbConfig,
    // `None` until the first selection tells us how many arms there are.
    wins: Option<WinMatrix>,
    memory: BTreeSet<usize>,
    rng: StdRng,
}

impl Rucb {
    /// Create a policy seeded from `cfg.seed`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `comparison_size != 2` or `alpha` is negative/non-finite.
    pub fn new(cfg: RucbConfig) -> Result<Self> {
        Self::with_seed(cfg, cfg.seed)
    }

    /// Create with an explicit seed (overrides `cfg.seed`).
    pub fn with_seed(mut cfg: RucbConfig, seed: u64) -> Result<Self> {
        cfg.validate()?;
        cfg.seed = seed;
        Ok(Self {
            cfg,
            wins: None,
            memory: BTreeSet::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Create with `W` already materialized, e.g. to resume from recorded counts.
    pub fn with_win_matrix(cfg: RucbConfig, wins: WinMatrix) -> Result<Self> {
        let mut r = Self::new(cfg)?;
        r.wins = Some(wins);
        Ok(r)
    }

    pub fn config(&self) -> &RucbConfig {
        &self.cfg
    }

    /// The win-count matrix, once sized.
    pub fn win_matrix(&self) -> Option<&WinMatrix> {
        self.wins.as_ref()
    }

    /// The remembered champion `B`, if any.
    pub fn champion_memory(&self) -> Option<usize> {
        self.memory.first().copied()
    }

    /// Forget all duels and the champion memory. The RNG stream continues.
    pub fn reset(&mut self) {
        debug!("rucb: reset");
        self.wins = None;
        self.memory.clear();
    }

    /// Validate that `arms` is exactly `{0, .., N-1}` and agrees with `W` if sized.
    fn check_universe(&self, arms: &[usize]) -> Result<usize> {
        let n = arms.len();
        if n == 0 {
            return Err(Error::InvalidArgument("arm set is empty".to_string()));
        }
        let mut seen = vec![false; n];
        for &a in arms {
            if a >= n || seen[a] {
                return Err(Error::Precondition(format!(
                    "arm set must be exactly {{0..{}}}, got {arms:?}",
                    n - 1
                )));
            }
            seen[a] = true;
        }
        if let Some(w) = &self.wins {
            if w.len() != n {
                return Err(Error::Precondition(format!(
                    "arm set has {n} arms but the win matrix is {0}x{0}",
                    w.len()
                )));
            }
        }
        Ok(n)
    }

    /// Propose `[champion, challenger]` for round `time`.
    ///
    /// The two entries may be equal (a self-duel) when no other arm can still
    /// plausibly beat the champion.
    pub fn choose_action_set(&mut self, time: u64, all_actions: &[usize]) -> Result<[usize; 2]> {
        check_time(time)?;
        let n = self.check_universe(all_actions)?;
        let wins = self.wins.get_or_insert_with(|| {
            debug!(arms = n, "rucb: sizing win matrix");
            WinMatrix::zeros(n)
        });
        let bounds = confidence_bounds(wins, time, self.cfg.alpha)?;

        let mut candidates: BTreeSet<usize> = bounds.candidates().iter().copied().collect();
        if candidates.is_empty() {
            let pick = all_actions[self.rng.random_range(0..n)];
            debug!(time, pick, "rucb: no candidate champion, picking one at random");
            candidates.insert(pick);
        }

        self.memory = self.memory.intersection(&candidates).copied().collect();

        let champion = if let (1, Some(&only)) = (candidates.len(), candidates.first()) {
            self.memory = candidates.clone();
            only
        } else {
            let coin: f64 = self.rng.random();
            match self.memory.first() {
                Some(&remembered) if coin < 0.5 => remembered,
                _ => {
                    let fresh: Vec<usize> = candidates.difference(&self.memory).copied().collect();
                    fresh[self.rng.random_range(0..fresh.len())]
                }
            }
        };

        let mut challengers = bounds.challengers(champion);
        if challengers.len() > 1 {
            challengers.retain(|&j| j != champion);
        }
        let challenger = challengers[self.rng.random_range(0..challengers.len())];

        trace!(
            time,
            champion,
            challenger,
            candidates = candidates.len(),
            memory = ?self.champion_memory(),
            "rucb: chose duel"
        );
        Ok([champion, challenger])
    }

    /// Record that `chosen` won the duel between the two `available` arms.
    ///
    /// The loser is the other element of `available`; for a self-duel `[a, a]` the
    /// diagonal cell `W[a][a]` is incremented.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if `available` does not hold exactly two arms, no
    /// selection has sized `W` yet, `chosen` is not in `available`, or an arm is
    /// outside the universe.
    pub fn record_action(&mut self, time: u64, available: &[usize], chosen: usize) -> Result<()> {
        check_time(time)?;
        if available.len() != 2 {
            return Err(Error::Precondition(format!(
                "record_action needs exactly 2 available arms, got {}",
                available.len()
            )));
        }
        let Some(wins) = self.wins.as_mut() else {
            return Err(Error::Precondition(
                "record_action called before any choose_action_set".to_string(),
            ));
        };
        if !available.contains(&chosen) {
            return Err(Error::Precondition(format!(
                "chosen arm {chosen} is not one of {available:?}"
            )));
        }
        if let Some(&bad) = available.iter().find(|&&a| a >= wins.len()) {
            return Err(Error::Precondition(format!(
                "arm {bad} outside universe of {} arms",
                wins.len()
            )));
        }

        let loser = if available[0] == chosen {
            available[1]
        } else {
            available[0]
        };
        wins.wins_against(chosen, loser);
        trace!(time, winner = chosen, loser, "rucb: recorded duel");
        Ok(())
    }

    /// Predict the Condorcet winner from the accumulated counts.
    ///
    /// Each arm scores one point per opponent it beats more than half the time
    /// (never-compared pairs count as `0.5`, i.e. no point). Returns the unique
    /// top scorer, or `Ok(None)` when the top score is shared, which includes the
    /// no-data case.
    pub fn predict_winner(&self, action_set: &[usize]) -> Result<Option<usize>> {
        let n = self.check_universe(action_set)?;
        let empty;
        let wins = match &self.wins {
            Some(w) => w,
            None => {
                empty = WinMatrix::zeros(n);
                &empty
            }
        };

        let beats: Vec<usize> = (0..n)
            .map(|i| (0..n).filter(|&j| wins.win_rate(i, j) > 0.5).count())
            .collect();
        let Some(&top) = beats.iter().max() else {
            return Ok(None);
        };
        let mut leaders = (0..n).filter(|&i| beats[i] == top);
        match (leaders.next(), leaders.next()) {
            (Some(winner), None) => Ok(Some(winner)),
            _ => Ok(None),
        }
    }

    /// Would every possible champion at `time` be forced to duel itself?
    ///
    /// For each candidate champion (the set `C`, or every arm when `C` is empty) the
    /// challenger scan over `U[.][champion]` must have the champion as its unique
    /// strict maximizer. Read-only: neither `W` nor the champion memory changes, and
    /// an unsized `W` is treated as all zeros.
    pub fn will_definitely_self_duel(&self, time: u64, all_actions: &[usize]) -> Result<bool> {
        check_time(time)?;
        let n = self.check_universe(all_actions)?;
        let empty;
        let wins = match &self.wins {
            Some(w) => w,
            None => {
                empty = WinMatrix::zeros(n);
                &empty
            }
        };
        let bounds = confidence_bounds(wins, time, self.cfg.alpha)?;
        let pool: Vec<usize> = if bounds.candidates().is_empty() {
            all_actions.to_vec()
        } else {
            bounds.candidates().to_vec()
        };
        Ok(pool.iter().all(|&c| {
            let own = bounds.upper(c, c);
            (0..n).all(|j| j == c || bounds.upper(j, c) < own)
        }))
    }
}
