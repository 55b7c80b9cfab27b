//! Exact "which Beta draw is largest" probability.
//!
//! [`beta_dist_max_prob`] is the closed-form ground truth for Thompson-style
//! comparators: for independent `X_j ~ Beta(alpha[j], beta[j])` it returns
//!
//! ```text
//!   P(X_i > max_{j != i} X_j) = integral_0^1 pdf_i(x) * prod_{j != i} cdf_j(x) dx
//! ```
//!
//! Small shapes put almost all of their mass within `exp(-1/shape)` of an endpoint,
//! far below what an `f64` `x` can hold. The integral is therefore split at `1/2`
//! and each half is taken over `r = -ln(2 s)`, where `s` is the distance to the near
//! endpoint, with exp-sinh quadrature. Nodes carry `ln x` and `ln(1 - x)` directly;
//! the CDFs come from `statrs` except at nodes whose `s` would underflow, where only
//! the leading term of the incomplete-beta series is left.

use statrs::function::beta::{beta_reg, ln_beta};

use crate::error::{Error, Result};

/// Half-width of the exp-sinh parameter range. `r` spans `exp(+-522)`, enough for
/// shapes down to about `1e-200`.
const T_MAX: f64 = 6.5;
/// Refinement levels (step `h = 2^-level`).
const MIN_LEVEL: u32 = 4;
const MAX_LEVEL: u32 = 9;
const QUAD_REL_TOL: f64 = 1e-13;
const QUAD_ABS_TOL: f64 = 1e-16;
/// Below `ln s = -700` the series correction is under `1e-300`.
const LN_SERIES_ONLY: f64 = -700.0;

/// One `Beta(a, b)` with its normalizer cached.
#[derive(Debug, Clone, Copy)]
struct BetaShape {
    a: f64,
    b: f64,
    ln_norm: f64,
}

impl BetaShape {
    fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            ln_norm: ln_beta(a, b),
        }
    }

    /// `pdf(x) * s` where `s = min(x, 1 - x)` is the node's quadrature Jacobian.
    fn weighted_pdf(&self, n: &Node) -> f64 {
        let ln_far = n.ln_x.max(n.ln_y);
        (self.a * n.ln_x + self.b * n.ln_y - self.ln_norm - ln_far).exp()
    }

    fn cdf(&self, n: &Node) -> f64 {
        if n.x <= n.y {
            lower_tail(self.a, self.b, self.ln_norm, n.x, n.ln_x, n.ln_y)
        } else {
            1.0 - lower_tail(self.b, self.a, self.ln_norm, n.y, n.ln_y, n.ln_x)
        }
    }
}

/// `I_s(p, q)` for `s <= 1/2`, with `ln s` and `ln(1 - s)` supplied by the caller.
fn lower_tail(p: f64, q: f64, ln_norm: f64, s: f64, ln_s: f64, ln_rest: f64) -> f64 {
    if ln_s < LN_SERIES_ONLY {
        // s^p (1-s)^q / (p B(p, q)), the rest of the series is below f64 resolution.
        (p * ln_s + q * ln_rest - p.ln() - ln_norm).exp()
    } else {
        beta_reg(p, q, s)
    }
}

/// A point in `(0, 1)` carried together with its complement and both logs.
#[derive(Debug, Clone, Copy)]
struct Node {
    x: f64,
    y: f64,
    ln_x: f64,
    ln_y: f64,
}

impl Node {
    /// The point with `x = exp(-r) / 2`.
    fn near_zero(r: f64) -> Self {
        let ln_x = -std::f64::consts::LN_2 - r;
        let x = ln_x.exp();
        Self {
            x,
            y: 1.0 - x,
            ln_x,
            ln_y: (-x).ln_1p(),
        }
    }

    /// The point with `1 - x = exp(-r) / 2`.
    fn near_one(r: f64) -> Self {
        let n = Self::near_zero(r);
        Self {
            x: n.y,
            y: n.x,
            ln_x: n.ln_y,
            ln_y: n.ln_x,
        }
    }
}

/// Exp-sinh quadrature of `g` over `r in (0, inf)` with `r = exp(pi/2 sinh t)`.
///
/// `g` may be zero far out; the Jacobian is never multiplied into a zero so an
/// overflowing `r` cannot turn into `NaN`.
fn exp_sinh<F>(mut g: F) -> f64
where
    F: FnMut(f64) -> f64,
{
    let half_pi = std::f64::consts::FRAC_PI_2;
    let mut term = |t: f64| -> f64 {
        let ln_r = half_pi * t.sinh();
        let r = ln_r.exp();
        let v = g(r);
        if v == 0.0 {
            0.0
        } else {
            v * r * half_pi * t.cosh()
        }
    };

    // Level 0: h = 1, integer nodes.
    let mut h = 1.0;
    let n0 = T_MAX.floor() as i64;
    let mut sum = term(0.0);
    for j in 1..=n0 {
        let t = j as f64;
        sum += term(t) + term(-t);
    }
    let mut estimate = h * sum;

    for level in 1..=MAX_LEVEL {
        h *= 0.5;
        // Only the odd multiples of the new step are new nodes.
        let steps = (T_MAX / h) as i64;
        let mut fresh = 0.0;
        let mut j = 1;
        while j <= steps {
            let t = j as f64 * h;
            fresh += term(t) + term(-t);
            j += 2;
        }
        sum += fresh;
        let next = h * sum;
        let converged = (next - estimate).abs() <= (QUAD_REL_TOL * next.abs()).max(QUAD_ABS_TOL);
        estimate = next;
        if level >= MIN_LEVEL && converged {
            break;
        }
    }
    estimate
}

/// Probability that a draw from `Beta(alpha[index], beta[index])` is the strict
/// maximum among independent draws from every `Beta(alpha[j], beta[j])`.
///
/// Computed by numerical integration of `pdf_index(x) * prod_{j != index} cdf_j(x)`,
/// not by sampling, so it can serve as an oracle in tests. Equal parameters over `k`
/// candidates give `1/k`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `alpha` and `beta` differ in length, the sequences
/// are empty, any parameter is not a finite positive number, or `index` is out of
/// range.
///
/// # Example
///
/// ```rust
/// use duelist::beta_dist_max_prob;
///
/// let p = beta_dist_max_prob(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], 0).unwrap();
/// assert!((p - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn beta_dist_max_prob(alpha: &[f64], beta: &[f64], index: usize) -> Result<f64> {
    if alpha.len() != beta.len() {
        return Err(Error::InvalidArgument(format!(
            "beta_dist_max_prob: {} alpha values but {} beta values",
            alpha.len(),
            beta.len()
        )));
    }
    if alpha.is_empty() {
        return Err(Error::InvalidArgument(
            "beta_dist_max_prob: at least one candidate is required".to_string(),
        ));
    }
    if index >= alpha.len() {
        return Err(Error::InvalidArgument(format!(
            "beta_dist_max_prob: index {index} out of range for {} candidates",
            alpha.len()
        )));
    }
    for (j, (&a, &b)) in alpha.iter().zip(beta).enumerate() {
        if !(a.is_finite() && b.is_finite()) || a <= 0.0 || b <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "beta_dist_max_prob: candidate {j} has non-positive shape (alpha={a}, beta={b})"
            )));
        }
    }
    let k = alpha.len();
    if k == 1 {
        return Ok(1.0);
    }
    let (a_i, b_i) = (alpha[index], beta[index]);
    if alpha.iter().zip(beta).all(|(&a, &b)| a == a_i && b == b_i) {
        return Ok(1.0 / k as f64);
    }

    let rivals: Vec<BetaShape> = alpha
        .iter()
        .zip(beta)
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(_, (&a, &b))| BetaShape::new(a, b))
        .collect();
    Ok(integrate_max_prob(&BetaShape::new(a_i, b_i), &rivals))
}

/// `integral_0^1 pdf_target(x) * prod cdf_rival(x) dx`, split at `x = 1/2`.
fn integrate_max_prob(target: &BetaShape, rivals: &[BetaShape]) -> f64 {
    let integrand = |node: Node| {
        let mut v = target.weighted_pdf(&node);
        for r in rivals {
            if v == 0.0 {
                break;
            }
            v *= r.cdf(&node);
        }
        v
    };
    let lower = exp_sinh(|r| integrand(Node::near_zero(r)));
    let upper = exp_sinh(|r| integrand(Node::near_one(r)));
    (lower + upper).clamp(0.0, 1.0)
}
