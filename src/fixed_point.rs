use derive_more::{Add, AddAssign};
use thiserror::Error;

use crate::task::Task;
use crate::time::{Duration, Instant, Service};

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, PartialOrd)]
pub enum SearchFailure {
    /// No fixed point found below the given divergence threshold.
    #[error("no fixed point less than or equal to {limit} found")]
    DivergenceLimitExceeded { limit: Duration },
}

pub type SearchResult = Result<Duration, SearchFailure>;

/// Observational counters of a fixed-point search. They have no
/// influence on the result; they exist to compare the efficiency of
/// different search strategies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Add, AddAssign)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of evaluations of the right-hand side (i.e., calls of
    /// the step function).
    pub iterations: u64,
    /// Number of ceiling-function evaluations `ceil(t / T_i)`.
    pub ceil_evaluations: u64,
}

impl SearchStats {
    /// Evaluate `ceil(t / period)` and count the evaluation.
    pub fn releases(&mut self, t: Instant, period: Duration) -> u64 {
        self.ceil_evaluations += 1;
        t.div_ceil(period)
    }

    /// Evaluate the ceiling interference term `ceil(t / T_i) * C_i` of
    /// a single interfering task and count the evaluation. Saturates at
    /// [Duration::MAX].
    pub fn interference(&mut self, t: Instant, task: &Task) -> Service {
        self.releases(t, task.period())
            .saturating_mul(task.execution_time())
    }
}

/// Conduct an iterative fixed point search, starting from `seed`, up
/// to a given divergence threshold.
///
/// The `step` function computes the next candidate from the current
/// one. It must be monotone, i.e., never yield a candidate smaller
/// than its input when started below the least fixed point. The
/// search converges once `step` no longer advances the candidate.
///
/// Step functions are expected to use saturating arithmetic. A
/// candidate of [Duration::MAX] cannot be told apart from an overflow
/// and is therefore treated as divergence, irrespective of the limit.
pub fn search<F>(
    seed: Duration,
    divergence_limit: Duration,
    stats: &mut SearchStats,
    mut step: F,
) -> SearchResult
where
    F: FnMut(Duration, &mut SearchStats) -> Duration,
{
    let mut assumed_response_time = seed;
    while assumed_response_time <= divergence_limit {
        stats.iterations += 1;
        let response_time_bound = step(assumed_response_time, stats);
        debug_assert!(response_time_bound >= assumed_response_time);
        if response_time_bound == Duration::MAX {
            // saturated, the actual bound is not representable
            break;
        }
        if response_time_bound <= assumed_response_time {
            // we have converged
            return Ok(response_time_bound);
        } else {
            // continue iterating
            assumed_response_time = response_time_bound
        }
    }
    // if we get here, we failed to converge => no solution
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
    })
}

/// Deadlines beyond which the debug-mode brute-force comparison is
/// skipped.
#[cfg(debug_assertions)]
pub(crate) const BRUTE_FORCE_HORIZON: Duration = 100_000;

/// Very slow, naive search for the least `t` in `1..=divergence_limit`
/// that satisfies `workload(t) <= t`. Do not use --- use [search]
/// instead.
#[cfg(debug_assertions)]
pub(crate) fn brute_force_search<RHS>(divergence_limit: Duration, workload: RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    (1..=divergence_limit)
        .find(|t| workload(*t) <= *t)
        .ok_or(SearchFailure::DivergenceLimitExceeded {
            limit: divergence_limit,
        })
}
