/*! Utilization-based sufficient schedulability tests

This module provides the classic utilization bound of Liu & Layland
and the hyperbolic bound of Bini et al. for rate-monotonic scheduling
of implicit-deadline periodic tasks on a uniprocessor. Both tests are
*sufficient* only: a failed test is inconclusive, and an exact
verdict requires a response-time analysis (see [crate::rta]).

## Citations

- C. L. Liu and J. W. Layland, "Scheduling Algorithms for Multiprogramming in a Hard-Real-Time Environment", *Journal of the ACM*, 20(1), 1973.
- E. Bini, G. C. Buttazzo, and G. M. Buttazzo, "Rate Monotonic Analysis: The Hyperbolic Bound", *IEEE Transactions on Computers*, 52(7), 2003.
*/

use crate::error::DomainError;
use crate::task::TaskSet;

/// The outcome of a utilization-based test: the value computed for the
/// task set, the threshold it is compared against, and whether the
/// test passed (`value <= threshold`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtilizationTest {
    pub passed: bool,
    pub value: f64,
    pub threshold: f64,
}

impl UtilizationTest {
    fn compare(value: f64, threshold: f64) -> Self {
        UtilizationTest {
            passed: value <= threshold,
            value,
            threshold,
        }
    }
}

/// The total utilization `sum(C_i / T_i)` of the task set.
///
/// The utilization of an empty task set is zero.
pub fn utilization_factor(tasks: &TaskSet) -> f64 {
    tasks.iter().map(|t| t.utilization()).sum()
}

/// The Liu & Layland bound `n * (2^(1/n) - 1)` for `n` tasks.
pub fn liu_layland_bound(n: usize) -> Result<f64, DomainError> {
    if n == 0 {
        return Err(DomainError::NoTasks);
    }
    let n = n as f64;
    Ok(n * (2f64.powf(1.0 / n) - 1.0))
}

/// Compare the utilization of a non-empty task set against the Liu &
/// Layland bound for its size.
pub fn liu_layland_test(tasks: &TaskSet) -> Result<UtilizationTest, DomainError> {
    if tasks.is_empty() {
        return Err(DomainError::EmptyTaskSet);
    }
    let bound = liu_layland_bound(tasks.len())?;
    Ok(UtilizationTest::compare(utilization_factor(tasks), bound))
}

/// The hyperbolic product `prod(C_i / T_i + 1)`.
///
/// The product over an empty task set is one.
pub fn bini_bound(tasks: &TaskSet) -> f64 {
    tasks.iter().map(|t| t.utilization() + 1.0).product()
}

/// The hyperbolic bound test: the task set passes if
/// [bini_bound] does not exceed 2.
pub fn bini_test(tasks: &TaskSet) -> UtilizationTest {
    UtilizationTest::compare(bini_bound(tasks), 2.0)
}

#[cfg(test)]
mod tests;
