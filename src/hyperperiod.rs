/*! Hyperperiod, slack, and idle-time analysis

The schedule of a synchronous periodic task set repeats after its
hyperperiod, the least common multiple of all periods. Within one
hyperperiod, the processor idles for exactly [slack] time units.
*/

use num_integer::Integer;
use tracing::{debug, trace};

use crate::error::DomainError;
use crate::fixed_point::{self, SearchFailure, SearchStats};
use crate::task::TaskSet;
use crate::time::{Duration, Instant, Slack};
use crate::utilization::utilization_factor;

/// The least common multiple of all periods in the task set.
pub fn hyperperiod(tasks: &TaskSet) -> Result<Duration, DomainError> {
    let mut periods = tasks.iter().map(|t| t.period());
    let first = periods.next().ok_or(DomainError::EmptyTaskSet)?;
    periods.try_fold(first, |lcm, period| {
        (lcm / lcm.gcd(&period))
            .checked_mul(period)
            .ok_or(DomainError::HyperperiodOverflow)
    })
}

/// The idle time within one hyperperiod `H`, i.e., `H - sum (H / T_i) * C_i`.
///
/// The slack is negative iff the task set is over-utilized, and zero
/// iff the utilization is exactly one.
pub fn slack(tasks: &TaskSet) -> Result<Slack, DomainError> {
    let h = hyperperiod(tasks)?;
    let demand = tasks
        .iter()
        .map(|t| Slack::from(h / t.period()).saturating_mul(Slack::from(t.execution_time())))
        .fold(0, Slack::saturating_add);
    Ok(Slack::from(h).saturating_sub(demand))
}

/// Find the least `t` such that `t = slot_size + sum ceil(t / T_i) * C_i`,
/// i.e., the earliest instant by which the processor, after a
/// synchronous release of all tasks, has been idle for `slot_size`
/// time units in total.
///
/// The search terminates only if the task set leaves the processor
/// idle some of the time; task sets with a utilization of one or
/// more are rejected. If the hyperperiod is representable, this is
/// checked exactly through the [slack]; otherwise the floating-point
/// [utilization_factor] decides, and a utilization of one or more is
/// reported as [DomainError::HyperperiodOverflow] since no exact slack
/// exists to report. An idle slot that ends beyond [Duration::MAX]
/// yields [DomainError::TimeOverflow].
pub fn empty_slot(tasks: &TaskSet, slot_size: Duration) -> Result<Instant, DomainError> {
    if tasks.is_empty() {
        return Ok(slot_size);
    }
    let limit = match hyperperiod(tasks) {
        Ok(h) => {
            let slack = slack(tasks)?;
            if slack <= 0 {
                return Err(DomainError::Overutilized { slack });
            }
            // With U < 1, the fixed point lies within a finite number of
            // hyperperiods: every hyperperiod adds `slack` idle time.
            let hyperperiods = (Slack::from(slot_size) + slack - 1) / slack + 1;
            Duration::try_from(hyperperiods.saturating_mul(Slack::from(h))).unwrap_or(Duration::MAX)
        }
        Err(DomainError::HyperperiodOverflow) => {
            let utilization = utilization_factor(tasks);
            if utilization >= 1.0 {
                debug!(utilization, "hyperperiod overflows and utilization is not below one");
                return Err(DomainError::HyperperiodOverflow);
            }
            Duration::MAX
        }
        Err(e) => return Err(e),
    };

    let mut stats = SearchStats::default();
    let idle = fixed_point::search(slot_size, limit, &mut stats, |t, stats| {
        tasks
            .iter()
            .map(|task| stats.interference(t, task))
            .fold(slot_size, Duration::saturating_add)
    });
    trace!(
        slot_size,
        iterations = stats.iterations,
        ceil_evaluations = stats.ceil_evaluations,
        "idle-time search finished"
    );
    // the limit covers the fixed point unless it saturated
    idle.map_err(|SearchFailure::DivergenceLimitExceeded { .. }| DomainError::TimeOverflow)
}
