use super::{analyze, total_demand, Analysis, ResponseTimeStrategy};
use crate::fixed_point;
use crate::task::TaskSet;
use crate::time::Service;

/// The plain response-time iteration.
///
/// The search for task `k` starts from `sum_{i <= k} C_i` and
/// recomputes the complete interference sum in every iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baseline;

/// The response-time test of Joseph & Pandya.
///
/// Identical to [Baseline] except that each search starts from zero
/// and no state whatsoever is shared between the searches for
/// different tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JosephPandya;

impl ResponseTimeStrategy for Baseline {
    fn solve(&self, tasks: &TaskSet) -> Analysis {
        analyze(tasks, |k, stats| {
            let task = &tasks[k];
            let interfering = tasks.higher_priority(k);
            let seed = tasks[..=k]
                .iter()
                .map(|t| t.execution_time())
                .fold(0, Service::saturating_add);
            let result = fixed_point::search(seed, task.deadline(), stats, |t, stats| {
                total_demand(task, interfering, t, stats)
            });
            // In debug mode, compare against the brute-force solution.
            #[cfg(debug_assertions)]
            debug_assert!(
                task.deadline() > fixed_point::BRUTE_FORCE_HORIZON
                    || fixed_point::brute_force_search(task.deadline(), |t| {
                        total_demand(task, interfering, t, &mut fixed_point::SearchStats::default())
                    }) == result
            );
            result
        })
    }
}

impl ResponseTimeStrategy for JosephPandya {
    fn solve(&self, tasks: &TaskSet) -> Analysis {
        analyze(tasks, |k, stats| {
            let task = &tasks[k];
            let interfering = tasks.higher_priority(k);
            fixed_point::search(0, task.deadline(), stats, |t, stats| {
                total_demand(task, interfering, t, stats)
            })
        })
    }
}
