use super::{analyze, Analysis, ResponseTimeStrategy};
use crate::fixed_point;
use crate::task::TaskSet;
use crate::time::{Instant, Service};

/// Response-time iteration with validity windows ("RTA-3").
///
/// Extends [MonotonicIncrement][super::MonotonicIncrement]: together
/// with the cached interference `A_i = n_i * C_i` of each
/// higher-priority task, the strategy stores `n_i * T_i`, the last
/// instant up to which `ceil(t / T_i) = n_i` still holds. While the
/// candidate does not exceed that instant, the ceiling need not be
/// re-evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidWindow;

impl ResponseTimeStrategy for ValidWindow {
    fn solve(&self, tasks: &TaskSet) -> Analysis {
        let mut interference: Vec<Service> = vec![0; tasks.len()];
        let mut valid_until: Vec<Instant> = vec![0; tasks.len()];
        analyze(tasks, |k, stats| {
            if k > 0 {
                // one job of the previous task is pending until its next release
                let prev = &tasks[k - 1];
                interference[k - 1] = prev.execution_time();
                valid_until[k - 1] = prev.period();
            }
            let task = &tasks[k];
            let limit = task.deadline();
            let seed = interference[..k]
                .iter()
                .fold(task.execution_time(), |sum, a| sum.saturating_add(*a));
            fixed_point::search(seed, limit, stats, |mut t, stats| {
                let caches = interference.iter_mut().zip(valid_until.iter_mut());
                for ((cached, valid), hp) in caches.zip(tasks.higher_priority(k)) {
                    if t <= *valid {
                        continue;
                    }
                    let jobs = stats.releases(t, hp.period());
                    *valid = jobs.saturating_mul(hp.period());
                    let demand = jobs.saturating_mul(hp.execution_time());
                    if demand > *cached {
                        t = t.saturating_add(demand - *cached);
                        *cached = demand;
                        if t > limit {
                            break;
                        }
                    }
                }
                t
            })
        })
    }
}
