use super::{analyze, Analysis, ResponseTimeStrategy};
use crate::fixed_point;
use crate::task::TaskSet;
use crate::time::Service;

/// Response-time iteration with monotonically growing interference
/// ("RTA-2").
///
/// For each higher-priority task `i`, the strategy caches the largest
/// interference `A_i = ceil(t / T_i) * C_i` observed so far. Since the
/// candidate `t` never decreases, neither does any `A_i`, and the
/// cache carries over from one task under analysis to the next. The
/// candidate is maintained as `C_k + sum A_i`; whenever a recomputed
/// contribution exceeds its cached value, the candidate advances by
/// the difference right away rather than at the end of the pass.
///
/// The search for task `k` hence starts at `R_{k-1} + C_k`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicIncrement;

impl ResponseTimeStrategy for MonotonicIncrement {
    fn solve(&self, tasks: &TaskSet) -> Analysis {
        let mut interference: Vec<Service> = vec![0; tasks.len()];
        analyze(tasks, |k, stats| {
            if k > 0 {
                // the previous task under analysis releases at least one job
                interference[k - 1] = tasks[k - 1].execution_time();
            }
            let task = &tasks[k];
            let limit = task.deadline();
            let seed = interference[..k]
                .iter()
                .fold(task.execution_time(), |sum, a| sum.saturating_add(*a));
            fixed_point::search(seed, limit, stats, |mut t, stats| {
                for (cached, hp) in interference.iter_mut().zip(tasks.higher_priority(k)) {
                    let demand = stats.interference(t, hp);
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
