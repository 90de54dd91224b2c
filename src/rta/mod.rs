/*! Exact response-time analysis for rate-monotonic task sets

For each task `k`, in priority order, the analysis searches for the
least fixed point of

```text
R = C_k + sum_{i < k} ceil(R / T_i) * C_i
```

and compares it against the task's deadline `D_k`. The search for a
task is abandoned as soon as the candidate exceeds `D_k`; the task
set is then not schedulable and no lower-priority task is analyzed.

All strategies compute the same least fixed point. They differ only in
how they get there:

- [Baseline] starts from the sum of the execution times of the task
  and all higher-priority tasks and recomputes the whole interference
  sum in each iteration.
- [MonotonicIncrement] ("RTA-2") remembers the largest interference
  contribution of each higher-priority task and advances the candidate
  immediately whenever a contribution grows.
- [ValidWindow] ("RTA-3") additionally remembers up to which instant
  each cached contribution remains valid and skips ceiling evaluations
  within that window.
- [JosephPandya] is the textbook formulation that starts every search
  from zero; it serves as an independent reference.

## Citations

- M. Joseph and P. Pandya, "Finding Response Times in a Real-Time System", *The Computer Journal*, 29(5), 1986.
- J. M. Urriza, R. Cayssials, and J. D. Orozco, "Fast Slack Stealing methods for Embedded Real Time Systems", *Proceedings of the 26th IEEE Real-Time Systems Symposium, WiP session*, 2005.
*/

use std::str::FromStr;

use auto_impl::auto_impl;
use derive_more::Display;
use tracing::{debug, trace};

use crate::error::DomainError;
use crate::fixed_point::{SearchFailure, SearchResult, SearchStats};
use crate::task::{Task, TaskSet};
use crate::time::{Duration, Instant, Service};

mod baseline;
mod incremental;
mod window;

pub use baseline::{Baseline, JosephPandya};
pub use incremental::MonotonicIncrement;
pub use window::ValidWindow;

/// The schedulability verdict of a response-time analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// All tasks meet their deadlines. The response-time bounds are
    /// listed in priority order, i.e., in the order of the task set.
    Schedulable { response_times: Vec<Duration> },
    /// The task at index `task` may miss its deadline `limit`. Tasks of
    /// lower priority have not been analyzed.
    NotSchedulable { task: usize, limit: Duration },
}

/// The result of a response-time analysis together with the work it
/// took to obtain it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    pub verdict: Verdict,
    pub stats: SearchStats,
}

impl Analysis {
    pub fn is_schedulable(&self) -> bool {
        matches!(self.verdict, Verdict::Schedulable { .. })
    }

    /// The per-task response-time bounds if the task set is schedulable.
    pub fn response_times(&self) -> Option<&[Duration]> {
        match &self.verdict {
            Verdict::Schedulable { response_times } => Some(response_times),
            Verdict::NotSchedulable { .. } => None,
        }
    }

    /// The index of the first task found to miss its deadline.
    pub fn failed_task(&self) -> Option<usize> {
        match self.verdict {
            Verdict::NotSchedulable { task, .. } => Some(task),
            Verdict::Schedulable { .. } => None,
        }
    }
}

/// The common interface of all response-time analysis variants.
#[auto_impl(&, Box, Rc)]
pub trait ResponseTimeStrategy {
    /// Analyze the given task set.
    fn solve(&self, tasks: &TaskSet) -> Analysis;
}

/// Selects one of the exact response-time analysis variants by name,
/// e.g., when read from a configuration file.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variant {
    #[default]
    #[display(fmt = "baseline")]
    Baseline,
    #[display(fmt = "rta2")]
    Rta2,
    #[display(fmt = "rta3")]
    Rta3,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Baseline, Variant::Rta2, Variant::Rta3];
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" | "rta" => Ok(Variant::Baseline),
            "rta2" | "rta-2" => Ok(Variant::Rta2),
            "rta3" | "rta-3" => Ok(Variant::Rta3),
            _ => Err(DomainError::UnknownVariant(s.to_string())),
        }
    }
}

impl ResponseTimeStrategy for Variant {
    fn solve(&self, tasks: &TaskSet) -> Analysis {
        match self {
            Variant::Baseline => Baseline.solve(tasks),
            Variant::Rta2 => MonotonicIncrement.solve(tasks),
            Variant::Rta3 => ValidWindow.solve(tasks),
        }
    }
}

/// Run the exact response-time analysis with the selected variant.
pub fn response_time_analysis(tasks: &TaskSet, variant: Variant) -> Analysis {
    variant.solve(tasks)
}

/// Run the Joseph & Pandya response-time test.
pub fn joseph_pandya(tasks: &TaskSet) -> Analysis {
    JosephPandya.solve(tasks)
}

/// The right-hand side of the response-time equation for task `task`
/// with higher-priority tasks `interfering`, evaluated at `t`.
/// Saturates at [Duration::MAX].
pub(crate) fn total_demand(
    task: &Task,
    interfering: &[Task],
    t: Instant,
    stats: &mut SearchStats,
) -> Service {
    interfering
        .iter()
        .map(|hp| stats.interference(t, hp))
        .fold(task.execution_time(), Service::saturating_add)
}

/// Drive the per-task searches in priority order and stop at the
/// first task whose search diverges.
fn analyze<F>(tasks: &TaskSet, mut bound_task: F) -> Analysis
where
    F: FnMut(usize, &mut SearchStats) -> SearchResult,
{
    let mut stats = SearchStats::default();
    let mut response_times = Vec::with_capacity(tasks.len());
    for k in 0..tasks.len() {
        match bound_task(k, &mut stats) {
            Ok(response_time) => {
                trace!(task = k, response_time, "response time converged");
                response_times.push(response_time);
            }
            Err(SearchFailure::DivergenceLimitExceeded { limit }) => {
                debug!(
                    task = k,
                    deadline = limit,
                    iterations = stats.iterations,
                    ceil_evaluations = stats.ceil_evaluations,
                    "task set not schedulable"
                );
                return Analysis {
                    verdict: Verdict::NotSchedulable { task: k, limit },
                    stats,
                };
            }
        }
    }
    debug!(
        tasks = tasks.len(),
        iterations = stats.iterations,
        ceil_evaluations = stats.ceil_evaluations,
        "task set schedulable"
    );
    Analysis {
        verdict: Verdict::Schedulable { response_times },
        stats,
    }
}
