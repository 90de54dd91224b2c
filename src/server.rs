/*! Capacity of aperiodic servers alongside a rate-monotonic task set

A polling or deferrable server is a virtual periodic task that reserves
processor time for aperiodic requests. This module determines how much
capacity such a server may be given at each rate-monotonic priority
level without endangering any periodic deadline:

- exactly, from the per-task interference budget `k_i` (see [find_ki]
  and [server_capacity]), and
- by the closed-form utilization bounds for polling and deferrable
  servers ([polling_server_bound], [deferrable_server_bound]), which
  are sufficient only.

## Citations

- J. P. Lehoczky, L. Sha, and J. K. Strosnider, "Enhanced Aperiodic Responsiveness in Hard Real-Time Environments", *Proceedings of the 8th IEEE Real-Time Systems Symposium*, 1987.
- J. K. Strosnider, J. P. Lehoczky, and L. Sha, "The Deferrable Server Algorithm for Enhanced Aperiodic Responsiveness in Hard Real-Time Environments", *IEEE Transactions on Computers*, 44(1), 1995.
*/

use itertools::Itertools;
use tracing::{debug, trace};

use crate::error::DomainError;
use crate::fixed_point::{self, SearchStats};
use crate::rta::total_demand;
use crate::task::{Task, TaskSet};
use crate::time::{Duration, Instant, Service};
use crate::utilization::utilization_factor;

/// A server budget of `capacity` time units replenished every
/// `period` time units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerCapacity {
    pub capacity: f64,
    pub period: Duration,
}

/// The largest amount of additional demand `k` such that
/// `t = k + C + sum ceil(t / T_i) * C_i` still has a solution no
/// larger than the task's deadline.
#[allow(non_snake_case)]
fn absorbable_demand(task: &Task, interfering: &[Task], stats: &mut SearchStats) -> Service {
    let limit = task.deadline();
    let mut k: Service = 0;
    // the fixed point for k + 1 is no smaller than the one for k
    let mut R: Instant = 0;
    loop {
        let extra = k + 1;
        let result = fixed_point::search(R, limit, stats, |t, stats| {
            extra.saturating_add(total_demand(task, interfering, t, stats))
        });
        match result {
            Ok(response_time) => {
                k = extra;
                R = response_time;
            }
            Err(_) => return k,
        }
    }
}

/// For each task, the maximum additional higher-priority demand it can
/// tolerate within its deadline.
///
/// A task that cannot absorb any additional demand, including a task
/// that misses its deadline even without additional demand, yields 0.
pub fn find_ki(tasks: &TaskSet) -> Vec<Service> {
    let mut stats = SearchStats::default();
    let ki = tasks
        .iter()
        .enumerate()
        .map(|(k, task)| absorbable_demand(task, tasks.higher_priority(k), &mut stats))
        .collect();
    trace!(
        iterations = stats.iterations,
        ceil_evaluations = stats.ceil_evaluations,
        "interference budgets computed"
    );
    ki
}

/// The exact server capacity at each priority level, derived from the
/// per-task budgets `ki` computed by [find_ki].
///
/// A server with the period of task `k` may execute for
/// `min_{i >= k} ki[i] / ceil(T_i / T_k)` time units per period.
/// Fails unless `ki` holds exactly one budget per task.
pub fn server_capacity_from_ki(
    tasks: &TaskSet,
    ki: &[Service],
) -> Result<Vec<ServerCapacity>, DomainError> {
    if tasks.len() != ki.len() {
        return Err(DomainError::BudgetCountMismatch {
            expected: tasks.len(),
            got: ki.len(),
        });
    }
    Ok(capacities_from_ki(tasks, ki))
}

fn capacities_from_ki(tasks: &TaskSet, ki: &[Service]) -> Vec<ServerCapacity> {
    tasks
        .iter()
        .enumerate()
        .map(|(k, server)| {
            let capacity = tasks[k..]
                .iter()
                .zip_eq(&ki[k..])
                .map(|(task, budget)| {
                    let instances = task.period().div_ceil(server.period());
                    *budget as f64 / instances as f64
                })
                .fold(f64::INFINITY, f64::min);
            ServerCapacity {
                capacity,
                period: server.period(),
            }
        })
        .collect()
}

/// The exact server capacity at each priority level.
pub fn server_capacity(tasks: &TaskSet) -> Vec<ServerCapacity> {
    capacities_from_ki(tasks, &find_ki(tasks))
}

/// The polling-server utilization bound `(n+1) * (2^(1/(n+1)) - 1) - U`
/// for `n` periodic tasks of total utilization `U`.
pub fn polling_server_utilization(n: usize, utilization: f64) -> f64 {
    let m = (n + 1) as f64;
    m * (2f64.powf(1.0 / m) - 1.0) - utilization
}

/// The deferrable-server utilization bound
/// `(2 - P) / (2P - 1)` with `P = (U/n + 1)^n` for `n` periodic tasks
/// of total utilization `U`.
pub fn deferrable_server_utilization(n: usize, utilization: f64) -> Result<f64, DomainError> {
    if n == 0 {
        return Err(DomainError::NoTasks);
    }
    let p = (utilization / n as f64 + 1.0).powi(n as i32);
    Ok((2.0 - p) / (2.0 * p - 1.0))
}

fn capacities(tasks: &TaskSet, server_utilization: f64, kind: &str) -> Option<Vec<ServerCapacity>> {
    if server_utilization <= 0.0 {
        debug!(server_utilization, kind, "bound certifies no server capacity");
        return None;
    }
    Some(
        tasks
            .iter()
            .map(|t| ServerCapacity {
                capacity: server_utilization * t.period() as f64,
                period: t.period(),
            })
            .collect(),
    )
}

/// Polling-server capacities at each priority level according to the
/// closed-form bound, or `None` if the bound is not positive.
pub fn polling_server_bound(tasks: &TaskSet) -> Option<Vec<ServerCapacity>> {
    let us = polling_server_utilization(tasks.len(), utilization_factor(tasks));
    capacities(tasks, us, "polling")
}

/// Deferrable-server capacities at each priority level according to the
/// closed-form bound, or `None` if the bound is not positive.
pub fn deferrable_server_bound(tasks: &TaskSet) -> Option<Vec<ServerCapacity>> {
    match deferrable_server_utilization(tasks.len(), utilization_factor(tasks)) {
        Ok(us) => capacities(tasks, us, "deferrable"),
        // no periodic task constrains the server
        Err(_) => Some(Vec::new()),
    }
}

#[cfg(test)]
mod tests;
