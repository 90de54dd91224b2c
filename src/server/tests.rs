use assert_approx_eq::assert_approx_eq;
use proptest::prelude::*;

use crate::error::DomainError;
use crate::server::*;
use crate::task::TaskSet;
use crate::utilization::utilization_factor;

use crate::tests::{constrained_task_set_strategy, implicit_task_set, task, task_set, task_set_strategy};

/// `max_{0 < t <= D} (t - C - sum ceil(t / T_i) * C_i)`, clamped at zero.
fn brute_force_ki(ts: &TaskSet, k: usize) -> u64 {
    let task = &ts[k];
    (1..=task.deadline())
        .map(|t| {
            let demand: u64 = task.execution_time()
                + ts.higher_priority(k)
                    .iter()
                    .map(|hp| t.div_ceil(hp.period()) * hp.execution_time())
                    .sum::<u64>();
            t as i64 - demand as i64
        })
        .max()
        .unwrap_or(0)
        .max(0) as u64
}

#[test]
fn ki_of_example() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);
    assert_eq!(find_ki(&ts), vec![2, 1, 1]);
}

#[test]
fn ki_of_single_task_is_its_laxity() {
    assert_eq!(find_ki(&task_set(&[(3, 10, 8)])), vec![5]);
    assert_eq!(find_ki(&task_set(&[(3, 10, 3)])), vec![0]);
}

#[test]
fn ki_of_unschedulable_task_is_zero() {
    let ts = implicit_task_set(&[(26, 70), (62, 100)]);
    assert_eq!(find_ki(&ts), vec![44, 0]);
}

#[test]
fn ki_without_representable_demand() {
    assert_eq!(find_ki(&task_set(&[(u64::MAX, u64::MAX, u64::MAX)])), vec![0]);
    assert_eq!(find_ki(&task_set(&[(u64::MAX - 3, u64::MAX, u64::MAX - 1)])), vec![2]);
}

#[test]
fn ki_of_empty_set() {
    assert!(find_ki(&TaskSet::new()).is_empty());
    assert!(server_capacity(&TaskSet::new()).is_empty());
}

#[test]
fn exact_server_capacity_of_example() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);
    let capacities = server_capacity(&ts);
    let expected = [(0.5, 3), (0.5, 4), (1.0, 6)];
    assert_eq!(capacities.len(), expected.len());
    for (c, (capacity, period)) in capacities.iter().zip(expected) {
        assert_approx_eq!(c.capacity, capacity);
        assert_eq!(c.period, period);
    }
}

#[test]
fn exact_server_capacity_from_precomputed_ki() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);
    let ki = find_ki(&ts);
    assert_eq!(server_capacity_from_ki(&ts, &ki), Ok(server_capacity(&ts)));
}

#[test]
fn exact_server_capacity_rejects_mismatched_ki() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4)]);
    assert_eq!(
        server_capacity_from_ki(&ts, &[1]),
        Err(DomainError::BudgetCountMismatch {
            expected: 2,
            got: 1
        })
    );
    assert_eq!(
        server_capacity_from_ki(&ts, &[1, 2, 3]),
        Err(DomainError::BudgetCountMismatch {
            expected: 2,
            got: 3
        })
    );
    assert_eq!(server_capacity_from_ki(&TaskSet::new(), &[]), Ok(vec![]));
}

#[test]
fn closed_form_server_utilizations() {
    assert_approx_eq!(polling_server_utilization(1, 0.1), 2.0 * (2f64.sqrt() - 1.0) - 0.1);
    assert_approx_eq!(polling_server_utilization(0, 0.0), 1.0);
    assert_approx_eq!(deferrable_server_utilization(1, 0.1).unwrap(), 0.75);
    // P = 1.25^3
    assert_approx_eq!(
        deferrable_server_utilization(3, 0.75).unwrap(),
        0.046875 / 2.90625
    );
    assert_eq!(deferrable_server_utilization(0, 0.0), Err(DomainError::NoTasks));
}

#[test]
fn closed_form_bounds_of_example() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);

    let polling = polling_server_bound(&ts).unwrap();
    let us = 4.0 * (2f64.powf(0.25) - 1.0) - 0.75;
    assert_eq!(polling.len(), 3);
    for (c, t) in polling.iter().zip(ts.iter()) {
        assert_eq!(c.period, t.period());
        assert_approx_eq!(c.capacity, us * t.period() as f64);
    }

    let deferrable = deferrable_server_bound(&ts).unwrap();
    assert_approx_eq!(deferrable[0].capacity, 3.0 * 0.046875 / 2.90625);
    assert_eq!(deferrable[2].period, 6);
}

#[test]
fn closed_form_bounds_without_capacity() {
    // U = 0.825 exceeds both thresholds for n = 3
    let ts = task_set(&[(2, 4, 4), (1, 5, 5), (1, 8, 8)]);
    assert_eq!(polling_server_bound(&ts), None);
    assert_eq!(deferrable_server_bound(&ts), None);
    // ... although an exact server capacity still exists
    assert!(server_capacity(&ts).iter().all(|c| c.capacity > 0.0));
}

#[test]
fn closed_form_bounds_of_empty_set() {
    assert_eq!(polling_server_bound(&TaskSet::new()), Some(vec![]));
    assert_eq!(deferrable_server_bound(&TaskSet::new()), Some(vec![]));
}

proptest! {
    #[test]
    fn ki_matches_brute_force(params in constrained_task_set_strategy(6)) {
        let ts: TaskSet = params.into_iter().collect();
        let ki = find_ki(&ts);
        prop_assert_eq!(ki.len(), ts.len());
        for (k, budget) in ki.iter().enumerate() {
            prop_assert_eq!(*budget, brute_force_ki(&ts, k));
        }
    }

    #[test]
    fn ki_grows_with_deadline(params in constrained_task_set_strategy(6), index in any::<prop::sample::Index>(), extra in 1u64..20) {
        let before: TaskSet = params.iter().copied().collect();
        let k = index.index(before.len());
        let mut relaxed = before[k];
        relaxed.set_deadline(relaxed.deadline() + extra).unwrap();
        let mut tasks: Vec<_> = before.iter().copied().collect();
        tasks[k] = relaxed;
        let after = TaskSet::from(tasks);
        prop_assert!(find_ki(&after)[k] >= find_ki(&before)[k]);
    }

    #[test]
    fn closed_form_capacities_are_sane(params in task_set_strategy(10)) {
        let ts: TaskSet = params.into_iter().collect();
        let u = utilization_factor(&ts);
        let n = ts.len() as f64;

        match polling_server_bound(&ts) {
            Some(capacities) => {
                for (c, t) in capacities.iter().zip(ts.iter()) {
                    prop_assert!(c.capacity > 0.0);
                    prop_assert!(c.capacity <= t.period() as f64);
                }
            }
            None => prop_assert!(u >= (n + 1.0) * (2f64.powf(1.0 / (n + 1.0)) - 1.0)),
        }

        match deferrable_server_bound(&ts) {
            Some(capacities) => {
                for (c, t) in capacities.iter().zip(ts.iter()) {
                    prop_assert!(c.capacity > 0.0);
                    prop_assert!(c.capacity <= t.period() as f64);
                }
            }
            None => prop_assert!((u / n + 1.0).powi(ts.len() as i32) >= 2.0),
        }
    }

    #[test]
    fn server_analyses_are_idempotent(params in constrained_task_set_strategy(6)) {
        let ts: TaskSet = params.into_iter().collect();
        prop_assert_eq!(find_ki(&ts), find_ki(&ts));
        prop_assert_eq!(server_capacity(&ts), server_capacity(&ts));
    }
}

#[test]
fn equal_periods_share_server_slot() {
    let mut ts = TaskSet::new();
    ts.add(task(1, 10, 10));
    ts.add(task(2, 10, 10));
    // k = [9, 7]; both servers see one instance per task period
    assert_eq!(find_ki(&ts), vec![9, 7]);
    let capacities = server_capacity(&ts);
    assert_approx_eq!(capacities[0].capacity, 7.0);
    assert_approx_eq!(capacities[1].capacity, 7.0);
}
