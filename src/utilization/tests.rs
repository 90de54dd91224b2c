use assert_approx_eq::assert_approx_eq;
use proptest::prelude::*;

use crate::error::DomainError;
use crate::task::TaskSet;
use crate::utilization::*;

use crate::tests::{implicit_task_set, task_set, task_set_strategy};

#[test]
fn utilization_of_example_sets() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);
    assert_approx_eq!(utilization_factor(&ts), 0.75);

    let ts = task_set(&[(1, 2, 2), (1, 3, 3), (1, 6, 6)]);
    assert_approx_eq!(utilization_factor(&ts), 1.0);

    assert_eq!(utilization_factor(&TaskSet::new()), 0.0);
}

#[test]
fn liu_layland_bound_values() {
    assert_eq!(liu_layland_bound(0), Err(DomainError::NoTasks));
    assert_approx_eq!(liu_layland_bound(1).unwrap(), 1.0);
    assert_approx_eq!(liu_layland_bound(2).unwrap(), 0.828427, 1e-6);
    assert_approx_eq!(liu_layland_bound(3).unwrap(), 0.779763, 1e-6);
    // converges towards ln 2
    assert_approx_eq!(liu_layland_bound(10_000).unwrap(), 2f64.ln(), 1e-4);
}

#[test]
fn liu_layland_test_on_examples() {
    let ok = liu_layland_test(&task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)])).unwrap();
    assert!(ok.passed);
    assert_approx_eq!(ok.value, 0.75);
    assert_approx_eq!(ok.threshold, 0.779763, 1e-6);

    let full = liu_layland_test(&task_set(&[(1, 2, 2), (1, 3, 3), (1, 6, 6)])).unwrap();
    assert!(!full.passed);

    assert_eq!(liu_layland_test(&TaskSet::new()), Err(DomainError::EmptyTaskSet));
}

#[test]
fn single_task_at_full_utilization_passes() {
    let ts = implicit_task_set(&[(5, 5)]);
    assert!(liu_layland_test(&ts).unwrap().passed);
    assert!(bini_test(&ts).passed);
}

#[test]
fn bini_on_examples() {
    let ts = task_set(&[(1, 3, 3), (1, 4, 4), (1, 6, 6)]);
    // (4/3) * (5/4) * (7/6) = 35/18
    assert_approx_eq!(bini_bound(&ts), 35.0 / 18.0);
    assert!(bini_test(&ts).passed);

    let ts = task_set(&[(1, 2, 2), (1, 3, 3), (1, 6, 6)]);
    // (3/2) * (4/3) * (7/6) = 7/3
    assert_approx_eq!(bini_bound(&ts), 7.0 / 3.0);
    assert!(!bini_test(&ts).passed);

    assert_eq!(bini_bound(&TaskSet::new()), 1.0);
    assert!(bini_test(&TaskSet::new()).passed);
}

#[test]
fn hyperbolic_bound_accepts_more_than_liu_layland() {
    // U = 0.83 exceeds the two-task bound, but 1.5 * 1.33 < 2
    let ts = implicit_task_set(&[(5, 10), (33, 100)]);
    let ll = liu_layland_test(&ts).unwrap();
    let bini = bini_test(&ts);
    assert!(!ll.passed);
    assert!(bini.passed);
}

proptest! {
    #[test]
    fn utilization_is_independent_of_insertion_order(params in task_set_strategy(10)) {
        let forward: TaskSet = params.iter().copied().collect();
        let mut backward = TaskSet::new();
        for t in params.iter().rev() {
            backward.add(*t);
        }
        let direct: f64 = params.iter().map(|t| t.execution_time() as f64 / t.period() as f64).sum();
        prop_assert!((utilization_factor(&forward) - direct).abs() < 1e-9);
        prop_assert!((utilization_factor(&backward) - direct).abs() < 1e-9);
    }

    #[test]
    fn liu_layland_pass_implies_bound_holds(params in task_set_strategy(10)) {
        let ts: TaskSet = params.into_iter().collect();
        let test = liu_layland_test(&ts).unwrap();
        let bound = liu_layland_bound(ts.len()).unwrap();
        prop_assert_eq!(test.threshold, bound);
        if test.passed {
            prop_assert!(utilization_factor(&ts) <= bound);
        }
    }

    #[test]
    fn hyperbolic_bound_dominates_liu_layland(params in task_set_strategy(10)) {
        let ts: TaskSet = params.into_iter().collect();
        if liu_layland_test(&ts).unwrap().passed {
            prop_assert!(bini_test(&ts).passed);
        }
    }
}
