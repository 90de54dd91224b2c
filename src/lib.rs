/*! Schedulability analysis for rate-monotonic periodic task sets

This crate answers whether a set of periodic tasks, scheduled with
fixed priorities assigned in rate-monotonic order (shorter period =
higher priority), meets all deadlines on a uniprocessor. It provides

- the utilization-based sufficient tests of Liu & Layland and Bini
  ([utilization]),
- exact response-time analysis in several variants that trade
  bookkeeping for fewer ceiling evaluations ([rta]),
- hyperperiod, slack, and idle-time computations ([hyperperiod]), and
- capacity bounds for polling and deferrable servers that serve
  aperiodic work alongside the periodic tasks ([server]).

All analyses are pure functions of a [TaskSet][task::TaskSet]. With
the `serde` feature enabled, task sets and analysis results can be
(de)serialized.

```
use rm_schedulability::rta::{self, Variant};
use rm_schedulability::task::{Task, TaskSet};

let ts: TaskSet = vec![
    Task::implicit(1, 4)?,
    Task::implicit(1, 5)?,
    Task::implicit(3, 9)?,
]
.into();
let analysis = rta::response_time_analysis(&ts, Variant::Rta3);
assert_eq!(analysis.response_times(), Some(&[1, 2, 7][..]));
# Ok::<(), rm_schedulability::error::DomainError>(())
```
*/

pub mod error;
pub mod fixed_point;
pub mod hyperperiod;
pub mod rta;
pub mod server;
pub mod task;
pub mod time;
pub mod utilization;
