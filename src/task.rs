/*! The periodic task model and rate-monotonic task sets.

A [Task] is the classic Liu & Layland task characterized by a
worst-case execution time, a period, and a relative deadline. A
[TaskSet] keeps its tasks ordered by period, which under the
rate-monotonic policy is exactly the priority order: the task at
index 0 has the highest priority.
*/

use derive_more::Deref;

use crate::error::DomainError;
use crate::time::{Duration, Service};

/// A periodic task.
///
/// All three parameters are strictly positive. The deadline is not
/// required to be at most the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTask"))]
pub struct Task {
    execution_time: Service,
    period: Duration,
    deadline: Duration,
}

fn positive(parameter: &'static str, value: Duration) -> Result<Duration, DomainError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(DomainError::NonPositiveParameter { parameter, value })
    }
}

impl Task {
    /// Construct a new task with an explicit relative deadline.
    pub fn new(
        execution_time: Service,
        period: Duration,
        deadline: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Task {
            execution_time: positive("execution time", execution_time)?,
            period: positive("period", period)?,
            deadline: positive("deadline", deadline)?,
        })
    }

    /// Construct a task with an implicit deadline, i.e., a deadline
    /// equal to its period.
    pub fn implicit(execution_time: Service, period: Duration) -> Result<Self, DomainError> {
        Self::new(execution_time, period, period)
    }

    /// The worst-case execution time of each job.
    pub fn execution_time(&self) -> Service {
        self.execution_time
    }

    /// The separation between two consecutive job releases.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The relative deadline of each job.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// The fraction of processor time demanded by this task.
    pub fn utilization(&self) -> f64 {
        self.execution_time as f64 / self.period as f64
    }

    pub fn set_execution_time(&mut self, execution_time: Service) -> Result<(), DomainError> {
        self.execution_time = positive("execution time", execution_time)?;
        Ok(())
    }

    /// Change the period of a task.
    ///
    /// A task stored in a [TaskSet] cannot be mutated in place; take it
    /// out, change it, and build a new set so that the priority order
    /// is restored.
    pub fn set_period(&mut self, period: Duration) -> Result<(), DomainError> {
        self.period = positive("period", period)?;
        Ok(())
    }

    pub fn set_deadline(&mut self, deadline: Duration) -> Result<(), DomainError> {
        self.deadline = positive("deadline", deadline)?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTask {
    execution_time: Service,
    period: Duration,
    deadline: Duration,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTask> for Task {
    type Error = DomainError;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        Task::new(raw.execution_time, raw.period, raw.deadline)
    }
}

/// A collection of tasks in rate-monotonic priority order.
///
/// The set is always sorted by non-decreasing period. Tasks with equal
/// periods retain their insertion order, i.e., a task added earlier
/// has the higher priority. Read access is provided through
/// dereferencing to a slice of [Task]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Task>", into = "Vec<Task>"))]
#[deref(forward)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Construct an empty task set.
    pub fn new() -> Self {
        TaskSet { tasks: Vec::new() }
    }

    /// Insert a task at its rate-monotonic priority level.
    ///
    /// The new task is placed after all tasks with a period less than
    /// or equal to its own.
    pub fn add(&mut self, task: Task) {
        let pos = self
            .tasks
            .partition_point(|other| other.period() <= task.period());
        self.tasks.insert(pos, task);
    }

    /// The tasks in priority order (highest priority first).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The tasks that have a higher priority than the task at index `k`.
    pub fn higher_priority(&self, k: usize) -> &[Task] {
        &self.tasks[..k.min(self.tasks.len())]
    }
}

impl FromIterator<Task> for TaskSet {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut tasks: Vec<Task> = iter.into_iter().collect();
        // stable, so that ties keep their order of appearance
        tasks.sort_by_key(|t| t.period());
        TaskSet { tasks }
    }
}

impl From<Vec<Task>> for TaskSet {
    fn from(tasks: Vec<Task>) -> Self {
        tasks.into_iter().collect()
    }
}

impl From<TaskSet> for Vec<Task> {
    fn from(ts: TaskSet) -> Self {
        ts.tasks
    }
}

impl Extend<Task> for TaskSet {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            self.add(task);
        }
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
