use thiserror::Error;

use crate::time::{Slack, Time};

/// Error type returned when an operation is undefined for the given
/// input.
///
/// Note that a task set failing a schedulability test is *not* an
/// error; see [Verdict][crate::rta::Verdict] instead.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DomainError {
    /// The operation requires at least one task.
    #[error("operation is undefined for an empty task set")]
    EmptyTaskSet,
    /// The Liu & Layland bound is undefined for zero tasks.
    #[error("the Liu & Layland bound is undefined for n = 0")]
    NoTasks,
    /// Task parameters must be strictly positive.
    #[error("task {parameter} must be positive (got {value})")]
    NonPositiveParameter { parameter: &'static str, value: Time },
    /// The idle-time search only terminates if the processor is not
    /// fully utilized.
    #[error("utilization must be below 1 (hyperperiod slack is {slack})")]
    Overutilized { slack: Slack },
    /// The least common multiple of the periods does not fit in a [Time].
    #[error("hyperperiod exceeds the representable time range")]
    HyperperiodOverflow,
    /// A result does not fit in a [Time].
    #[error("result exceeds the representable time range")]
    TimeOverflow,
    /// [server_capacity_from_ki][crate::server::server_capacity_from_ki]
    /// requires exactly one budget per task.
    #[error("expected {expected} interference budgets, got {got}")]
    BudgetCountMismatch { expected: usize, got: usize },
    /// Unrecognized response-time analysis variant name.
    #[error("unknown response-time analysis variant `{0}`")]
    UnknownVariant(String),
}
