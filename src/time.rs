/// All analyses use a discrete time model: execution times, periods,
/// and deadlines are integral multiples of some base unit (e.g.,
/// microseconds or processor ticks).
pub type Time = u64;

/// A point in time, relative to the synchronous release of all tasks.
pub type Instant = Time;

/// The length of an interval, e.g., a period or a deadline.
pub type Duration = Time;

/// An amount of processor service, e.g., an execution time.
pub type Service = Time;

/// Signed time difference, used where demand may exceed capacity
/// (e.g., the slack of an over-utilized task set).
pub type Slack = i128;
