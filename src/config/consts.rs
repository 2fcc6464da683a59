use std::time::Duration;

/// Default number of workers per stage
pub const DEFAULT_CONCURRENCY: usize = 1;
/// Default capacity of a stage's input queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;
/// Default number of retries a stage grants a packet
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default pause before a stage re-invokes its transform
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(1);
/// Capacity of the queue between the last stage and the collector
pub const TERMINAL_QUEUE_CAPACITY: usize = 1;
