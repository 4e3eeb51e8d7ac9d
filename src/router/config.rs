/// Configuration shared by every listener of an [`SqsRouter`](super::SqsRouter).
///
/// # Fields
/// - `max_number_of_messages`: The maximum number of messages requested per poll.
/// - `wait_time_seconds`: The long polling wait time, in seconds.
/// - `max_concurrent_handlers`: Optional cap on in-flight async handler tasks per queue.
#[derive(Debug, Clone)]
pub struct SqsRouterConfig {
    /// The maximum number of messages requested per poll.
    pub max_number_of_messages: i32,

    /// The wait time for long polling, in seconds.
    ///
    /// A stop request is observed at the latest one poll round-trip after it is
    /// sent, so this also bounds how long `stop` waits on an idle queue.
    pub wait_time_seconds: i32,

    /// Upper bound on concurrently running handler tasks for each async queue.
    ///
    /// `None` spawns a task per message without limit. With a bound, a listener
    /// waits for a free slot before it polls again.
    pub max_concurrent_handlers: Option<usize>,
}

impl SqsRouterConfig {
    /// Sets how many messages each poll requests.
    pub fn with_max_number_of_messages(mut self, max: i32) -> Self {
        self.max_number_of_messages = max;
        self
    }

    /// Sets the long polling wait time, in seconds.
    pub fn with_wait_time_seconds(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    /// Caps concurrently running handler tasks for each async queue.
    pub fn with_max_concurrent_handlers(mut self, max: usize) -> Self {
        self.max_concurrent_handlers = Some(max);
        self
    }
}

impl Default for SqsRouterConfig {
    fn default() -> Self {
        SqsRouterConfig {
            max_number_of_messages: 1,
            wait_time_seconds: 10,
            max_concurrent_handlers: None,
        }
    }
}
