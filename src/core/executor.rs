//! Executors invoked by the processor when an item falls due.

use async_trait::async_trait;

/// Abstraction for acting on an item once its scheduled time has passed.
///
/// The processor awaits each call before looking at the queue again, so an
/// executor that does long-running work should hand it off (for example by
/// spawning a task) instead of doing it inline.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_timer_queue::core::ItemExecutor;
///
/// struct ReminderSender;
///
/// #[async_trait]
/// impl ItemExecutor<Reminder> for ReminderSender {
///     async fn execute(&self, item: Reminder) {
///         deliver(item).await;
///     }
/// }
/// ```
#[async_trait]
pub trait ItemExecutor<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Handle an item that has become due.
    async fn execute(&self, item: T);
}

/// Adapter turning a plain closure into an [`ItemExecutor`].
#[derive(Clone)]
pub struct FnExecutor<F> {
    f: F,
}

impl<F> FnExecutor<F> {
    /// Wrap `f`.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, F> ItemExecutor<T> for FnExecutor<F>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    async fn execute(&self, item: T) {
        (self.f)(item);
    }
}
