use futures::future::BoxFuture;
use std::fmt::Debug;
use std::time::Duration;

/// Source of suspension for timed sequences. Injected so tests and
/// fast-forward modes can control how long a step actually waits.
pub trait Timer: Clone + Send + Sync + Debug + 'static {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Wall-clock timer backed by the tokio runtime. Under
/// `#[tokio::test(start_paused = true)]` it follows tokio's virtual clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Stretches or shrinks every requested duration by `factor`.
#[derive(Debug, Clone)]
pub struct ScaledTimer<T> {
    inner: T,
    factor: f64,
}

impl<T: Timer> ScaledTimer<T> {
    /// Non-finite or negative factors collapse to 0 (no waiting).
    pub fn new(inner: T, factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        Self { inner, factor }
    }

    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn scale(&self, duration: Duration) -> Duration {
        Duration::try_from_secs_f64(duration.as_secs_f64() * self.factor).unwrap_or(Duration::MAX)
    }
}

impl<T: Timer> Timer for ScaledTimer<T> {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.inner.sleep(self.scale(duration))
    }
}
