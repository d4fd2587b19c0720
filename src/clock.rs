// Clock abstraction for testing time-dependent code
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Trait for abstracting time operations to enable deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current instant
    fn now(&self) -> Instant;

    /// Sleep for the given duration
    fn sleep(&self, duration: Duration);
}

/// System clock implementation using real time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// One-shot callback armed against a [`TestClock`] deadline.
struct Trigger {
    deadline: Instant,
    action: Box<dyn FnOnce() + Send>,
}

struct TestClockInner {
    start: Instant,
    offset: Mutex<Duration>,
    triggers: Mutex<Vec<Trigger>>,
}

/// Manually advanced clock for deterministic tests.
///
/// Holds a fixed start instant plus a grow-only offset; `now()` is always
/// `start + offset`. There is no API for moving time backward, so reads are
/// non-decreasing by construction. Handles are cheap clones sharing the same
/// underlying time, which is how a test and the code under test observe one
/// clock.
///
/// Deadlines scheduled against this clock (see [`crate::interrupter`]) fire
/// synchronously inside [`advance_by`](TestClock::advance_by), in the advancing
/// caller's thread. A test that advances past a deadline can assert its effect
/// on the very next line, with no real waiting.
#[derive(Clone)]
pub struct TestClock {
    inner: Arc<TestClockInner>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TestClockInner {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
                triggers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Move time forward by the given duration and fire any due triggers.
    pub fn advance_by(&self, duration: Duration) {
        let now = {
            let mut offset = self.inner.offset.lock().unwrap();
            *offset += duration;
            self.inner.start + *offset
        };
        self.fire_due(now);
    }

    /// Total time this clock has been advanced since creation.
    pub fn elapsed(&self) -> Duration {
        *self.inner.offset.lock().unwrap()
    }

    /// Register a one-shot action to run once the clock reaches `deadline`.
    ///
    /// An already-due deadline runs immediately, in the caller's thread.
    pub(crate) fn schedule(&self, deadline: Instant, action: Box<dyn FnOnce() + Send>) {
        let now = self.now();
        if deadline <= now {
            action();
            return;
        }
        self.inner
            .triggers
            .lock()
            .unwrap()
            .push(Trigger { deadline, action });
    }

    fn fire_due(&self, now: Instant) {
        // Take due triggers out under the lock, run them after releasing it, so
        // an action that reads the clock (or schedules again) doesn't deadlock.
        let due: Vec<Trigger> = {
            let mut triggers = self.inner.triggers.lock().unwrap();
            let (due, pending) = std::mem::take(&mut *triggers)
                .into_iter()
                .partition(|t| t.deadline <= now);
            *triggers = pending;
            due
        };
        for trigger in due {
            (trigger.action)();
        }
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.inner.start + *self.inner.offset.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        // In tests, sleeping consumes simulated time instead of real time
        self.advance_by(duration);
    }
}
