// Deferred one-shot interruption with a guarded lifecycle state machine
use crate::clock::{Clock, TestClock};
use crate::errors::{Result, TimewarpError};
use crate::interrupt::Interruptible;
use log::debug;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// Lifecycle states. CREATED -> RUNNING -> (FIRED | CANCELLED); the terminal
// transition is a single compare-exchange, so fire and cancel can race freely
// and exactly one of them wins.
const CREATED: u8 = 0;
const RUNNING: u8 = 1;
const FIRED: u8 = 2;
const CANCELLED: u8 = 3;

/// Which timing mechanism drives the firing.
enum Timer {
    /// Background thread sleeps out the delay in real time.
    Real,
    /// Trigger registered with a test clock; fires inside `advance_by`.
    Deterministic(TestClock),
}

struct Shared {
    target: Box<dyn Interruptible>,
    state: AtomicU8,
}

impl Shared {
    /// Attempt the one-shot firing. Loses silently to an earlier cancel or an
    /// earlier fire; the target is only ever interrupted by the winner.
    fn try_fire(&self) {
        if self
            .state
            .compare_exchange(RUNNING, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("interrupter fired");
            self.target.interrupt();
        }
    }
}

/// Schedules a one-shot interrupt of a target after a delay.
///
/// Built by [`interrupt`], optionally reclocked with
/// [`using`](Interrupter::using), armed with [`after`](Interrupter::after):
///
/// ```no_run
/// use std::time::Duration;
/// use timewarp::{interrupt, InterruptFlag};
///
/// # fn main() -> timewarp::Result<()> {
/// let flag = InterruptFlag::new();
/// let interrupter = interrupt(flag.clone()).after(Duration::from_millis(50))?;
/// // ... later, if the work finished early:
/// interrupter.cancel();
/// # Ok(())
/// # }
/// ```
///
/// Once armed, the timer configuration is frozen: `using` fails with
/// [`TimewarpError::AlreadyStarted`]. The interrupt action runs at most once,
/// from the timer's own context, never from the target thread. Under a test
/// clock it runs in whichever thread advances the clock.
pub struct Interrupter {
    shared: Arc<Shared>,
    timer: Timer,
}

/// Create an interrupter for `target`, in the unarmed state, with the real
/// clock attached. No timer is active until [`Interrupter::after`] is called.
pub fn interrupt<T: Interruptible + 'static>(target: T) -> Interrupter {
    Interrupter {
        shared: Arc::new(Shared {
            target: Box::new(target),
            state: AtomicU8::new(CREATED),
        }),
        timer: Timer::Real,
    }
}

impl Interrupter {
    /// Replace the real clock with a deterministic one. Valid only before
    /// [`after`](Interrupter::after); the clock governing an already-ticking
    /// timer cannot be swapped.
    pub fn using(mut self, clock: TestClock) -> Result<Self> {
        if self.shared.state.load(Ordering::Acquire) != CREATED {
            return Err(TimewarpError::AlreadyStarted);
        }
        self.timer = Timer::Deterministic(clock);
        Ok(self)
    }

    /// Arm the timer: the target is interrupted once `delay` has elapsed on
    /// the attached clock, unless [`cancel`](Interrupter::cancel) wins first.
    ///
    /// Under the real clock a named background thread sleeps out the delay.
    /// Under a [`TestClock`] the firing happens synchronously inside the
    /// `advance_by` call that reaches the deadline, so tests can assert the
    /// effect immediately after advancing; a zero delay fires before `after`
    /// returns. Returns the handle used for cancellation.
    pub fn after(self, delay: Duration) -> Result<Self> {
        self.shared
            .state
            .compare_exchange(CREATED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TimewarpError::AlreadyStarted)?;
        debug!("interrupter armed for {:?}", delay);

        match &self.timer {
            Timer::Real => {
                let shared = Arc::clone(&self.shared);
                thread::Builder::new()
                    .name("timewarp-interrupter".into())
                    .spawn(move || {
                        thread::sleep(delay);
                        shared.try_fire();
                    })?;
            }
            Timer::Deterministic(clock) => {
                let shared = Arc::clone(&self.shared);
                let deadline = clock.now() + delay;
                clock.schedule(deadline, Box::new(move || shared.try_fire()));
            }
        }
        Ok(self)
    }

    /// Suppress the pending interrupt. Returns `true` if this call won the
    /// race against the firing; `false` if the interrupt already fired, was
    /// already cancelled, or was never armed. Safe to call from any thread,
    /// concurrently with the firing itself.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .shared
            .state
            .compare_exchange(RUNNING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            debug!("interrupter cancelled before firing");
        }
        cancelled
    }

    /// Whether the interrupt action has run.
    pub fn has_fired(&self) -> bool {
        self.shared.state.load(Ordering::Acquire) == FIRED
    }
}
