// Condition polling with a bounded-sleep loop and a hard deadline
use crate::clock::{Clock, SystemClock};
use crate::errors::{Result, TimewarpError};
use log::trace;
use std::time::Duration;

/// Fixed sleep between predicate re-checks.
///
/// Callers must choose timeouts at least several multiples of this value;
/// with a timeout of the same order as the poll interval, a condition that
/// becomes true late in the window can be missed. That granularity is a
/// documented caller obligation, not a defect.
pub const SLEEP_PERIOD: Duration = Duration::from_millis(10);

/// A boolean predicate re-evaluated by the poller.
///
/// Blanket-implemented for closures, so `wait_or_timeout(|| flag.is_raised(), t)`
/// works directly.
pub trait Condition {
    fn is_satisfied(&self) -> bool;
}

impl<F> Condition for F
where
    F: Fn() -> bool,
{
    fn is_satisfied(&self) -> bool {
        self()
    }
}

/// Block the calling thread until `condition` is satisfied or `timeout` elapses.
///
/// Checks the condition, then sleeps [`SLEEP_PERIOD`] and retries until the
/// deadline passes, at which point it fails with
/// [`TimewarpError::Timeout`]. The timeout path doubles as a negative
/// assertion: catching it proves the condition stayed false for the whole
/// window.
///
/// Polls against the real system clock; the poller has to consume actual wall
/// time for the effect it waits on (produced by another thread) to appear.
pub fn wait_or_timeout<C: Condition>(condition: C, timeout: Duration) -> Result<()> {
    wait_or_timeout_with(condition, timeout, &SystemClock)
}

/// [`wait_or_timeout`] against an explicit clock.
pub fn wait_or_timeout_with<C: Condition>(
    condition: C,
    timeout: Duration,
    clock: &dyn Clock,
) -> Result<()> {
    let deadline = clock.now() + timeout;
    loop {
        if condition.is_satisfied() {
            return Ok(());
        }
        if clock.now() >= deadline {
            trace!("condition still unsatisfied after {:?}", timeout);
            return Err(TimewarpError::Timeout(timeout));
        }
        clock.sleep(SLEEP_PERIOD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TestClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_satisfied_condition_returns_immediately() {
        let clock = TestClock::new();
        wait_or_timeout_with(|| true, Duration::from_secs(1), &clock).unwrap();
        // No sleep was needed, so no simulated time was consumed
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_unsatisfied_condition_times_out() {
        let clock = TestClock::new();
        let result = wait_or_timeout_with(|| false, Duration::from_millis(100), &clock);

        match result {
            Err(TimewarpError::Timeout(t)) => assert_eq!(t, Duration::from_millis(100)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_condition_checked_every_sleep_period() {
        let clock = TestClock::new();
        let checks = AtomicUsize::new(0);

        let result = wait_or_timeout_with(
            || {
                checks.fetch_add(1, Ordering::SeqCst);
                false
            },
            SLEEP_PERIOD * 4,
            &clock,
        );

        assert!(result.is_err());
        // Initial check plus one per sleep until the deadline is reached
        assert_eq!(checks.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_condition_satisfied_mid_window_is_detected() {
        let clock = TestClock::new();
        let checks = AtomicUsize::new(0);

        // Becomes true on the third check, well inside a 4x SLEEP_PERIOD window
        wait_or_timeout_with(
            || checks.fetch_add(1, Ordering::SeqCst) >= 2,
            SLEEP_PERIOD * 4,
            &clock,
        )
        .unwrap();

        assert_eq!(checks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_timeout_gets_one_check() {
        let clock = TestClock::new();
        wait_or_timeout_with(|| true, Duration::ZERO, &clock).unwrap();

        let result = wait_or_timeout_with(|| false, Duration::ZERO, &clock);
        assert!(matches!(result, Err(TimewarpError::Timeout(_))));
    }
}
