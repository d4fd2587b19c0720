// Library interface for timewarp
// Deterministic time primitives for testing concurrent, time-dependent code

pub mod clock;
pub mod errors;
pub mod interrupt;
pub mod interrupter;
pub mod wait;

pub use clock::{Clock, SystemClock, TestClock};
pub use errors::{Result, TimewarpError};
pub use interrupt::{InterruptFlag, Interruptible, ThreadInterrupt};
pub use interrupter::{interrupt, Interrupter};
pub use wait::{wait_or_timeout, wait_or_timeout_with, Condition, SLEEP_PERIOD};
