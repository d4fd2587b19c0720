// Interruption targets: the capability trait and the stock implementations
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Capability to interrupt a thread of execution.
///
/// The interrupter (see [`crate::interrupter`]) depends on this trait rather
/// than on any concrete thread type, so tests can substitute a recording stub
/// and production code can wire up whatever wake-up mechanism its workers
/// understand. Implementations must tolerate being called at most once per
/// interrupter but from an arbitrary thread.
pub trait Interruptible: Send + Sync {
    fn interrupt(&self);
}

/// Interruption status flag shared between a worker thread and its interrupter.
///
/// The flag is the stand-in for a runtime-level "interrupted" bit: the
/// interrupter raises it, the worker checks [`is_raised`](InterruptFlag::is_raised)
/// at its own cancellation points. Clones share the same flag. The store uses
/// `SeqCst` so a poller re-reading the flag from another thread observes the
/// raise without additional fencing.
#[derive(Clone, Debug, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

impl Interruptible for InterruptFlag {
    fn interrupt(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }
}

/// A parked thread is woken by `unpark`, the closest std primitive to
/// interrupting a blocked thread. Unparking a running or finished thread is a
/// no-op, matching "interrupting a dead thread does nothing".
impl Interruptible for thread::Thread {
    fn interrupt(&self) {
        self.unpark();
    }
}

/// Flag plus thread handle: raises the flag, then unparks the thread so a
/// parked worker wakes up and sees it. This is the full analogue of a classic
/// thread interrupt (status bit + wake-up).
pub struct ThreadInterrupt {
    flag: InterruptFlag,
    thread: thread::Thread,
}

impl ThreadInterrupt {
    pub fn new(thread: thread::Thread) -> Self {
        Self {
            flag: InterruptFlag::new(),
            thread,
        }
    }

    /// Handle the worker keeps to check for interruption.
    pub fn flag(&self) -> InterruptFlag {
        self.flag.clone()
    }
}

impl Interruptible for ThreadInterrupt {
    fn interrupt(&self) {
        self.flag.interrupt();
        self.thread.unpark();
    }
}
