// Shared helpers for integration tests
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use timewarp::Interruptible;

/// Interruption target that records invocation count and the firing thread.
#[derive(Clone, Default)]
pub struct RecordingTarget {
    count: Arc<AtomicUsize>,
    firing_thread: Arc<Mutex<Option<ThreadId>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn was_interrupted(&self) -> bool {
        self.interrupt_count() > 0
    }

    pub fn firing_thread(&self) -> Option<ThreadId> {
        *self.firing_thread.lock().unwrap()
    }
}

impl Interruptible for RecordingTarget {
    fn interrupt(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.firing_thread.lock().unwrap() = Some(thread::current().id());
    }
}
