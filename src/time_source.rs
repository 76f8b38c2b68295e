use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Supplies the current time as seconds since the Unix epoch.
///
/// The counter queries it once per initialisation and once per public operation,
/// so the readings it returns must be non-decreasing.
pub trait TimeSource {
    fn current_time(&self) -> i64;
}

/// Wall clock. This is the default time source of the counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn current_time(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            // clock set before 1970
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_time(&self) -> i64 {
        (**self).current_time()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_time(&self) -> i64 {
        (**self).current_time()
    }
}

#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedTimeSource;

#[cfg(any(test, feature = "testing"))]
mod scripted {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::TimeSource;

    /// A time source replaying a fixed sequence of readings.
    ///
    /// Querying it more times than it has readings is a bug in the test using it,
    /// so it panics.
    #[derive(Debug)]
    pub struct ScriptedTimeSource {
        times: Vec<i64>,
        next: AtomicUsize,
    }

    impl ScriptedTimeSource {
        pub fn new(times: impl IntoIterator<Item = i64>) -> Self {
            Self {
                times: times.into_iter().collect(),
                next: AtomicUsize::new(0),
            }
        }

        /// Number of readings not yet handed out.
        pub fn remaining(&self) -> usize {
            self.times
                .len()
                .saturating_sub(self.next.load(Ordering::Relaxed))
        }
    }

    impl TimeSource for ScriptedTimeSource {
        fn current_time(&self) -> i64 {
            let i = self.next.fetch_add(1, Ordering::Relaxed);
            match self.times.get(i) {
                Some(t) => *t,
                None => panic!("unexpected current_time call"),
            }
        }
    }
}
