#![doc = include_str!("../README.md")]

mod config;
mod time_source;

use std::fmt::Debug;

use tracing::{debug, trace};

pub use config::{ConfigError, CounterConfig, DEFAULT_BUCKET_WIDTH_MINUTES, WINDOW_MINUTES};
#[cfg(any(test, feature = "testing"))]
pub use time_source::ScriptedTimeSource;
pub use time_source::{SystemTimeSource, TimeSource};

const WINDOW_SECS: i64 = WINDOW_MINUTES as i64 * 60;

struct Window {
    buckets: Vec<usize>,
    start: i64,
    width_minutes: i64,
}

/// A counter answering how many events happened in the last 60 minutes.
///
/// The hour is split into `60 / bucket_width_minutes` buckets. Only the count per bucket is
/// stored, so memory is fixed and the answer is accurate to one bucket width.
///
/// ## Internal structure
///
/// The buckets are kept oldest first, the last one receiving new events.
/// Every call to [`increment`](Self::increment) or [`value`](Self::value) first reads the time source
/// and shifts the buckets left by as many widths as the window moved, zero filling the freed slots.
///
/// For instance, with a bucket width of 20 minutes:
/// ```text
///   ---------   ---------   ---------
///   |   3   |   |   0   |   |   5   |   <- increments land here
///   ---------   ---------   ---------
///       0           1           2
/// ```
/// After 20 minutes without events, bucket `0` is dropped and the layout becomes `[0, 5, 0]`.
///
/// The counter is not internally synchronized: wrap it in a `Mutex` to share it.
pub struct SlidingWindowCounter<T = SystemTimeSource> {
    config: CounterConfig,
    time_source: T,
    window: Option<Window>,
}

impl<T> Debug for SlidingWindowCounter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("SlidingWindowCounter");
        s.field("bucket_width_minutes", &self.config.bucket_width_minutes);
        match &self.window {
            Some(window) => s
                .field("buckets", &window.buckets)
                .field("window_start", &window.start),
            None => s.field("buckets", &"uninitialized"),
        };
        s.finish()
    }
}

impl SlidingWindowCounter {
    /// Create a counter with 4 minutes buckets reading the wall clock.
    pub fn new() -> Self {
        Self::with_config(CounterConfig::default(), SystemTimeSource)
    }
}

impl Default for SlidingWindowCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> SlidingWindowCounter<T> {
    /// Create a counter with the given configuration and time source.
    ///
    /// Neither is used until the first call to [`increment`](Self::increment) or [`value`](Self::value).
    pub fn with_config(config: CounterConfig, time_source: T) -> Self {
        Self {
            config,
            time_source,
            window: None,
        }
    }

    /// Register an event happening now.
    ///
    /// # Panics
    ///
    /// On first use, if the bucket width is not a divisor of 60.
    pub fn increment(&mut self) {
        let window = self.current_window();
        if let Some(newest) = window.buckets.last_mut() {
            *newest += 1;
        }
    }

    /// Number of events registered in the last 60 minutes.
    ///
    /// Events older than `60 - bucket_width_minutes` minutes may already be dropped,
    /// events older than 60 minutes always are.
    ///
    /// # Panics
    ///
    /// On first use, if the bucket width is not a divisor of 60.
    pub fn value(&mut self) -> usize {
        self.current_window().buckets.iter().sum()
    }

    /// Width of one bucket, as configured.
    pub fn bucket_width_minutes(&self) -> u32 {
        self.config.bucket_width_minutes
    }

    /// Number of buckets the hour is split into, `60 / bucket_width_minutes`.
    ///
    /// The width is not validated here: for a width that does not divide 60 this is the
    /// rounded down quotient (`0` for a zero width), and the counter panics on first use.
    pub fn bucket_count(&self) -> usize {
        self.config.bucket_count()
    }

    /// Lower edge of the bucket grid, one hour before the newest bucket opened.
    /// `None` until the counter is used.
    pub fn window_start(&self) -> Option<i64> {
        self.window.as_ref().map(|w| w.start)
    }

    /// Initialize the window if needed, then bring it up to the current time.
    fn current_window(&mut self) -> &mut Window {
        let config = &self.config;
        let time_source = &self.time_source;
        let window = self
            .window
            .get_or_insert_with(|| Window::new(config, time_source));

        let now = time_source.current_time();
        window.adjust_to(now);
        window
    }
}

impl Window {
    fn new(config: &CounterConfig, time_source: &impl TimeSource) -> Self {
        if let Err(err) = config.validate() {
            panic!("{err}");
        }

        let window = Self {
            buckets: vec![0; config.bucket_count()],
            start: time_source.current_time() - WINDOW_SECS,
            width_minutes: i64::from(config.bucket_width_minutes),
        };
        debug!(
            bucket_width_minutes = config.bucket_width_minutes,
            bucket_count = window.buckets.len(),
            window_start = window.start,
            "sliding window counter initialized"
        );
        window
    }

    fn adjust_to(&mut self, now: i64) {
        let hour_ago = now - WINDOW_SECS;
        if hour_ago < self.start {
            return;
        }

        let minutes_elapsed = (hour_ago - self.start) / 60;
        // Always move at least one bucket once the lower edge is reached.
        let buckets_to_shift = minutes_elapsed / self.width_minutes + 1;
        self.start += buckets_to_shift * self.width_minutes * 60;

        let len = self.buckets.len();
        let shift = usize::try_from(buckets_to_shift).map_or(len, |s| s.min(len));
        self.buckets.rotate_left(shift);
        self.buckets[len - shift..].fill(0);

        trace!(
            buckets_to_shift,
            window_start = self.start,
            "sliding window rotated"
        );
    }
}
