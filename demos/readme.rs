use std::sync::Arc;

use sliding_window_counter::{CounterConfig, ScriptedTimeSource, SlidingWindowCounter};

// Run with `cargo run --example readme --features testing`
fn main() {
    const MINUTE: i64 = 60;
    let now: i64 = 1_700_000_000;

    // The first reading initializes the counter, then one reading per call.
    let clock = Arc::new(ScriptedTimeSource::new([
        now,
        now,
        now + MINUTE,
        now + MINUTE,
        now + 61 * MINUTE,
    ]));
    let config = CounterConfig::new().bucket_width_minutes(4);
    let mut counter = SlidingWindowCounter::with_config(config, Arc::clone(&clock));

    counter.increment();
    counter.increment(); // A minute later
    assert_eq!(counter.value(), 2);

    // Move forward an hour...
    // The counter forgot about both events
    assert_eq!(counter.value(), 0);
    assert_eq!(clock.remaining(), 0);
}
