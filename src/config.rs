/// Minutes in the window the counter covers.
pub const WINDOW_MINUTES: u32 = 60;

/// Bucket width used when none is configured.
pub const DEFAULT_BUCKET_WIDTH_MINUTES: u32 = 4;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bucket width of {minutes} minutes must be a divisor of 60")]
    InvalidBucketWidth { minutes: u32 },
}

/// Construction-time settings of a [`SlidingWindowCounter`](crate::SlidingWindowCounter).
///
/// Nothing is validated here: an invalid width is reported by [`CounterConfig::validate`]
/// and is fatal the first time the counter is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    pub bucket_width_minutes: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            bucket_width_minutes: DEFAULT_BUCKET_WIDTH_MINUTES,
        }
    }
}

impl CounterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_width_minutes(mut self, minutes: u32) -> Self {
        self.bucket_width_minutes = minutes;
        self
    }

    /// Check that the bucket width splits the hour into whole buckets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let minutes = self.bucket_width_minutes;
        if minutes == 0 || WINDOW_MINUTES % minutes != 0 {
            return Err(ConfigError::InvalidBucketWidth { minutes });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        WINDOW_MINUTES
            .checked_div(self.bucket_width_minutes)
            .unwrap_or(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width() {
        let config = CounterConfig::default();
        assert_eq!(config.bucket_width_minutes, 4);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bucket_count(), 15);
    }

    #[test]
    fn test_divisors_are_valid() {
        for minutes in [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60] {
            let config = CounterConfig::new().bucket_width_minutes(minutes);
            assert_eq!(config.validate(), Ok(()), "{minutes}");
            assert_eq!(config.bucket_count() as u32 * minutes, 60);
        }
    }

    #[test]
    fn test_non_divisors_are_rejected() {
        for minutes in [0, 7, 8, 9, 25, 45, 61, 120] {
            let config = CounterConfig::new().bucket_width_minutes(minutes);
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidBucketWidth { minutes })
            );
        }
    }

    #[test]
    fn test_error_message() {
        let err = ConfigError::InvalidBucketWidth { minutes: 8 };
        assert_eq!(
            err.to_string(),
            "bucket width of 8 minutes must be a divisor of 60"
        );
    }
}
