//! File timestamp value object

use std::time::{SystemTime, UNIX_EPOCH};

/// Last-modified timestamp of a file, in nanoseconds since the Unix epoch.
///
/// Persisted as a `[high32, low32]` pair. A zero value means "never recorded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime(u64);

impl FileTime {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn from_parts(high: u32, low: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos().min(u64::MAX as u128) as u64)
            .unwrap_or(0);
        Self(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parts_round_trip() {
        let time = FileTime::from_nanos(0x0123_4567_89ab_cdef);
        assert_eq!(time.high(), 0x0123_4567);
        assert_eq!(time.low(), 0x89ab_cdef);
        assert_eq!(FileTime::from_parts(time.high(), time.low()), time);
    }

    #[test]
    fn ordering_follows_system_time() {
        let earlier = FileTime::from_system_time(UNIX_EPOCH + Duration::from_secs(10));
        let later = FileTime::from_system_time(UNIX_EPOCH + Duration::from_secs(11));
        assert!(earlier < later);
    }

    #[test]
    fn pre_epoch_time_is_zero() {
        let time = FileTime::from_system_time(UNIX_EPOCH - Duration::from_secs(1));
        assert!(time.is_zero());
    }
}
