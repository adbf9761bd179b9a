// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Millisecond time windows.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The span of time a sample covers, as milliseconds since the Unix epoch.
///
/// Windows coming off the wire may be reversed (`start_ms > end_ms`). [`TimeWindow::union`]
/// normalizes both sides first, so a merged window always has `start_ms <= end_ms`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    /// Start of the window, inclusive.
    pub start_ms: i64,
    /// End of the window, inclusive.
    pub end_ms: i64,
}

impl TimeWindow {
    /// Create a window from raw millisecond timestamps.
    pub const fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Create a window from two wall-clock times.
    ///
    /// Times before the epoch map to negative timestamps.
    pub fn from_system_times(start: SystemTime, end: SystemTime) -> Self {
        Self::new(millis_since_epoch(start), millis_since_epoch(end))
    }

    /// The same window with its bounds in order.
    pub fn normalized(self) -> Self {
        if self.start_ms <= self.end_ms {
            self
        } else {
            Self::new(self.end_ms, self.start_ms)
        }
    }

    /// The smallest window covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self::new(a.start_ms.min(b.start_ms), a.end_ms.max(b.end_ms))
    }

    /// Whether `timestamp_ms` falls inside the window.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        let window = self.normalized();
        window.start_ms <= timestamp_ms && timestamp_ms <= window.end_ms
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        let window = self.normalized();
        Duration::from_millis(window.end_ms.abs_diff(window.start_ms))
    }
}

fn millis_since_epoch(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}
