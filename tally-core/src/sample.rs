// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The [`Sample`] record.

use crate::{
    error::AggregationError,
    histogram::BucketCounts,
    kind::{MergeKind, SampleKind},
    window::TimeWindow,
};

/// One statistical observation of a counter over a time window.
///
/// A sample carries every payload field, but only the ones selected by [`Sample::kind`] are
/// meaningful; the rest are left at their defaults by the constructors below. Samples are
/// decoded from machine responses (or produced by a previous merge) and treated as
/// read-only by aggregators, which work on their own copy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sample {
    /// Selects which payload fields are meaningful.
    pub kind: SampleKind,
    /// Start of the covered window, in milliseconds since the epoch.
    pub start_time: i64,
    /// End of the covered window, in milliseconds since the epoch.
    pub end_time: i64,
    /// [`SampleKind::HitCount`] payload.
    pub hit_count: u64,
    /// [`SampleKind::Histogram`] payload.
    pub histogram: BucketCounts,
    /// [`SampleKind::Minimum`] payload.
    pub min_value: f64,
    /// [`SampleKind::Maximum`] payload.
    pub max_value: f64,
    /// [`SampleKind::Average`] payload.
    pub average: f64,
    /// Number of observations folded into `min_value`, `max_value` or `average`.
    pub sample_count: u64,
}

impl Sample {
    /// A hit-count sample.
    pub fn hit_count(hit_count: u64) -> Self {
        Self {
            kind: SampleKind::HitCount,
            hit_count,
            ..Self::default()
        }
    }

    /// A histogram sample.
    pub fn histogram(histogram: impl Into<BucketCounts>) -> Self {
        Self {
            kind: SampleKind::Histogram,
            histogram: histogram.into(),
            ..Self::default()
        }
    }

    /// A minimum over `sample_count` observations.
    pub fn minimum(min_value: f64, sample_count: u64) -> Self {
        Self {
            kind: SampleKind::Minimum,
            min_value,
            sample_count,
            ..Self::default()
        }
    }

    /// A maximum over `sample_count` observations.
    pub fn maximum(max_value: f64, sample_count: u64) -> Self {
        Self {
            kind: SampleKind::Maximum,
            max_value,
            sample_count,
            ..Self::default()
        }
    }

    /// A mean over `sample_count` observations.
    pub fn average(average: f64, sample_count: u64) -> Self {
        Self {
            kind: SampleKind::Average,
            average,
            sample_count,
            ..Self::default()
        }
    }

    /// Set the covered window, in milliseconds since the epoch.
    pub fn with_window(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// The covered window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    /// Overwrite the covered window.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.start_time = window.start_ms;
        self.end_time = window.end_ms;
    }

    /// The kind as a mergeable kind, if it has a combination rule.
    pub fn merge_kind(&self) -> Result<MergeKind, AggregationError> {
        MergeKind::try_from(self.kind)
    }
}
