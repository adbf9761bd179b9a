// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Sample kinds.
//!
//! [`SampleKind`] is the discriminator as it arrives from a machine, including values the
//! engine cannot combine. [`MergeKind`] is the closed set of kinds that have a combination
//! rule; getting from one to the other is the validation step every aggregator performs.

use std::fmt;

use crate::error::AggregationError;

/// The statistical shape of a [`crate::Sample`], as reported by its source.
///
/// Wire codes are stable: `Unset = 0`, `HitCount = 1`, `Histogram = 2`, `Minimum = 3`,
/// `Maximum = 4`, `Average = 5`, `Percentile = 6`. Any other code decodes to
/// [`SampleKind::Unknown`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i32", into = "i32"))]
pub enum SampleKind {
    /// No kind was set. Never valid for aggregation.
    #[default]
    Unset,
    /// A running total of hits.
    HitCount,
    /// Occurrence counts per integer bucket.
    Histogram,
    /// The smallest observed value.
    Minimum,
    /// The largest observed value.
    Maximum,
    /// A running mean.
    Average,
    /// A percentile estimate. Not combinable by this engine.
    Percentile,
    /// A wire code outside the known range.
    Unknown(i32),
}

impl SampleKind {
    /// Decode a wire code.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unset,
            1 => Self::HitCount,
            2 => Self::Histogram,
            3 => Self::Minimum,
            4 => Self::Maximum,
            5 => Self::Average,
            6 => Self::Percentile,
            other => Self::Unknown(other),
        }
    }

    /// The wire code for this kind.
    pub const fn code(self) -> i32 {
        match self {
            Self::Unset => 0,
            Self::HitCount => 1,
            Self::Histogram => 2,
            Self::Minimum => 3,
            Self::Maximum => 4,
            Self::Average => 5,
            Self::Percentile => 6,
            Self::Unknown(code) => code,
        }
    }
}

impl From<i32> for SampleKind {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<SampleKind> for i32 {
    fn from(kind: SampleKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::HitCount => f.write_str("hit count"),
            Self::Histogram => f.write_str("histogram"),
            Self::Minimum => f.write_str("minimum"),
            Self::Maximum => f.write_str("maximum"),
            Self::Average => f.write_str("average"),
            Self::Percentile => f.write_str("percentile"),
            Self::Unknown(code) => write!(f, "unknown kind {code}"),
        }
    }
}

/// A kind with a combination rule.
///
/// Matching on this enum is how merge rules are dispatched, so a new variant is a
/// compile error at every dispatch site until it gets a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MergeKind {
    /// See [`SampleKind::HitCount`].
    HitCount,
    /// See [`SampleKind::Histogram`].
    Histogram,
    /// See [`SampleKind::Minimum`].
    Minimum,
    /// See [`SampleKind::Maximum`].
    Maximum,
    /// See [`SampleKind::Average`].
    Average,
}

impl MergeKind {
    /// Every mergeable kind, in wire-code order.
    pub const ALL: [MergeKind; 5] = [
        Self::HitCount,
        Self::Histogram,
        Self::Minimum,
        Self::Maximum,
        Self::Average,
    ];
}

impl TryFrom<SampleKind> for MergeKind {
    type Error = AggregationError;

    fn try_from(kind: SampleKind) -> Result<Self, Self::Error> {
        match kind {
            SampleKind::HitCount => Ok(Self::HitCount),
            SampleKind::Histogram => Ok(Self::Histogram),
            SampleKind::Minimum => Ok(Self::Minimum),
            SampleKind::Maximum => Ok(Self::Maximum),
            SampleKind::Average => Ok(Self::Average),
            SampleKind::Unset | SampleKind::Percentile | SampleKind::Unknown(_) => {
                Err(AggregationError::UnsupportedKind(kind))
            }
        }
    }
}

impl From<MergeKind> for SampleKind {
    fn from(kind: MergeKind) -> Self {
        match kind {
            MergeKind::HitCount => Self::HitCount,
            MergeKind::Histogram => Self::Histogram,
            MergeKind::Minimum => Self::Minimum,
            MergeKind::Maximum => Self::Maximum,
            MergeKind::Average => Self::Average,
        }
    }
}

impl fmt::Display for MergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&SampleKind::from(*self), f)
    }
}
