// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Error types.

use std::fmt;

use crate::kind::{MergeKind, SampleKind};

/// The reasons an aggregator can refuse a sample.
///
/// All of these are reported at the offending call and leave the aggregator unchanged. None
/// of them are retryable: whether a rejected per-machine response is dropped or treated as a
/// partial failure is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregationError {
    /// A required input was missing, for example constructing from no seed at all.
    InvalidArgument(&'static str),
    /// The sample's kind has no combination rule.
    UnsupportedKind(SampleKind),
    /// The sample's kind differs from the kind the aggregator was seeded with.
    KindMismatch {
        /// The aggregator's kind.
        expected: MergeKind,
        /// The kind of the rejected sample.
        actual: SampleKind,
    },
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::UnsupportedKind(kind) => write!(f, "cannot aggregate samples of kind `{kind}`"),
            Self::KindMismatch { expected, actual } => write!(
                f,
                "sample of kind `{actual}` does not match aggregate of kind `{expected}`"
            ),
        }
    }
}

impl std::error::Error for AggregationError {}

/// Returned when a string is not a valid counter path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidCounterPath {
    path: String,
    reason: &'static str,
}

impl InvalidCounterPath {
    pub(crate) fn new(path: impl Into<String>, reason: &'static str) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    /// The rejected input.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Why the input was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for InvalidCounterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid counter path {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for InvalidCounterPath {}
