// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counter;
pub mod error;
pub mod histogram;
pub mod kind;
pub mod sample;
pub mod window;

pub use counter::CounterPath;
pub use error::{AggregationError, InvalidCounterPath};
pub use histogram::BucketCounts;
pub use kind::{MergeKind, SampleKind};
pub use sample::Sample;
pub use window::TimeWindow;
