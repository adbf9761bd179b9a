// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregator;
pub mod config;
pub mod keyed;
pub mod value;

pub use aggregator::{Aggregator, WindowMode};
pub use config::{AggregatorConfig, CountOverflow};
pub use keyed::{AggregatedSample, KeyedAggregator};
