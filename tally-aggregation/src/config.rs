// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Aggregator configuration.
//!
//! The service's configuration layer owns loading and reloading; this module only defines
//! the section the engine reads. With the `serde` feature it deserializes from a fragment
//! such as `{"count_overflow": "wrap"}`, and every field is optional.

/// How `u64` counters behave when an addition would overflow.
///
/// Applies to hit counts, histogram bucket counts and observation counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CountOverflow {
    /// Clamp at `u64::MAX`.
    #[default]
    Saturate,
    /// Wrap around modulo 2^64.
    Wrap,
}

impl CountOverflow {
    /// Add two counts under this policy.
    #[inline]
    pub fn add(self, a: u64, b: u64) -> u64 {
        match self {
            Self::Saturate => a.saturating_add(b),
            Self::Wrap => a.wrapping_add(b),
        }
    }
}

/// Settings shared by every [`crate::Aggregator`] built from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
pub struct AggregatorConfig {
    /// Overflow behavior for count additions.
    pub count_overflow: CountOverflow,
}

impl AggregatorConfig {
    /// The default configuration: saturating counts.
    pub const fn new() -> Self {
        Self {
            count_overflow: CountOverflow::Saturate,
        }
    }

    /// Use `count_overflow` for count additions.
    pub const fn with_count_overflow(mut self, count_overflow: CountOverflow) -> Self {
        self.count_overflow = count_overflow;
        self
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::{AggregatorConfig, CountOverflow};

    #[test]
    fn overflow_policies() {
        check!(CountOverflow::Saturate.add(u64::MAX, 1) == u64::MAX);
        check!(CountOverflow::Wrap.add(u64::MAX, 1) == 0);
        check!(CountOverflow::Wrap.add(2, 3) == 5);
    }

    #[test]
    fn builder() {
        check!(AggregatorConfig::new() == AggregatorConfig::default());
        let config = AggregatorConfig::new().with_count_overflow(CountOverflow::Wrap);
        check!(config.count_overflow == CountOverflow::Wrap);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize() {
        let config: AggregatorConfig =
            serde_json::from_str(r#"{"count_overflow": "wrap"}"#).unwrap();
        check!(config.count_overflow == CountOverflow::Wrap);

        let config: AggregatorConfig = serde_json::from_str("{}").unwrap();
        check!(config == AggregatorConfig::new());

        check!(serde_json::from_str::<AggregatorConfig>(r#"{"count_overflow": "clamp"}"#).is_err());
    }
}
