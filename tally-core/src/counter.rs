// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Counter addressing.
//!
//! Counters live in a `/`-separated hierarchy such as `/frontend/http/requests`. Query
//! requests address them under a `/counters` prefix, e.g. `/counters/frontend/http/requests`.

use std::{fmt, str::FromStr};

use crate::error::InvalidCounterPath;

const REQUEST_PREFIX: &str = "/counters";

/// A validated, absolute counter path.
///
/// A valid path starts with `/`, has no empty segments (so no `//` and no trailing `/`),
/// and contains neither backslashes nor whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CounterPath(String);

impl CounterPath {
    /// Validate `path` as a counter path.
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidCounterPath> {
        let path = path.into();
        validate(&path).map_err(|reason| InvalidCounterPath::new(path.as_str(), reason))?;
        Ok(Self(path))
    }

    /// Resolve a `/counters/<path>/<name>` request string.
    pub fn from_request(request: &str) -> Result<Self, InvalidCounterPath> {
        match request.strip_prefix(REQUEST_PREFIX) {
            Some(rest) if rest.starts_with('/') => Self::new(rest),
            _ => Err(InvalidCounterPath::new(
                request,
                "request must start with `/counters/`",
            )),
        }
    }

    /// The full path, including the leading `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the path.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// The enclosing path, or `None` for a top-level counter.
    pub fn parent(&self) -> Option<CounterPath> {
        match self.0.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(Self(self.0[..idx].to_owned())),
        }
    }

    /// The segments of the path, from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0[1..].split('/')
    }
}

fn validate(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("must start with `/`");
    }
    if path.contains('\\') {
        return Err("contains a backslash");
    }
    if path.chars().any(char::is_whitespace) {
        return Err("contains whitespace");
    }
    if path[1..].split('/').any(str::is_empty) {
        return Err("contains an empty segment");
    }
    Ok(())
}

impl fmt::Display for CounterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CounterPath {
    type Err = InvalidCounterPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CounterPath {
    type Error = InvalidCounterPath;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CounterPath> for String {
    fn from(path: CounterPath) -> Self {
        path.0
    }
}

impl AsRef<str> for CounterPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
