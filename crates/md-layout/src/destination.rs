//! Link and image destination validation.

use std::fmt;

use url::Url;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base used only to check that relative references are well formed.
const RELATIVE_BASE: &str = "relative-base:///";

/// A destination that is safe to hand to a navigable or loading fragment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Destination {
    /// Absolute URI such as `https://example.com/a`.
    Absolute(Url),
    /// Relative reference such as `guide.md#setup`, resolved by the host.
    Relative(String),
}

/// Why a destination string was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("destination is empty")]
    Empty,
    #[error("destination contains whitespace")]
    Whitespace,
    #[error("malformed destination: {0}")]
    Malformed(#[from] url::ParseError),
}

impl Destination {
    /// Validate a raw destination string.
    pub fn parse(raw: &str) -> Result<Self, DestinationError> {
        if raw.is_empty() {
            return Err(DestinationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(DestinationError::Whitespace);
        }

        match Url::parse(raw) {
            Ok(url) => Ok(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(RELATIVE_BASE)?;
                base.join(raw)?;
                Ok(Self::Relative(raw.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate an optional destination, logging why it was dropped.
    pub(crate) fn resolve(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        match Self::parse(raw) {
            Ok(destination) => Some(destination),
            Err(e) => {
                tracing::debug!(destination = raw, error = %e, "Ignoring invalid destination");
                None
            }
        }
    }

    /// The destination as written (absolute URIs are normalized).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(raw) => raw,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
