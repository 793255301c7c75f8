//! Dotted-path addressing for tree nodes.
//!
//! Paths address points in a parameter tree: `Device.Hosts.Host.3.HostName`
//! resolves through singleton objects and collection members down to a
//! scalar. Schema errors carry a [`Path`] so a misdeclared export is
//! reported with its full location.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dotted parameter path.
///
/// Paths are immutable; [`Path::append`] builds a child path without
/// touching the original. Ordering and equality are segment-wise, which
/// matches byte-wise ordering of the rendered string.
///
/// # Examples
///
/// ```
/// use arbor_core::Path;
///
/// let path = Path::from("Hosts.Host.3");
/// assert_eq!(path.segments(), &["Hosts", "Host", "3"]);
/// assert_eq!(path.append("HostName").to_string(), "Hosts.Host.3.HostName");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Create a path from pre-split segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// A new path with `segment` appended.
    pub fn append(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::new(s.split('.').map(String::from).collect())
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}
