//! Dotted path addressing into nested documents
//!
//! A path string like `a.b.0.c` is parsed once at the API boundary into
//! structured segments; an all-digit segment addresses a sequence index,
//! anything else a mapping key.

use std::fmt;

/// One step of a document descent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Key(String),
  Index(usize),
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Segment::Key(key) => write!(f, "{}", key),
      Segment::Index(index) => write!(f, "{}", index),
    }
  }
}

/// A parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
  raw: String,
  segments: Vec<Segment>,
}

impl PathSpec {
  /// Parse a dot-separated path string.
  ///
  /// Parsing never fails; unresolvable segments surface as path errors during
  /// the actual descent, where the document is known.
  pub fn parse(raw: &str) -> Self {
    let segments = raw
      .split('.')
      .map(|segment| match segment.parse::<usize>() {
        Ok(index) => Segment::Index(index),
        Err(_) => Segment::Key(segment.to_string()),
      })
      .collect();

    Self {
      raw: raw.to_string(),
      segments,
    }
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }
}

impl fmt::Display for PathSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.raw)
  }
}
