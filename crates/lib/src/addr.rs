//! Path/goal addressing.
//!
//! Build targets are addressed as `//root/path:goal`. A bare path defaults
//! its goal to the final path segment, so `lib/util` means `lib/util:util`.
//! A [`GoalsPathVar`] carries a repository root, a relative path, and an
//! alias table; combining it with a suffix either composes a full address or
//! short-circuits through the alias table. The same semantics are rendered
//! into the generated path-alias file, so this module is the single source
//! of truth for how addresses resolve.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Errors from `path[:goal]` expression parsing.
#[derive(Debug, Error)]
pub enum AddrError {
  /// More than one `:` separator.
  #[error("cannot parse path:goal '{0}': too many ':' separators")]
  TooManySeparators(String),

  /// Empty path component.
  #[error("cannot parse path:goal '{0}': empty path")]
  EmptyPath(String),
}

/// A normalized `path:goal` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGoal {
  pub path: String,
  pub goal: String,
}

impl PathGoal {
  /// Parse a `path[:goal]` expression, defaulting the goal to the final
  /// path segment when omitted.
  pub fn parse(expr: &str) -> Result<Self, AddrError> {
    let mut parts = expr.split(':');
    let path = parts.next().unwrap_or_default();

    if path.is_empty() {
      return Err(AddrError::EmptyPath(expr.to_string()));
    }

    let goal = match parts.next() {
      Some(goal) => {
        if parts.next().is_some() {
          return Err(AddrError::TooManySeparators(expr.to_string()));
        }
        goal.to_string()
      }
      None => path.rsplit('/').next().unwrap_or(path).to_string(),
    };

    Ok(PathGoal {
      path: path.to_string(),
      goal,
    })
  }
}

impl fmt::Display for PathGoal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.path, self.goal)
  }
}

/// An addressable reference root: `(root, path, alias table)`.
///
/// Alias keys and values are normalized `path:goal` strings; the table is
/// normalized once at registry construction, so lookups here never
/// re-normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalsPathVar {
  root: String,
  path: String,
  alias: BTreeMap<String, String>,
}

impl GoalsPathVar {
  pub fn new(root: impl Into<String>, path: impl Into<String>, alias: BTreeMap<String, String>) -> Self {
    Self {
      root: root.into(),
      path: path.into(),
      alias,
    }
  }

  pub fn root(&self) -> &str {
    &self.root
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn alias(&self) -> &BTreeMap<String, String> {
    &self.alias
  }

  /// Combine this root with a `path[:goal]` suffix.
  ///
  /// The suffix is normalized first; if the normalized form is an alias key
  /// the aliased value is returned verbatim, letting a module redirect a
  /// reference to an arbitrary target.
  pub fn combine(&self, suffix: &str) -> Result<String, AddrError> {
    let normalized = PathGoal::parse(suffix)?.to_string();

    if let Some(aliased) = self.alias.get(&normalized) {
      return Ok(aliased.clone());
    }

    Ok(format!("{}/{}", self, normalized))
  }
}

impl fmt::Display for GoalsPathVar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = format!("{}{}", self.root, self.path);
    write!(f, "//{}", joined.trim_start_matches('/'))
  }
}
