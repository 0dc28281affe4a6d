//! Maven-style artifact coordinates.
//!
//! A coordinate string is colon-delimited and comes in exactly two arities:
//! `group:artifact:version` or `group:artifact:classifier:version`. From a
//! parsed coordinate we derive the canonical jar filename and the
//! repository-relative path used both for remote fetches and for the
//! generated build targets.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from coordinate string parsing.
#[derive(Debug, Error)]
pub enum CoordsError {
  /// The string did not have 3 or 4 colon-separated segments.
  #[error("cannot parse maven coords '{coords}': expected group:artifact:version or group:artifact:classifier:version")]
  InvalidFormat { coords: String },
}

/// Parsed coordinates of a third-party jar in a Maven-layout repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenCoords {
  pub group: String,
  pub artifact: String,
  pub version: String,
  pub classifier: Option<String>,
}

impl MavenCoords {
  /// Canonical jar filename stem: `artifact-version[-classifier]`.
  pub fn filename(&self) -> String {
    let mut parts = vec![self.artifact.as_str(), self.version.as_str()];
    if let Some(classifier) = &self.classifier {
      parts.push(classifier.as_str());
    }
    parts.join("-")
  }

  /// Repository-relative path: `group/with/slashes/artifact/version/filename`.
  pub fn repo_path(&self) -> String {
    format!(
      "{}/{}/{}/{}",
      self.group.replace('.', "/"),
      self.artifact,
      self.version,
      self.filename()
    )
  }
}

impl FromStr for MavenCoords {
  type Err = CoordsError;

  fn from_str(coords: &str) -> Result<Self, Self::Err> {
    let parts: Vec<&str> = coords.split(':').collect();

    match parts.as_slice() {
      [group, artifact, version] => Ok(MavenCoords {
        group: group.to_string(),
        artifact: artifact.to_string(),
        version: version.to_string(),
        classifier: None,
      }),
      [group, artifact, classifier, version] => Ok(MavenCoords {
        group: group.to_string(),
        artifact: artifact.to_string(),
        version: version.to_string(),
        classifier: if classifier.is_empty() {
          None
        } else {
          Some(classifier.to_string())
        },
      }),
      _ => Err(CoordsError::InvalidFormat {
        coords: coords.to_string(),
      }),
    }
  }
}

impl fmt::Display for MavenCoords {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.classifier {
      Some(classifier) => write!(
        f,
        "{}:{}:{}:{}",
        self.group, self.artifact, classifier, self.version
      ),
      None => write!(f, "{}:{}:{}", self.group, self.artifact, self.version),
    }
  }
}
