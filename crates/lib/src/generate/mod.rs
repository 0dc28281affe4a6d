//! Artifact generators.
//!
//! Each generator renders text or a set of symlinks from the same immutable
//! [`Registry`](crate::registry::Registry) snapshot; filesystem writes are
//! isolated at the module boundaries so rendering stays pure. The
//! orchestrator runs them in a fixed order: build targets (which need remote
//! metadata) first, then path aliases, then the symlink farm, then the IDE
//! descriptors.

pub mod buck;
pub mod defs;
pub mod eclipse;
pub mod idea;
pub mod links;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::addr::AddrError;
use crate::fetch::{FetchError, HashFetcher};
use crate::registry::Registry;

/// Errors that can occur during artifact generation. All are fatal: a
/// partially generated artifact set would be internally inconsistent.
#[derive(Debug, Error)]
pub enum GenerateError {
  /// Remote digest retrieval failed.
  #[error(transparent)]
  Fetch(#[from] FetchError),

  /// A registered link expression failed to resolve.
  #[error(transparent)]
  Addr(#[from] AddrError),

  /// Failed to write a generated file.
  #[error("cannot write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to create a directory.
  #[error("cannot create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to remove a directory tree that is about to be rebuilt.
  #[error("cannot clear '{path}': {source}")]
  ClearDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to create a symbolic link.
  #[error("cannot symlink '{link}' -> '{target}': {source}")]
  Symlink {
    link: PathBuf,
    target: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Run every generator against the registry snapshot.
///
/// Remote digests are fetched up front, one request at a time, so that
/// nothing is written when any fetch fails.
pub async fn generate(
  root_dir: &Path,
  registry: &Registry,
  fetcher: &HashFetcher,
) -> Result<(), GenerateError> {
  let hashes = buck::fetch_library_hashes(registry, fetcher).await?;

  buck::generate_buck(root_dir, registry, fetcher.repo_url(), &hashes)?;
  defs::generate_defs(root_dir, registry)?;
  links::generate_links(root_dir, registry)?;
  idea::generate_idea(root_dir, registry)?;
  eclipse::generate_eclipse(root_dir, registry)?;

  info!("generation complete");
  Ok(())
}

/// Header line carried by every generated file.
pub(crate) fn generated_header(registry: &Registry) -> String {
  format!("Generated using up {}", registry.origins().join(" "))
}

/// Render a list of strings as a Python-style list literal, the form the
/// generated build files expect.
pub(crate) fn py_list(items: &[String]) -> String {
  let quoted: Vec<String> = items.iter().map(|i| format!("'{}'", i)).collect();
  format!("[{}]", quoted.join(", "))
}

/// Write a generated text file, creating parent directories as needed.
pub(crate) fn write_text(path: &Path, content: &str) -> Result<(), GenerateError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  fs::write(path, content).map_err(|source| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  })
}

/// Remove a directory tree that is about to be rebuilt. A missing tree is
/// fine; any other failure (e.g. permissions) is fatal.
pub(crate) fn clear_dir(path: &Path) -> Result<(), GenerateError> {
  match fs::remove_dir_all(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(GenerateError::ClearDir {
      path: path.to_path_buf(),
      source,
    }),
  }
}
