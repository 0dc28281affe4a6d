//! The definition registry.
//!
//! Declaration files register two kinds of entities: source modules and jar
//! libraries. Registration goes through [`RegistryBuilder`], which is carried
//! through declaration evaluation and sealed into an immutable [`Registry`]
//! once every origin has been loaded. Insertion order is significant: it
//! drives display order in every generated artifact and the first-writer-wins
//! tie-break for colliding jar filenames, so both kinds are kept in plain
//! vectors, never maps.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::addr::{AddrError, GoalsPathVar, PathGoal};
use crate::coords::{CoordsError, MavenCoords};

/// Errors raised while registering declarations.
#[derive(Debug, Error)]
pub enum DefineError {
  /// Registration was attempted before any origin path was set.
  #[error("no origin path set: declarations may only be registered while a declaration file is being loaded")]
  NoOriginPath,

  /// Coordinate string failed to parse.
  #[error(transparent)]
  Coords(#[from] CoordsError),

  /// An alias entry or link expression was not a well-formed `path[:goal]`.
  #[error(transparent)]
  Addr(#[from] AddrError),

  /// Two declarations of the same kind share a name.
  #[error("duplicate {kind} name '{name}'")]
  DuplicateName { kind: &'static str, name: String },
}

/// A declared source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
  /// Origin path of the declaring file, relative to the workspace root.
  pub origin: String,
  pub name: String,
  /// Relative subpath within the origin.
  pub path: String,
  /// Normalized `path:goal` -> `path:goal` substitutions.
  pub alias: BTreeMap<String, String>,
  /// Generated-source links to expose in the symlink farm.
  pub link_generated_srcs: Vec<String>,
  /// Output-jar links to expose in the symlink farm.
  pub link_output_jars: Vec<String>,
}

impl SourceModule {
  /// The addressing root generated for this module.
  pub fn goals_var(&self) -> GoalsPathVar {
    GoalsPathVar::new(self.origin.clone(), self.path.clone(), self.alias.clone())
  }
}

/// A declared third-party jar library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryJar {
  /// Origin path of the declaring file, relative to the workspace root.
  pub origin: String,
  pub name: String,
  pub coords: MavenCoords,
  /// Excluded from IDE classpath wiring (build targets and farm links are
  /// still generated).
  pub exclude: bool,
  /// Names of other libraries this one depends on, surfaced verbatim.
  pub deps: Vec<String>,
}

/// Unvalidated `sources` declaration, as parsed from a declaration file.
#[derive(Debug, Clone, Default)]
pub struct SourcesDecl {
  pub name: String,
  pub path: String,
  pub alias: Vec<(String, String)>,
  pub link_generated_srcs: Vec<String>,
  pub link_output_jars: Vec<String>,
}

/// Unvalidated `library_jar` declaration, as parsed from a declaration file.
#[derive(Debug, Clone, Default)]
pub struct LibraryJarDecl {
  pub name: String,
  pub coords: String,
  pub exclude: bool,
  pub deps: Vec<String>,
}

/// Immutable snapshot of everything the declaration files registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
  origins: Vec<String>,
  sources: Vec<SourceModule>,
  libraries: Vec<LibraryJar>,
}

impl Registry {
  /// Declaration origins in the order they were loaded.
  pub fn origins(&self) -> &[String] {
    &self.origins
  }

  /// Source modules in registration order.
  pub fn sources(&self) -> &[SourceModule] {
    &self.sources
  }

  /// Jar libraries in registration order.
  pub fn libraries(&self) -> &[LibraryJar] {
    &self.libraries
  }

  /// Whether any module exposes generated sources.
  pub fn has_generated_srcs(&self) -> bool {
    self.sources.iter().any(|s| !s.link_generated_srcs.is_empty())
  }

  /// The workspace-root addressing value (`root` in the path-alias file).
  pub fn root_var(&self) -> GoalsPathVar {
    GoalsPathVar::new("", "", BTreeMap::new())
  }
}

/// Mutable registration context, one per generation run.
///
/// The evaluator sets the origin path before loading each declaration file;
/// registration without a current origin is a precondition violation.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
  origin: Option<String>,
  registry: Registry,
  source_names: HashSet<String>,
  library_names: HashSet<String>,
}

impl RegistryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the origin path for subsequent registrations and record it in the
  /// origin list.
  pub fn set_origin(&mut self, origin: impl Into<String>) {
    let origin = origin.into();
    debug!(origin = %origin, "entering declaration origin");
    self.registry.origins.push(origin.clone());
    self.origin = Some(origin);
  }

  fn current_origin(&self) -> Result<&str, DefineError> {
    self.origin.as_deref().ok_or(DefineError::NoOriginPath)
  }

  /// Register a source module declaration.
  pub fn add_sources(&mut self, decl: SourcesDecl) -> Result<(), DefineError> {
    let origin = self.current_origin()?.to_string();

    if !self.source_names.insert(decl.name.clone()) {
      return Err(DefineError::DuplicateName {
        kind: "sources",
        name: decl.name,
      });
    }

    // Normalize alias keys and values once so lookups and rendering never
    // re-normalize, and surface malformed expressions at declaration time.
    let mut alias = BTreeMap::new();
    for (key, value) in &decl.alias {
      let key = PathGoal::parse(key)?.to_string();
      let value = PathGoal::parse(value)?.to_string();
      alias.insert(key, value);
    }

    for link in decl.link_generated_srcs.iter().chain(&decl.link_output_jars) {
      PathGoal::parse(link)?;
    }

    debug!(origin = %origin, name = %decl.name, "registered sources");
    self.registry.sources.push(SourceModule {
      origin,
      name: decl.name,
      path: decl.path,
      alias,
      link_generated_srcs: decl.link_generated_srcs,
      link_output_jars: decl.link_output_jars,
    });
    Ok(())
  }

  /// Register a jar library declaration.
  ///
  /// Dependency names are not cross-checked against registered libraries;
  /// dangling names pass through verbatim into the generated build targets.
  pub fn add_library_jar(&mut self, decl: LibraryJarDecl) -> Result<(), DefineError> {
    let origin = self.current_origin()?.to_string();

    if !self.library_names.insert(decl.name.clone()) {
      return Err(DefineError::DuplicateName {
        kind: "library_jar",
        name: decl.name,
      });
    }

    let coords: MavenCoords = decl.coords.parse()?;

    debug!(origin = %origin, name = %decl.name, coords = %coords, "registered library_jar");
    self.registry.libraries.push(LibraryJar {
      origin,
      name: decl.name,
      coords,
      exclude: decl.exclude,
      deps: decl.deps,
    });
    Ok(())
  }

  /// Seal the builder into an immutable registry.
  pub fn finish(self) -> Registry {
    self.registry
  }
}
