//! Declaration evaluation.
//!
//! `evaluate_origins` loads one declaration file per origin path and returns
//! the resulting immutable [`Registry`]. The registry builder is shared with
//! the Lua runtime for the duration of evaluation and sealed once the
//! runtime is dropped, so generation always reads a fully populated,
//! read-only snapshot.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::info;

use crate::consts::DECL_FILE;
use crate::lua::runtime;
use crate::registry::{Registry, RegistryBuilder};

/// Errors that can occur during declaration evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// An origin directory has no declaration file.
  #[error("no declaration file at '{0}'")]
  MissingDeclFile(String),

  /// Lua evaluation error (includes registration failures raised from the
  /// `up.sources{}` / `up.library_jar{}` entry points).
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}

/// Evaluate the declaration file of every origin, in CLI order.
///
/// For each origin the builder's current origin path is set first, then
/// `<root_dir>/<origin>/up.lua` is executed. Declarations register through
/// the `up` global; any registration error aborts evaluation.
pub fn evaluate_origins(root_dir: &Path, origins: &[String]) -> Result<Registry, EvalError> {
  let builder = Rc::new(RefCell::new(RegistryBuilder::new()));

  // Evaluate in a block so the runtime is dropped before the builder Rc is
  // unwrapped.
  {
    let lua = runtime::create_runtime(builder.clone())?;

    for origin in origins {
      let decl_path = root_dir.join(origin).join(DECL_FILE);
      if !decl_path.is_file() {
        return Err(EvalError::MissingDeclFile(format!("{}/{}", origin, DECL_FILE)));
      }

      info!(origin = %origin, "loading declarations");
      builder.borrow_mut().set_origin(origin.clone());
      runtime::load_decl_file(&lua, &decl_path, origin)?;
    }
  }

  let registry = Rc::try_unwrap(builder)
    .expect("registry builder still has references")
    .into_inner()
    .finish();

  info!(
    sources = registry.sources().len(),
    libraries = registry.libraries().len(),
    "declarations loaded"
  );
  Ok(registry)
}
