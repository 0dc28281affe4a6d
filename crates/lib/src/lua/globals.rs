//! Global Lua values and the `up` table.
//!
//! This module registers the `up` global table which provides:
//! - `up.sources{}` - declare a source module
//! - `up.library_jar{}` - declare a third-party jar library
//! - `up.dir` - origin path of the declaration file being loaded

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mlua::prelude::*;

use crate::registry::{LibraryJarDecl, RegistryBuilder, SourcesDecl};

/// Lua-side `up.sources{}` specification.
struct SourcesSpec {
  name: String,
  path: String,
  alias: BTreeMap<String, String>,
  link_generated_srcs: Vec<String>,
  link_output_jars: Vec<String>,
}

impl FromLua for SourcesSpec {
  fn from_lua(value: LuaValue, _lua: &Lua) -> LuaResult<Self> {
    let table = match value {
      LuaValue::Table(t) => t,
      _ => {
        return Err(LuaError::FromLuaConversionError {
          from: value.type_name(),
          to: "SourcesSpec".to_string(),
          message: Some("expected table".to_string()),
        });
      }
    };

    let name: String = table
      .get("name")
      .map_err(|_| LuaError::external("sources requires a `name` string"))?;
    let path: Option<String> = table.get("path")?;
    let alias: Option<BTreeMap<String, String>> = table.get("alias")?;
    let link_generated_srcs: Option<Vec<String>> = table.get("link_generated_srcs")?;
    let link_output_jars: Option<Vec<String>> = table.get("link_output_jars")?;

    Ok(SourcesSpec {
      name,
      path: path.unwrap_or_default(),
      alias: alias.unwrap_or_default(),
      link_generated_srcs: link_generated_srcs.unwrap_or_default(),
      link_output_jars: link_output_jars.unwrap_or_default(),
    })
  }
}

impl From<SourcesSpec> for SourcesDecl {
  fn from(spec: SourcesSpec) -> Self {
    SourcesDecl {
      name: spec.name,
      path: spec.path,
      alias: spec.alias.into_iter().collect(),
      link_generated_srcs: spec.link_generated_srcs,
      link_output_jars: spec.link_output_jars,
    }
  }
}

/// Lua-side `up.library_jar{}` specification.
struct LibraryJarSpec {
  name: String,
  coords: String,
  exclude: bool,
  deps: Vec<String>,
}

impl FromLua for LibraryJarSpec {
  fn from_lua(value: LuaValue, _lua: &Lua) -> LuaResult<Self> {
    let table = match value {
      LuaValue::Table(t) => t,
      _ => {
        return Err(LuaError::FromLuaConversionError {
          from: value.type_name(),
          to: "LibraryJarSpec".to_string(),
          message: Some("expected table".to_string()),
        });
      }
    };

    let name: String = table
      .get("name")
      .map_err(|_| LuaError::external("library_jar requires a `name` string"))?;
    let coords: String = table
      .get("coords")
      .map_err(|_| LuaError::external("library_jar requires a `coords` string"))?;
    let exclude: bool = table.get("exclude").unwrap_or(false);
    let deps: Option<Vec<String>> = table.get("deps")?;

    Ok(LibraryJarSpec {
      name,
      coords,
      exclude,
      deps: deps.unwrap_or_default(),
    })
  }
}

impl From<LibraryJarSpec> for LibraryJarDecl {
  fn from(spec: LibraryJarSpec) -> Self {
    LibraryJarDecl {
      name: spec.name,
      coords: spec.coords,
      exclude: spec.exclude,
      deps: spec.deps,
    }
  }
}

/// Register the `up` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, builder: Rc<RefCell<RegistryBuilder>>) -> LuaResult<()> {
  let up = lua.create_table()?;

  let sources_builder = builder.clone();
  let sources_fn = lua.create_function(move |lua, spec_table: LuaValue| {
    let spec: SourcesSpec = lua.unpack(spec_table)?;
    sources_builder
      .borrow_mut()
      .add_sources(spec.into())
      .map_err(LuaError::external)
  })?;
  up.set("sources", sources_fn)?;

  let library_fn = lua.create_function(move |lua, spec_table: LuaValue| {
    let spec: LibraryJarSpec = lua.unpack(spec_table)?;
    builder
      .borrow_mut()
      .add_library_jar(spec.into())
      .map_err(LuaError::external)
  })?;
  up.set("library_jar", library_fn)?;

  lua.globals().set("up", up)?;
  Ok(())
}
