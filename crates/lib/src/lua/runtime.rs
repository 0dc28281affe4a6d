use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use crate::lua::globals;
use crate::registry::RegistryBuilder;

/// Create a new Lua runtime with the `up` global registered.
pub fn create_runtime(builder: Rc<RefCell<RegistryBuilder>>) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, builder)?;
  Ok(lua)
}

/// Load and execute a declaration file.
///
/// Sets `up.dir` to the declaring origin path before execution, so
/// declaration code can refer to its own location.
pub fn load_decl_file(lua: &Lua, path: &Path, origin: &str) -> LuaResult<()> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;

  let up: LuaTable = lua.globals().get("up")?;
  up.set("dir", origin)?;

  lua
    .load(&content)
    .set_name(format!("@{}", path.display()))
    .exec()
}
