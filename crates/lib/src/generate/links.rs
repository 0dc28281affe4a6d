//! Symlink farm generation (`.link/`).
//!
//! The farm exposes build-output locations under stable paths so an IDE can
//! reference them without knowing the build tool's internal layout. Three
//! sub-trees are rebuilt from empty on every run:
//!
//! - `.link/src`: generated-source directories, one directory link per
//!   declared generated-source expression
//! - `.link/lib`: third-party jars, one file link per library and kind
//! - `.link/jar`: built output jars, one file link per declared output-jar
//!   expression
//!
//! Link targets are not required to exist yet; link creation never
//! dereferences the target.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::addr::PathGoal;
use crate::consts::{JAR_SUFFIX, LINK_DIR, LINK_JAR, LINK_LIB, LINK_SRC, SRC_SUFFIX};
use crate::registry::Registry;

use super::{GenerateError, clear_dir, generated_header, py_list, write_text};

/// The two jar kinds linked for every library: goal tag and leaf suffix.
const JAR_KINDS: [(&str, &str); 2] = [("jar", JAR_SUFFIX), ("src", SRC_SUFFIX)];

/// Resolved farm leaf names for one library.
///
/// Leaves are named by coordinate filename. When two libraries share a
/// filename (same artifact and version under different groups), the
/// first-registered library keeps the bare name and every later one is
/// qualified with its group. The IDE descriptor generators reuse these
/// names, so every output agrees on a library's identity.
#[derive(Debug, Clone)]
pub struct JarLinkNames {
  pub name: String,
  pub jar: String,
  pub src: String,
}

/// Compute farm leaf names for every library, in registry order.
pub fn jar_link_names(registry: &Registry) -> Vec<JarLinkNames> {
  let mut used = HashSet::new();

  registry
    .libraries()
    .iter()
    .map(|library| {
      let filename = library.coords.filename();
      let stem = if used.insert(filename.clone()) {
        filename
      } else {
        format!("{}.{}", library.coords.group, filename)
      };

      JarLinkNames {
        name: library.name.clone(),
        jar: format!("{}{}", stem, JAR_SUFFIX),
        src: format!("{}{}", stem, SRC_SUFFIX),
      }
    })
    .collect()
}

/// Rebuild the whole symlink farm from the registry snapshot.
pub fn generate_links(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  prepare_link_dir(root_dir, registry)?;
  link_generated_srcs(root_dir, registry)?;
  link_lib_jars(root_dir, registry)?;
  link_output_jars(root_dir, registry)?;
  Ok(())
}

/// Clear the farm root and write its readme index.
fn prepare_link_dir(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let link_dir = root_dir.join(LINK_DIR);
  clear_dir(&link_dir)?;

  let mut content = format!(
    "
#### {}

This folder is generated to symlink generated sources and jars from
the build output. By referencing these sources/jars, an IDE can avoid
any dependency or clash with the internal storages of the build system.
",
    generated_header(registry)
  );

  for module in registry.sources() {
    if module.link_generated_srcs.is_empty() && module.link_output_jars.is_empty() {
      continue;
    }
    content.push_str(&format!(
      "\n- `{}/up.lua: sources({},...`",
      module.origin, module.name
    ));
    if !module.link_generated_srcs.is_empty() {
      content.push_str(&format!(
        "\n  * `link_generated_srcs = {}`",
        py_list(&module.link_generated_srcs)
      ));
    }
    if !module.link_output_jars.is_empty() {
      content.push_str(&format!(
        "\n  * `link_output_jars = {}`",
        py_list(&module.link_output_jars)
      ));
    }
  }

  for library in registry.libraries() {
    content.push_str(&format!(
      "\n- `{}/up.lua: library_jar({},...`\n  * `{}`",
      library.origin, library.name, library.coords
    ));
  }

  write_text(&link_dir.join("readme.md"), &content)
}

/// Link generated-source directories under `.link/src`.
fn link_generated_srcs(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let link_dir = root_dir.join(LINK_SRC);
  info!("symlinking generated sources in {}", LINK_SRC);

  for module in registry.sources() {
    for expr in &module.link_generated_srcs {
      let pg = module_path_goal(&module.path, expr)?;
      let full_path = format!("{}/{}", module.origin, pg.path);
      let target = root_dir.join(format!(
        "buck-out/annotation/{}/__{}_gen__/{}",
        full_path, pg.goal, pg.path
      ));

      let mount = link_dir.join(&pg.path);
      debug!(expr = %expr, mount = %mount.display(), "linking generated sources");
      create_symlink(&target, &mount, true)?;
    }
  }

  Ok(())
}

/// Link library jars under `.link/lib`.
fn link_lib_jars(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let link_dir = root_dir.join(LINK_LIB);
  info!("symlinking library jars in {}", LINK_LIB);

  for (library, leaves) in registry.libraries().iter().zip(jar_link_names(registry)) {
    for (kind, suffix) in JAR_KINDS {
      let goal = format!("{}_{}", library.name, kind);
      let filename = format!("{}{}", library.coords.filename(), suffix);
      let target = root_dir.join(format!("buck-out/gen/lib/{}/{}", goal, filename));

      let leaf = match kind {
        "jar" => &leaves.jar,
        _ => &leaves.src,
      };
      let mount = link_dir.join(leaf);
      debug!(coords = %library.coords, kind, mount = %mount.display(), "linking library jar");
      create_symlink(&target, &mount, false)?;
    }
  }

  Ok(())
}

/// Link output jars under `.link/jar`.
fn link_output_jars(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let link_dir = root_dir.join(LINK_JAR);
  info!("symlinking output jars in {}", LINK_JAR);

  for module in registry.sources() {
    for expr in &module.link_output_jars {
      let pg = module_path_goal(&module.path, expr)?;
      let full_path = format!("{}/{}", module.origin, pg.path);
      let filename = format!("{}.jar", pg.goal);
      let target = root_dir.join(format!("buck-out/gen/{}/{}", full_path, filename));

      let mount = link_dir.join(&pg.path).join(&filename);
      debug!(expr = %expr, mount = %mount.display(), "linking output jar");
      create_symlink(&target, &mount, false)?;
    }
  }

  Ok(())
}

/// Resolve a link expression relative to the module subpath.
fn module_path_goal(module_path: &str, expr: &str) -> Result<PathGoal, GenerateError> {
  let combined = format!("{}/{}", module_path, expr);
  Ok(PathGoal::parse(combined.trim_start_matches('/'))?)
}

/// Create a symlink, creating parent directories first. The target is not
/// dereferenced and may not exist yet.
fn create_symlink(target: &Path, link: &Path, directory: bool) -> Result<(), GenerateError> {
  if let Some(parent) = link.parent() {
    fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  symlink_impl(target, link, directory).map_err(|source| GenerateError::Symlink {
    link: link.to_path_buf(),
    target: target.to_path_buf(),
    source,
  })
}

#[cfg(unix)]
fn symlink_impl(target: &Path, link: &Path, _directory: bool) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_impl(target: &Path, link: &Path, directory: bool) -> io::Result<()> {
  if directory {
    std::os::windows::fs::symlink_dir(target, link)
  } else {
    std::os::windows::fs::symlink_file(target, link)
  }
}
