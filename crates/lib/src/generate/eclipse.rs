//! Eclipse project descriptor generation.
//!
//! Produces `.project` and `.classpath` from the same registry snapshot as
//! the IntelliJ generator: every declared origin is a source entry, every
//! non-excluded library a lib entry pointing into the `.link/lib` farm.

use std::path::Path;

use tracing::info;

use crate::consts::{LINK_LIB, LINK_SRC};
use crate::registry::Registry;

use super::idea::project_name;
use super::links::jar_link_names;
use super::{GenerateError, write_text};

/// Generate `.project` and `.classpath`.
pub fn generate_eclipse(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  info!("creating eclipse project");

  generate_project(root_dir, &project_name(root_dir))?;
  generate_classpath(root_dir, registry)?;
  Ok(())
}

fn generate_project(root_dir: &Path, project_name: &str) -> Result<(), GenerateError> {
  let content = format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<projectDescription>
  <name>{project_name}</name>
  <comment></comment>
  <projects>
  </projects>
  <buildSpec>
    <buildCommand>
      <name>org.eclipse.jdt.core.javabuilder</name>
      <arguments>
      </arguments>
    </buildCommand>
  </buildSpec>
  <natures>
    <nature>org.eclipse.jdt.core.javanature</nature>
  </natures>
</projectDescription>
"#,
  );

  write_text(&root_dir.join(".project"), &content)
}

fn generate_classpath(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let mut entries = String::new();

  for module in registry.sources() {
    entries.push_str(&format!(
      "\n  <classpathentry kind=\"src\" path=\"{}\"/>",
      module.origin
    ));
  }

  if registry.has_generated_srcs() {
    entries.push_str(&format!(
      "\n  <classpathentry kind=\"src\" path=\"{}\">\
       <attributes><attribute name=\"optional\" value=\"true\"/></attributes>\
       </classpathentry>",
      LINK_SRC
    ));
  }

  entries.push_str("\n  <classpathentry kind=\"output\" path=\".out/.ecj/classes\"/>");
  entries.push_str(
    "\n  <classpathentry kind=\"con\" \
     path=\"org.eclipse.jdt.launching.JRE_CONTAINER/\
     org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType/JavaSE-1.8\"/>",
  );

  for (library, leaf) in registry.libraries().iter().zip(jar_link_names(registry)) {
    if library.exclude {
      continue;
    }
    entries.push_str(&format!(
      "\n  <classpathentry kind=\"lib\" path=\"{lib}/{jar}\" sourcepath=\"{lib}/{src}\"/>",
      lib = LINK_LIB,
      jar = leaf.jar,
      src = leaf.src,
    ));
  }

  let content = format!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<classpath>{entries}\n</classpath>\n"
  );

  write_text(&root_dir.join(".classpath"), &content)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::{LibraryJarDecl, Registry, RegistryBuilder, SourcesDecl};
  use std::fs;
  use tempfile::TempDir;

  fn registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder.set_origin("app");
    builder
      .add_sources(SourcesDecl {
        name: "app".to_string(),
        ..SourcesDecl::default()
      })
      .unwrap();
    builder
      .add_library_jar(LibraryJarDecl {
        name: "guava".to_string(),
        coords: "com.google.guava:guava:31.0".to_string(),
        ..LibraryJarDecl::default()
      })
      .unwrap();
    builder
      .add_library_jar(LibraryJarDecl {
        name: "auto".to_string(),
        coords: "com.google.auto:auto-common:1.2".to_string(),
        exclude: true,
        ..LibraryJarDecl::default()
      })
      .unwrap();
    builder.finish()
  }

  #[test]
  fn project_file_names_the_workspace() {
    let temp = TempDir::new().unwrap();
    generate_eclipse(temp.path(), &registry()).unwrap();

    let project = fs::read_to_string(temp.path().join(".project")).unwrap();
    assert!(project.contains(&format!("<name>{}</name>", project_name(temp.path()))));
    assert!(project.contains("org.eclipse.jdt.core.javabuilder"));
  }

  #[test]
  fn classpath_lists_sources_and_non_excluded_libraries() {
    let temp = TempDir::new().unwrap();
    generate_eclipse(temp.path(), &registry()).unwrap();

    let classpath = fs::read_to_string(temp.path().join(".classpath")).unwrap();
    assert!(classpath.contains(r#"<classpathentry kind="src" path="app"/>"#));
    assert!(classpath.contains(
      r#"<classpathentry kind="lib" path=".link/lib/guava-31.0.jar" sourcepath=".link/lib/guava-31.0-sources.jar"/>"#
    ));
    assert!(!classpath.contains("auto-common"), "excluded library must be skipped");
  }

  #[test]
  fn classpath_includes_generated_tree_only_when_declared() {
    let temp = TempDir::new().unwrap();
    generate_eclipse(temp.path(), &registry()).unwrap();
    let classpath = fs::read_to_string(temp.path().join(".classpath")).unwrap();
    assert!(!classpath.contains(".link/src"));

    let mut builder = RegistryBuilder::new();
    builder.set_origin("app");
    builder
      .add_sources(SourcesDecl {
        name: "app".to_string(),
        link_generated_srcs: vec!["gen/api".to_string()],
        ..SourcesDecl::default()
      })
      .unwrap();
    generate_eclipse(temp.path(), &builder.finish()).unwrap();
    let classpath = fs::read_to_string(temp.path().join(".classpath")).unwrap();
    assert!(classpath.contains(".link/src"));
  }
}
