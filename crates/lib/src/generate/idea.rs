//! IntelliJ project descriptor generation.
//!
//! Produces one library-reference file per jar library under
//! `.idea/libraries/`, a single module file listing every declared origin as
//! a source root, the project module index, and the SDK settings file. The
//! library references point into the `.link/lib` farm, using the same leaf
//! names the farm generator computed.

use std::path::Path;

use tracing::info;

use crate::consts::{IJ_DIR, IJ_LIBRARIES, LINK_LIB, LINK_SRC};
use crate::registry::Registry;

use super::links::{JarLinkNames, jar_link_names};
use super::{GenerateError, clear_dir, write_text};

/// Generate the `.idea/` directory and the project module file.
pub fn generate_idea(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  let project_name = project_name(root_dir);
  let leaves = jar_link_names(registry);

  generate_libraries(root_dir, registry, &leaves)?;
  generate_module(root_dir, registry, &project_name)?;
  generate_project_index(root_dir, &project_name)?;
  generate_misc(root_dir)?;
  Ok(())
}

/// Project name derived from the workspace root directory.
pub(crate) fn project_name(root_dir: &Path) -> String {
  root_dir
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "workspace".to_string())
}

/// One library-reference file per library, the tree cleared first.
fn generate_libraries(
  root_dir: &Path,
  registry: &Registry,
  leaves: &[JarLinkNames],
) -> Result<(), GenerateError> {
  let libraries_dir = root_dir.join(IJ_LIBRARIES);
  clear_dir(&libraries_dir)?;

  info!("creating library references in {}", IJ_LIBRARIES);

  for (library, leaf) in registry.libraries().iter().zip(leaves) {
    let content = format!(
      r#"<?xml version="1.0" encoding="UTF-8"?>
<component name="libraryTable">
  <library name="lib_{name}">
    <CLASSES>
      <root url="jar://$PROJECT_DIR$/{LINK_LIB}/{jar}!/" />
    </CLASSES>
    <JAVADOC />
    <SOURCES>
      <root url="jar://$PROJECT_DIR$/{LINK_LIB}/{src}!/" />
    </SOURCES>
  </library>
</component>
"#,
      name = library.name,
      jar = leaf.jar,
      src = leaf.src,
    );

    write_text(&libraries_dir.join(format!("lib_{}.xml", library.name)), &content)?;
  }

  Ok(())
}

/// The single project module file (`<project>.iml`).
fn generate_module(root_dir: &Path, registry: &Registry, project_name: &str) -> Result<(), GenerateError> {
  info!("creating module file {}.iml", project_name);

  let mut source_folders = String::new();
  for module in registry.sources() {
    source_folders.push_str(&format!(
      "\n      <sourceFolder url=\"file://$MODULE_DIR$/{}\" isTestSource=\"false\" />",
      module.origin
    ));
  }
  if registry.has_generated_srcs() {
    source_folders.push_str(&format!(
      "\n      <sourceFolder url=\"file://$MODULE_DIR$/{}\" isTestSource=\"false\" generated=\"true\" />",
      LINK_SRC
    ));
  }

  let mut libraries = String::new();
  for library in registry.libraries() {
    if library.exclude {
      continue;
    }
    libraries.push_str(&format!(
      "\n    <orderEntry type=\"library\" name=\"lib_{}\" scope=\"COMPILE\" level=\"project\" />",
      library.name
    ));
  }

  let content = format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<module type="JAVA_MODULE" version="4">
  <component name="NewModuleRootManager" inherit-compiler-output="true">
    <exclude-output />
    <content url="file://$MODULE_DIR$">
      <excludeFolder url="file://$MODULE_DIR$/.out" isTestSource="false" />
      <excludeFolder url="file://$MODULE_DIR$/buck-out" isTestSource="false" />{source_folders}
    </content>
    <orderEntry type="inheritedJdk" />
    <orderEntry type="sourceFolder" forTests="false" />{libraries}
  </component>
</module>"#,
  );

  write_text(&root_dir.join(format!("{}.iml", project_name)), &content)
}

/// The project-level module index (`.idea/modules.xml`).
fn generate_project_index(root_dir: &Path, project_name: &str) -> Result<(), GenerateError> {
  let content = format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<project version="4">
  <component name="ProjectModuleManager">
    <modules>
      <module fileurl="file://$PROJECT_DIR$/{name}.iml" filepath="$PROJECT_DIR$/{name}.iml" />
    </modules>
  </component>
</project>"#,
    name = project_name,
  );

  write_text(&root_dir.join(IJ_DIR).join("modules.xml"), &content)
}

/// SDK and compiler-output settings (`.idea/misc.xml`).
fn generate_misc(root_dir: &Path) -> Result<(), GenerateError> {
  let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<project version="4">
  <component name="ProjectRootManager" version="2" languageLevel="JDK_1_9"
      default="false" project-jdk-name="1.8" project-jdk-type="JavaSDK">
    <output url="file://$PROJECT_DIR$/.out/.ij" />
  </component>
</project>"#;

  write_text(&root_dir.join(IJ_DIR).join("misc.xml"), content)
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
        link_generated_srcs: vec!["gen/api".to_string()],
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
  fn library_reference_points_at_farm_leaves() {
    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry()).unwrap();

    let xml = fs::read_to_string(temp.path().join(".idea/libraries/lib_guava.xml")).unwrap();
    assert!(xml.contains(r#"<library name="lib_guava">"#));
    assert!(xml.contains("jar://$PROJECT_DIR$/.link/lib/guava-31.0.jar!/"));
    assert!(xml.contains("jar://$PROJECT_DIR$/.link/lib/guava-31.0-sources.jar!/"));
  }

  #[test]
  fn excluded_library_still_gets_a_reference_file() {
    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry()).unwrap();

    assert!(temp.path().join(".idea/libraries/lib_auto.xml").is_file());
  }

  #[test]
  fn stale_library_references_are_cleared() {
    let temp = TempDir::new().unwrap();
    let stale = temp.path().join(".idea/libraries/lib_gone.xml");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "stale").unwrap();

    generate_idea(temp.path(), &registry()).unwrap();
    assert!(!stale.exists());
  }

  #[test]
  fn module_file_lists_source_roots_and_generated_tree() {
    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry()).unwrap();

    let name = project_name(temp.path());
    let iml = fs::read_to_string(temp.path().join(format!("{}.iml", name))).unwrap();
    assert!(iml.contains(r#"<sourceFolder url="file://$MODULE_DIR$/app" isTestSource="false" />"#));
    assert!(iml.contains(r#"<sourceFolder url="file://$MODULE_DIR$/.link/src" isTestSource="false" generated="true" />"#));
    assert!(iml.contains(r#"<excludeFolder url="file://$MODULE_DIR$/buck-out" isTestSource="false" />"#));
  }

  #[test]
  fn excluded_library_is_omitted_from_order_entries() {
    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry()).unwrap();

    let name = project_name(temp.path());
    let iml = fs::read_to_string(temp.path().join(format!("{}.iml", name))).unwrap();
    assert!(iml.contains(r#"name="lib_guava""#));
    assert!(!iml.contains(r#"name="lib_auto""#));
  }

  #[test]
  fn generated_tree_root_is_omitted_without_generated_srcs() {
    let mut builder = RegistryBuilder::new();
    builder.set_origin("app");
    builder
      .add_sources(SourcesDecl {
        name: "app".to_string(),
        ..SourcesDecl::default()
      })
      .unwrap();
    let registry = builder.finish();

    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry).unwrap();

    let name = project_name(temp.path());
    let iml = fs::read_to_string(temp.path().join(format!("{}.iml", name))).unwrap();
    assert!(!iml.contains("generated=\"true\""));
  }

  #[test]
  fn project_index_references_the_module_file() {
    let temp = TempDir::new().unwrap();
    generate_idea(temp.path(), &registry()).unwrap();

    let name = project_name(temp.path());
    let modules = fs::read_to_string(temp.path().join(".idea/modules.xml")).unwrap();
    assert!(modules.contains(&format!("$PROJECT_DIR$/{}.iml", name)));

    let misc = fs::read_to_string(temp.path().join(".idea/misc.xml")).unwrap();
    assert!(misc.contains("ProjectRootManager"));
  }
}
