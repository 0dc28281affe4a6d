//! Path-alias file generation (`lib/DEFS`).
//!
//! The path-alias file defines one addressable variable per source module,
//! plus the `public` visibility marker and the workspace `root` variable.
//! The embedded `_GoalsPathVar` implementation mirrors
//! [`GoalsPathVar`](crate::addr::GoalsPathVar) exactly; the two must stay in
//! sync, since the symlink farm resolves the same expressions natively.

use std::path::Path;

use tracing::info;

use crate::addr::GoalsPathVar;
use crate::registry::Registry;

use super::{GenerateError, generated_header, write_text};

const DEFS_PRELUDE: &str = "
def _normalize_path_and_goal(path_goal):
    pg = path_goal.split(':')
    if len(pg) == 2:
        return pg[0] + ':' + pg[1]
    else:
        return pg[0] + ':' + pg[0].split('/')[-1]

def _normalize_path_and_goal_dict(d):
    return {_normalize_path_and_goal(k): _normalize_path_and_goal(v)
            for k, v in d.iteritems()}

class _GoalsPathVar(object):
    def __init__(self, root, path, alias = None):
        self.root = root
        self.path = path
        self.alias = _normalize_path_and_goal_dict(alias or {})

    def __floordiv__(self, path_goal):
        suffix = _normalize_path_and_goal(path_goal)
        # try to find library var substitution
        if suffix in self.alias:
            return self.alias[suffix]

        return str(self) + '/' + suffix

    def __str__(self):
        return '//' + (self.root + self.path).lstrip('/')
";

/// Render one `_GoalsPathVar(...)` constructor call. The `alias` argument is
/// only emitted when the table is non-empty.
fn render_var(var: &GoalsPathVar) -> String {
  if var.alias().is_empty() {
    format!("_GoalsPathVar('{}', '{}')", var.root(), var.path())
  } else {
    let entries: Vec<String> = var
      .alias()
      .iter()
      .map(|(k, v)| format!("'{}': '{}'", k, v))
      .collect();
    format!(
      "_GoalsPathVar('{}', '{}', alias = {{{}}})",
      var.root(),
      var.path(),
      entries.join(", ")
    )
  }
}

/// Render the path-alias file text.
pub fn render_defs(registry: &Registry) -> String {
  let mut content = format!("# {}", generated_header(registry));
  content.push_str(DEFS_PRELUDE);

  content.push_str(&format!(
    "
public = ['PUBLIC']
root = {}
",
    render_var(&registry.root_var())
  ));

  for module in registry.sources() {
    content.push_str(&format!(
      "
# Generated from {origin}/up.lua:
# sources('{name}'...
{name} = {var}
",
      origin = module.origin,
      name = module.name,
      var = render_var(&module.goals_var()),
    ));
  }

  content
}

/// Render and write `lib/DEFS`.
pub fn generate_defs(root_dir: &Path, registry: &Registry) -> Result<(), GenerateError> {
  info!("generating source variables in //lib/DEFS");
  write_text(&root_dir.join("lib").join("DEFS"), &render_defs(registry))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::{RegistryBuilder, SourcesDecl};

  fn registry_with_module(decl: SourcesDecl) -> Registry {
    let mut builder = RegistryBuilder::new();
    builder.set_origin("app");
    builder.add_sources(decl).unwrap();
    builder.finish()
  }

  #[test]
  fn renders_constants_and_prelude() {
    let registry = registry_with_module(SourcesDecl {
      name: "app".to_string(),
      ..SourcesDecl::default()
    });

    let defs = render_defs(&registry);
    assert!(defs.starts_with("# Generated using up app\n"));
    assert!(defs.contains("class _GoalsPathVar(object):"));
    assert!(defs.contains("\npublic = ['PUBLIC']\n"));
    assert!(defs.contains("\nroot = _GoalsPathVar('', '')\n"));
  }

  #[test]
  fn module_without_alias_omits_alias_argument() {
    let registry = registry_with_module(SourcesDecl {
      name: "app".to_string(),
      ..SourcesDecl::default()
    });

    let defs = render_defs(&registry);
    assert!(defs.contains("\napp = _GoalsPathVar('app', '')\n"));
  }

  #[test]
  fn module_with_alias_renders_normalized_table() {
    let registry = registry_with_module(SourcesDecl {
      name: "core".to_string(),
      path: "src".to_string(),
      alias: vec![("gen/api".to_string(), "lib:guava".to_string())],
      ..SourcesDecl::default()
    });

    let defs = render_defs(&registry);
    assert!(defs.contains("\ncore = _GoalsPathVar('app', 'src', alias = {'gen/api:api': 'lib:guava'})\n"));
  }

  #[test]
  fn provenance_comment_names_the_declaration() {
    let registry = registry_with_module(SourcesDecl {
      name: "app".to_string(),
      ..SourcesDecl::default()
    });

    let defs = render_defs(&registry);
    assert!(defs.contains("# Generated from app/up.lua:\n# sources('app'...\n"));
  }
}
