//! Build-target file generation (`lib/BUCK`).
//!
//! Every jar library becomes a `prebuilt_jar` target plus two `remote_file`
//! sub-targets (binary and sources), each carrying the digest published next
//! to the artifact in the remote repository.

use std::path::Path;

use tracing::info;

use crate::consts::{JAR_SUFFIX, SRC_SUFFIX};
use crate::fetch::{FetchError, HashFetcher};
use crate::registry::Registry;

use super::{GenerateError, generated_header, py_list, write_text};

/// Remote digests for one library, in registry order.
#[derive(Debug, Clone)]
pub struct LibraryHashes {
  pub jar: String,
  pub src: String,
}

/// Fetch the binary and sources digests for every library, serially, in
/// registry order. The first failure aborts the run.
pub async fn fetch_library_hashes(
  registry: &Registry,
  fetcher: &HashFetcher,
) -> Result<Vec<LibraryHashes>, FetchError> {
  let mut hashes = Vec::with_capacity(registry.libraries().len());

  for library in registry.libraries() {
    let repo_path = library.coords.repo_path();
    info!(name = %library.name, coords = %library.coords, "fetching digests");

    let jar = fetcher.fetch_sha1(&repo_path, JAR_SUFFIX).await?;
    let src = fetcher.fetch_sha1(&repo_path, SRC_SUFFIX).await?;
    hashes.push(LibraryHashes { jar, src });
  }

  Ok(hashes)
}

/// Render the build-target file text.
pub fn render_buck(registry: &Registry, repo_url: &str, hashes: &[LibraryHashes]) -> String {
  let mut content = format!("# {}\n", generated_header(registry));

  for (library, digests) in registry.libraries().iter().zip(hashes) {
    let name = &library.name;
    let coords = &library.coords;
    let filename = coords.filename();
    let repo_path = coords.repo_path();

    content.push_str(&format!(
      "
# Generated from {origin}/up.lua:
# library_jar('{name}', '{coords}'...
prebuilt_jar(
  name = '{name}',
  binary_jar = ':{name}_jar',
  source_jar = ':{name}_src',
    visibility = public,
    deps = {deps},
)

remote_file(
  name = '{name}_jar',
  out = '{filename}{JAR_SUFFIX}',
  url = '{repo_url}{repo_path}{JAR_SUFFIX}',
  sha1 = '{jar_sha1}'
)

remote_file(
  name = '{name}_src',
  out = '{filename}{SRC_SUFFIX}',
  url = '{repo_url}{repo_path}{SRC_SUFFIX}',
  sha1 = '{src_sha1}'
)
",
      origin = library.origin,
      deps = py_list(&library.deps),
      jar_sha1 = digests.jar,
      src_sha1 = digests.src,
    ));
  }

  content
}

/// Render and write `lib/BUCK`.
pub fn generate_buck(
  root_dir: &Path,
  registry: &Registry,
  repo_url: &str,
  hashes: &[LibraryHashes],
) -> Result<(), GenerateError> {
  info!("generating jar libraries in //lib/BUCK");
  write_text(
    &root_dir.join("lib").join("BUCK"),
    &render_buck(registry, repo_url, hashes),
  )
}
