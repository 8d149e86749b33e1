//! Idempotent scaffolding of per-node declaration files.
//!
//! Runs as a separate preparatory pass over a schema directory tree,
//! before the tree is treated as immutable compiler input. Only
//! file-existence checks; nothing is ever overwritten.

use anyhow::Context;
use std::path::Path;
use tracing::debug;

use crate::schema::{parse_segment, ParamSpec};

const METHODS_FILE: &str = "methods.yaml";

/// Create the default declaration files for one node directory if absent.
/// Returns whether anything was created.
pub fn ensure_defaults(dir: &Path, param: Option<&ParamSpec>) -> anyhow::Result<bool> {
    let methods_path = dir.join(METHODS_FILE);
    if methods_path.exists() {
        return Ok(false);
    }
    let mut contents = String::from(
        "# Method declarations for this path segment. An empty list declares no routes.\n",
    );
    if let Some(param) = param {
        contents.push_str(&format!(
            "# This segment binds path parameter `{}` ({}).\n",
            param.name, param.kind
        ));
    }
    contents.push_str("[]\n");
    std::fs::write(&methods_path, contents)
        .with_context(|| format!("failed to write {methods_path:?}"))?;
    debug!(path = %methods_path.display(), "scaffolded default methods file");
    println!("✅ Scaffolded {methods_path:?}");
    Ok(true)
}

/// Walk a schema directory tree and scaffold defaults for every node.
/// Returns the number of files created. Idempotent: a second run creates
/// nothing.
pub fn scaffold_tree(root: &Path) -> anyhow::Result<usize> {
    scaffold_dir(root, None)
}

fn scaffold_dir(dir: &Path, param: Option<&ParamSpec>) -> anyhow::Result<usize> {
    let mut created = usize::from(ensure_defaults(dir, param)?);

    let mut child_dirs: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list schema directory {dir:?}"))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    child_dirs.sort();

    for name in child_dirs {
        let child_param = parse_segment(&name)
            .with_context(|| format!("directory {:?}", dir.join(&name)))?;
        created += scaffold_dir(&dir.join(&name), child_param.as_ref())?;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::schema::ParamKind;

    #[test]
    fn scaffold_creates_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tasks/_id@number")).unwrap();

        let created = scaffold_tree(dir.path()).unwrap();
        assert_eq!(created, 3);
        assert!(dir.path().join("methods.yaml").exists());
        assert!(dir.path().join("tasks/methods.yaml").exists());
        assert!(dir.path().join("tasks/_id@number/methods.yaml").exists());

        let param_file =
            std::fs::read_to_string(dir.path().join("tasks/_id@number/methods.yaml")).unwrap();
        assert!(param_file.contains("`id` (number)"));

        assert_eq!(scaffold_tree(dir.path()).unwrap(), 0);
    }

    #[test]
    fn existing_declarations_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let methods = dir.path().join("methods.yaml");
        std::fs::write(&methods, "- method: get\n").unwrap();

        assert_eq!(scaffold_tree(dir.path()).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&methods).unwrap(), "- method: get\n");
    }

    #[test]
    fn default_param_hint_mentions_kind() {
        let dir = tempfile::tempdir().unwrap();
        let param = ParamSpec {
            name: "slug".to_string(),
            kind: ParamKind::String,
        };
        assert!(ensure_defaults(dir.path(), Some(&param)).unwrap());
        let contents = std::fs::read_to_string(dir.path().join("methods.yaml")).unwrap();
        assert!(contents.contains("`slug` (string)"));
    }
}
