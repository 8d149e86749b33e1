use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::routes::RouteTable;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub contents: String,
}

/// Target-specific compilation output: a set of named text files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact {
    pub files: Vec<ArtifactFile>,
}

/// Turns a compiled route table into a target-specific artifact. The
/// renderer owns all presentation concerns (parameter syntax included);
/// the route table it consumes is already complete and validated.
pub trait Renderer {
    fn emit(&self, table: &RouteTable) -> anyhow::Result<Artifact>;
}

/// Write an artifact to disk, mirroring the generator conventions:
/// existing files are skipped unless `force`, and `dry_run` only reports
/// what would be written.
pub fn write_artifact(
    artifact: &Artifact,
    out_dir: &Path,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    for file in &artifact.files {
        let path = out_dir.join(&file.path);
        if path.exists() && !force {
            println!("⚠️  Skipping existing file: {path:?}");
            continue;
        }
        if dry_run {
            println!("📝 Would write {path:?} ({} bytes)", file.contents.len());
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {parent:?}"))?;
        }
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("failed to write {path:?}"))?;
        info!(path = %path.display(), "artifact file written");
        println!("✅ Wrote {path:?}");
    }
    Ok(())
}
