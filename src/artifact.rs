//! Flat-file JSON artifacts: the pool list and the batch documents.
//!
//! Files are written with 4-space indentation so they diff cleanly against
//! hand-reviewed copies.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::batch::Batch;
use crate::discovery::PoolDescriptor;
use crate::error::{MigrationError, Result};

pub const DEFAULT_POOL_LIST: &str = "pools_migration.json";
pub const DEFAULT_BATCH_DIR: &str = "script/batchs";
pub const DEFAULT_BATCH_PREFIX: &str = "batch_set_strategy";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> MigrationError + '_ {
    move |source| MigrationError::Artifact {
        path: path.to_path_buf(),
        source,
    }
}

/// Serialize `value` the way the artifacts are stored on disk
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .map_err(|source| MigrationError::ArtifactFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(out)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }
    fs::write(path, bytes).map_err(io_err(path))
}

pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_json_bytes(value, path)?;
    write_file(path, &bytes)
}

pub fn write_pool_list<P: AsRef<Path>>(path: P, descriptors: &[PoolDescriptor]) -> Result<()> {
    let path = path.as_ref();
    write_json(path, descriptors)?;
    info!("Wrote {} pools to {}", descriptors.len(), path.display());
    Ok(())
}

pub fn read_pool_list<P: AsRef<Path>>(path: P) -> Result<Vec<PoolDescriptor>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(io_err(path))?;
    serde_json::from_str(&content).map_err(|source| MigrationError::ArtifactFormat {
        path: path.to_path_buf(),
        source,
    })
}

pub fn batch_path(dir: &Path, prefix: &str, number: usize) -> PathBuf {
    dir.join(format!("{}_{}.json", prefix, number))
}

/// `<prefix>_<n>.json`, the names [`batch_path`] produces
fn is_batch_file(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".json"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Batch files already in `dir` under `prefix`
fn existing_batches(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        if entry.file_name().to_str().is_some_and(|name| is_batch_file(name, prefix)) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

fn discard(paths: impl IntoIterator<Item = PathBuf>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

/// Replace the batch set in `dir` with `batches`.
///
/// Every document is rendered and staged next to its final path before
/// anything is replaced. Batch files from an earlier run under the same
/// prefix are removed, so the directory only ever holds batches 1..N of
/// this run.
pub fn write_batches<P: AsRef<Path>>(dir: P, prefix: &str, batches: &[Batch]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();

    let rendered = batches
        .iter()
        .map(|batch| {
            let path = batch_path(dir, prefix, batch.number);
            let bytes = to_json_bytes(&batch.document, &path)?;
            Ok((path, bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    let stale = existing_batches(dir, prefix)?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(rendered.len());
    for (path, bytes) in rendered {
        let tmp = path.with_extension("tmp");
        if let Err(source) = fs::write(&tmp, &bytes) {
            discard(staged.into_iter().map(|(tmp, _)| tmp).chain([tmp.clone()]));
            return Err(MigrationError::Artifact { path: tmp, source });
        }
        staged.push((tmp, path));
    }

    for path in &stale {
        if let Err(source) = fs::remove_file(path) {
            discard(staged.into_iter().map(|(tmp, _)| tmp));
            return Err(MigrationError::Artifact {
                path: path.clone(),
                source,
            });
        }
    }
    if !stale.is_empty() {
        debug!("Removed {} batch files from a previous run", stale.len());
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        written.push(path);
    }

    info!("Wrote {} batch files to {}", written.len(), dir.display());
    Ok(written)
}
