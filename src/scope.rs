//! Scoped ownership of per-invocation temporary files.
//!
//! Every file the pipeline materializes (downloaded background, uploaded audio, raw PCM fed
//! to the encoder) is registered here. [`ResourceScope::release`] deletes them all, logging
//! and collecting failures instead of returning them. Dropping the scope releases as well.
//!
//! Ordering: callers must drop decoder/encoder handles before releasing the scope, because
//! some platforms refuse to delete a file that is still open.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tempfile::TempPath;

use crate::foundation::error::ReelResult;

/// Prefix shared by every temp file the pipeline creates.
pub const TEMP_PREFIX: &str = "promptreel-";

/// Outcome of a [`ResourceScope::release`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Paths that were deleted (or were already gone).
    pub released: Vec<PathBuf>,
    /// Human-readable failures; never fatal.
    pub failures: Vec<String>,
}

impl CleanupReport {
    /// Return `true` when every registered file was removed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: CleanupReport) {
        self.released.extend(other.released);
        self.failures.extend(other.failures);
    }
}

/// Registry of temp files owned by one pipeline invocation.
#[derive(Debug, Default)]
pub struct ResourceScope {
    dir: Option<PathBuf>,
    files: Vec<TempPath>,
}

impl ResourceScope {
    /// Scope creating files in the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope creating files in `dir` instead of the system temp directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            files: Vec::new(),
        }
    }

    /// Write `bytes` to a new uniquely named temp file and take ownership of it.
    pub fn materialize(&mut self, bytes: &[u8], suffix: &str) -> ReelResult<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(suffix);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("create temp file")?;

        let shown = file.path().to_path_buf();
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .with_context(|| format!("write temp file '{}'", shown.display()))?;

        // Close the handle now; only the path stays registered.
        let path = file.into_temp_path();
        Ok(self.adopt(path))
    }

    /// Take ownership of an existing temp path.
    pub fn adopt(&mut self, path: TempPath) -> PathBuf {
        let out = path.to_path_buf();
        tracing::debug!(path = %out.display(), "registered temp file");
        self.files.push(path);
        out
    }

    /// Paths currently owned by this scope, in registration order.
    pub fn tracked(&self) -> Vec<PathBuf> {
        self.files.iter().map(|p| p.to_path_buf()).collect()
    }

    /// Number of files still owned.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Return `true` when the scope owns nothing.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Delete every owned file, newest first. Safe to call repeatedly.
    pub fn release(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        while let Some(path) = self.files.pop() {
            report.merge(release_one(path));
        }
        report
    }
}

fn release_one(path: TempPath) -> CleanupReport {
    let shown = path.to_path_buf();
    let mut report = CleanupReport::default();
    match path.close() {
        Ok(()) => report.released.push(shown),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => report.released.push(shown),
        Err(e) => {
            tracing::warn!(path = %shown.display(), error = %e, "temp file cleanup failed");
            report
                .failures
                .push(format!("failed to remove '{}': {e}", shown.display()));
        }
    }
    report
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        if !self.files.is_empty() {
            let _ = self.release();
        }
    }
}

/// Return `true` when `path` looks like a file created by a [`ResourceScope`].
pub fn is_scope_temp(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_PREFIX))
}

#[cfg(test)]
#[path = "../tests/unit/scope/scope.rs"]
mod tests;
