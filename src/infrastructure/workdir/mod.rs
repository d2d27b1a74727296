use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

const DIR_PREFIX: &str = "render-";

/// Scratch directory owned by exactly one render request.
///
/// Call [`WorkingDirectory::release`] on every exit path. If the owning future
/// is dropped before that (client disconnect, panic), the inner [`TempDir`]
/// removes the directory when it drops.
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: TempDir,
}

impl WorkingDirectory {
    /// Create `<root>/render-<uuid>`
    pub async fn allocate(root: &Path) -> io::Result<Self> {
        let root = root.to_path_buf();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&format!("{}{}", DIR_PREFIX, Uuid::new_v4()))
                .rand_bytes(0)
                .tempdir_in(root)
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        tracing::debug!(path = %dir.path().display(), "Working directory allocated");

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the directory and everything in it.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn release(self) {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;

        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => tracing::debug!(path = %path.display(), "Working directory removed"),
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {}
            Ok(Err(e)) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to remove working directory"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Working directory removal task failed"
            ),
        }
    }
}
