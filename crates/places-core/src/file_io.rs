//! File helpers shared by the JSON stores and the backup writer.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::Result;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling of `path` unique to this process and write.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

/// Write `data` to `path` so readers never observe a partially written file.
///
/// The bytes go to a sibling temp file which is synced and then renamed over
/// the target. Each call uses its own temp file, so concurrent writers (in
/// this process or another) each publish a complete document and the last
/// rename wins. Parent directories are created as needed.
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    debug!(path = %path.display(), bytes = data.len(), "file_io: write_atomic");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            warn!(parent = %parent.display(), error = %e, "file_io: create_dir_all failed");
            e
        })?;
    }

    let temp_path = temp_sibling(path);
    let written = write_and_rename(&temp_path, path, data).await;
    if written.is_err() {
        // Best effort; the temp file may never have been created.
        let _ = fs::remove_file(&temp_path).await;
    }
    written
}

async fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        warn!(temp_path = %temp_path.display(), error = %e, "file_io: File::create failed");
        e
    })?;
    file.write_all(data).await.map_err(|e| {
        warn!(error = %e, "file_io: write_all failed");
        e
    })?;
    file.sync_all().await?;
    drop(file);

    fs::rename(temp_path, path).await.map_err(|e| {
        warn!(from = %temp_path.display(), to = %path.display(), error = %e, "file_io: rename failed");
        e
    })?;

    Ok(())
}

/// Read a UTF-8 file, returning `None` when it does not exist.
pub async fn read_to_string_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/backup.html");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(entries(path.parent().unwrap()), vec!["backup.html"]);
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_temp_files_are_unique_per_write() {
        let target = Path::new("/data/places.json");
        let a = temp_sibling(target);
        let b = temp_sibling(target);
        assert_ne!(a, b);
        assert_eq!(a.parent(), target.parent());
        assert_ne!(a, target);
    }

    #[tokio::test]
    async fn test_write_atomic_to_tmp_named_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.tmp");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(entries(dir.path()), vec!["export.tmp"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_publish_whole_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarksBackup.html");
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();

        let writes = payloads.iter().map(|data| {
            let path = path.clone();
            let data = data.clone();
            tokio::spawn(async move { write_atomic(&path, &data).await })
        });
        for handle in writes.collect::<Vec<_>>() {
            handle.await.unwrap().unwrap();
        }

        let published = std::fs::read(&path).unwrap();
        assert!(payloads.contains(&published));
        assert_eq!(entries(dir.path()), vec!["bookmarksBackup.html"]);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(read_to_string_if_exists(&missing).await.unwrap(), None);
    }
}
