//! Storage operations
//!
//! Snapshots the resources a command can ask for.

use log::{debug, info};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{ProtocolError, SessionError, StorageError};
use crate::protocol::Command;
use crate::storage::results::Snapshot;

/// Snapshots the resource named by a recognised command.
pub async fn snapshot(
    command: &Command,
    root: &Path,
    include_dots: bool,
) -> Result<Snapshot, SessionError> {
    match command {
        Command::List => Ok(list_directory(root, include_dots).await?),
        Command::Get(filename) => Ok(read_file_lines(root, filename).await?),
        Command::Unrecognized => Err(ProtocolError::Unrecognized.into()),
    }
}

/// Lists the entries of `root` in the order the directory yields them.
///
/// Each unit is the entry name's raw bytes followed by `\n`. `read_dir` never
/// reports `.` and `..`, so they are prepended only when `include_dots` is set.
pub async fn list_directory(root: &Path, include_dots: bool) -> Result<Snapshot, StorageError> {
    let mut entries = fs::read_dir(root)
        .await
        .map_err(StorageError::DirectoryUnreadable)?;

    let mut units = Vec::new();
    if include_dots {
        units.push(b".\n".to_vec());
        units.push(b"..\n".to_vec());
    }

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(StorageError::DirectoryUnreadable)?
    {
        let mut unit = entry.file_name().into_vec();
        unit.push(b'\n');
        units.push(unit);
    }

    info!("Listed {} - {} entries", root.display(), units.len());
    Ok(Snapshot::new(units))
}

/// Reads `filename`, relative to `root`, as newline-delimited lines.
///
/// Lines keep their terminating `\n`; a final line without one is kept as
/// is. The path must name a regular file.
pub async fn read_file_lines(
    root: &Path,
    filename: impl AsRef<OsStr>,
) -> Result<Snapshot, StorageError> {
    let filename = filename.as_ref();
    let path = root.join(filename);

    // Checked before opening: opening a FIFO blocks.
    let metadata = fs::metadata(&path)
        .await
        .map_err(|e| StorageError::from_file_io(filename, e))?;
    if !metadata.is_file() {
        return Err(StorageError::NotRegularFile(
            filename.to_string_lossy().into_owned(),
        ));
    }

    let file = File::open(&path)
        .await
        .map_err(|e| StorageError::from_file_io(filename, e))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|e| StorageError::from_file_io(filename, e))?;
    if !metadata.is_file() {
        return Err(StorageError::NotRegularFile(
            filename.to_string_lossy().into_owned(),
        ));
    }

    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    loop {
        let mut line = Vec::new();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| StorageError::from_file_io(filename, e))?;
        if n == 0 {
            break;
        }
        lines.push(line);
    }

    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(Snapshot::new(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::PermissionsExt;
    use std::os::unix::net::UnixListener;
    use std::time::Duration;
    use tempfile::TempDir;

    fn names(snapshot: &Snapshot) -> HashSet<String> {
        snapshot
            .units()
            .iter()
            .map(|u| String::from_utf8_lossy(u).into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_list_directory_entries() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let snapshot = list_directory(dir.path(), false).await.unwrap();
        assert_eq!(snapshot.count(), 3);
        let expected: HashSet<String> = ["a.txt\n", "b.txt\n", "sub\n"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names(&snapshot), expected);
    }

    #[tokio::test]
    async fn test_list_directory_with_dots() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let snapshot = list_directory(dir.path(), true).await.unwrap();
        assert_eq!(snapshot.count(), 3);
        assert_eq!(snapshot.units()[0], b".\n");
        assert_eq!(snapshot.units()[1], b"..\n");
    }

    #[tokio::test]
    async fn test_list_directory_keeps_raw_names() {
        let dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(name), "x").unwrap();

        let snapshot = list_directory(dir.path(), false).await.unwrap();
        assert_eq!(snapshot.units(), &[b"caf\xe9.txt\n".to_vec()]);
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let dir = TempDir::new().unwrap();
        let snapshot = list_directory(dir.path(), false).await.unwrap();
        assert_eq!(snapshot.count(), 1);
        assert!(snapshot.units()[0].is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = list_directory(&dir.path().join("gone"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DirectoryUnreadable(_)));
    }

    #[tokio::test]
    async fn test_read_file_lines_keeps_newlines() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("f.txt"), "one\ntwo\nthree").unwrap();

        let snapshot = read_file_lines(dir.path(), "f.txt").await.unwrap();
        assert_eq!(snapshot.count(), 3);
        assert_eq!(
            snapshot.units(),
            &[b"one\n".to_vec(), b"two\n".to_vec(), b"three".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_read_file_trailing_newline() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("f.txt"), "one\n\ntwo\n").unwrap();

        let snapshot = read_file_lines(dir.path(), "f.txt").await.unwrap();
        assert_eq!(snapshot.count(), 3);
        assert_eq!(snapshot.units().concat(), b"one\n\ntwo\n");
    }

    #[tokio::test]
    async fn test_read_empty_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();

        let snapshot = read_file_lines(dir.path(), "empty.txt").await.unwrap();
        assert_eq!(snapshot.count(), 1);
        assert!(snapshot.units()[0].is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_file_lines(dir.path(), "missing.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_directory_is_not_regular() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let err = read_file_lines(dir.path(), "sub").await.unwrap_err();
        assert!(matches!(err, StorageError::NotRegularFile(_)));
    }

    #[tokio::test]
    async fn test_read_file_with_non_utf8_name() {
        let dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(name), "bonjour\n").unwrap();

        let snapshot = read_file_lines(dir.path(), name).await.unwrap();
        assert_eq!(snapshot.units(), &[b"bonjour\n".to_vec()]);

        // The lossy spelling names a different file.
        let err = read_file_lines(dir.path(), "caf\u{fffd}.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_socket_is_not_regular() {
        let dir = TempDir::new().unwrap();
        let _listener = UnixListener::bind(dir.path().join("sock")).unwrap();

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            read_file_lines(dir.path(), "sock"),
        )
        .await
        .expect("reading a socket must not block")
        .unwrap_err();
        assert!(matches!(err, StorageError::NotRegularFile(_)));
        assert_eq!(
            err.client_message(),
            "The file name requested is not associated with a regular file"
        );
    }

    #[tokio::test]
    async fn test_read_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "hidden\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores mode bits; nothing to check there.
        if std::fs::File::open(&path).is_ok() {
            return;
        }

        let err = read_file_lines(dir.path(), "secret.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied(_)));
        assert_eq!(err.client_message(), "Permissions denied to open file");
    }

    #[tokio::test]
    async fn test_snapshot_rejects_unrecognized() {
        let dir = TempDir::new().unwrap();
        let err = snapshot(&Command::Unrecognized, dir.path(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::Unrecognized)
        ));
    }
}
