//! Rotating log file with size-based rotation and backup retention.
//!
//! The log file lives beside the workflow data and is the only place log
//! output goes; stdout carries the result document.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Before each write the current file size is checked. Past
/// `MAX_FILE_SIZE_BYTES` the file is renamed to `<name>.<unix_timestamp>`, a
/// fresh file is opened and backups beyond `MAX_BACKUP_FILES` are removed.
///
/// Cloning shares the underlying handle, which is how the writer is handed to
/// `tracing_subscriber` as a [`MakeWriter`].
///
/// # Example
///
/// ```rust
/// use jiraflow::observability::FileWriter;
/// use std::io::Write;
///
/// let dir = std::env::temp_dir();
/// let mut writer = FileWriter::new(dir.join("jiraflow-doc.log"));
/// writeln!(writer, "hello")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone)]
pub struct FileWriter {
    file_path: PathBuf,
    /// Lazily opened on first write.
    handle: Arc<Mutex<Option<File>>>,
}

impl FileWriter {
    /// Creates a writer for `file_path`. The file is not opened until the first
    /// write, so construction cannot fail.
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            handle: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.handle
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))
    }

    fn check_and_rotate(&self, handle: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > MAX_FILE_SIZE_BYTES {
                *handle = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp();
        let mut backup_name = self.file_path.clone().into_os_string();
        backup_name.push(format!(".{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup_name))?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, newest kept.
    ///
    /// Individual deletion errors are ignored so cleanup continues.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;

        let file_name = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))?;
        let backup_prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&backup_prefix))
            })
            .collect();

        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut handle = self.lock()?;
        self.check_and_rotate(&mut handle)?;

        if handle.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *handle = Some(file);
        }

        let file = handle
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock()?.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_across_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jiraflow.log");

        let mut first = FileWriter::new(path.clone());
        writeln!(first, "one").unwrap();
        let mut second = FileWriter::new(path.clone());
        writeln!(second, "two").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn oversized_file_is_rotated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jiraflow.log");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();

        let mut writer = FileWriter::new(path.clone());
        writeln!(writer, "fresh").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("jiraflow.log."))
            .count();
        assert_eq!(backups, 1);
    }
}
