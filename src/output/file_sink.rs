//! Line-delimited URL file output
//!
//! One URL per line, UTF-8, flushed after every accepted URL.

use crate::output::traits::{OutputResult, UrlSink};
use crate::url::CanonicalUrl;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write-through sink backed by a text file
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    accepted: usize,
}

impl FileSink {
    /// Creates (or truncates) the output file
    ///
    /// # Arguments
    ///
    /// * `path` - Where the URL list is written
    ///
    /// # Returns
    ///
    /// * `Ok(FileSink)` - The file was created
    /// * `Err(OutputError)` - The file could not be created
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            accepted: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UrlSink for FileSink {
    fn accept(&mut self, url: &CanonicalUrl) -> OutputResult<()> {
        writeln!(self.writer, "{}", url)?;
        self.writer.flush()?;
        self.accepted += 1;
        Ok(())
    }

    fn accepted(&self) -> usize {
        self.accepted
    }
}

/// Result of the query-string post-pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilterOutcome {
    /// URLs left in the file
    pub kept: usize,
    /// URLs dropped because they had a `?query`
    pub removed: usize,
}

/// Removes every URL with a query component from a URL file
///
/// The filtered list is written to a temporary file in the same directory and
/// renamed over the original, so readers only ever see the old or the new
/// complete file.
pub fn strip_query_urls(path: &Path) -> OutputResult<QueryFilterOutcome> {
    let reader = BufReader::new(File::open(path)?);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    let mut outcome = QueryFilterOutcome {
        kept: 0,
        removed: 0,
    };

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        for line in reader.lines() {
            let line = line?;
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            if url.contains('?') {
                outcome.removed += 1;
            } else {
                writeln!(writer, "{}", url)?;
                outcome.kept += 1;
            }
        }
        writer.flush()?;
    }

    // NamedTempFile is created 0600; keep the mode the URL list was created with
    let permissions = fs::metadata(path)?.permissions();
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path)?;
    tracing::debug!(
        "Query filter kept {} and removed {} URLs in {}",
        outcome.kept,
        outcome.removed,
        path.display()
    );

    Ok(outcome)
}

/// Final state of the URL file after the post-pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOutcome {
    /// URLs left in the file
    pub kept: usize,
    /// URLs dropped by the query filter
    pub removed: usize,
    /// The file was deleted because no URLs were left
    pub deleted: bool,
}

impl FinalizeOutcome {
    /// Whether the run produced a usable URL list
    pub fn is_empty(&self) -> bool {
        self.kept == 0
    }
}

/// Applies the post-run decisions to a finished URL file
///
/// Unless `include_params` is set, URLs with a query are filtered out
/// through [`strip_query_urls`]; with it, the file is only counted and left
/// untouched. A file with no URLs left is deleted.
///
/// # Returns
///
/// * `Ok(FinalizeOutcome)` - Counts, and whether the file was deleted
/// * `Err(OutputError)` - The file could not be read, rewritten or removed
pub fn finalize(path: &Path, include_params: bool) -> OutputResult<FinalizeOutcome> {
    let (kept, removed) = if include_params {
        (count_urls(path)?, 0)
    } else {
        let filtered = strip_query_urls(path)?;
        (filtered.kept, filtered.removed)
    };

    let deleted = kept == 0;
    if deleted {
        tracing::warn!("No URLs left in {}, removing it", path.display());
        remove_output(path)?;
    }

    Ok(FinalizeOutcome {
        kept,
        removed,
        deleted,
    })
}

/// Counts the non-blank lines of a URL file
pub fn count_urls(path: &Path) -> OutputResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Deletes an output file that ended up empty
pub fn remove_output(path: &Path) -> OutputResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");

        let mut sink = FileSink::create(&path).unwrap();
        sink.accept(&"https://a.com/one".parse().unwrap()).unwrap();

        // Visible before the sink is dropped
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://a.com/one\n");

        sink.accept(&"https://a.com/two".parse().unwrap()).unwrap();
        assert_eq!(sink.accepted(), 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://a.com/one\nhttps://a.com/two\n");
    }

    #[test]
    fn test_strip_query_urls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(
            &path,
            "https://a.com/\nhttps://a.com/list?page=2\nhttps://a.com/about\n",
        )
        .unwrap();

        let outcome = strip_query_urls(&path).unwrap();
        assert_eq!(outcome, QueryFilterOutcome { kept: 2, removed: 1 });

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://a.com/\nhttps://a.com/about\n");
    }

    #[test]
    fn test_strip_query_urls_can_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.com/?a=1\n").unwrap();

        let outcome = strip_query_urls(&path).unwrap();
        assert_eq!(outcome.kept, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_strip_query_urls_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.com/\nhttps://a.com/?a=1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        strip_query_urls(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_finalize_mixed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(
            &path,
            "https://a.com/a\nhttps://a.com/b?x=1\nhttps://a.com/c\n",
        )
        .unwrap();

        let outcome = finalize(&path, false).unwrap();
        assert_eq!(
            outcome,
            FinalizeOutcome {
                kept: 2,
                removed: 1,
                deleted: false
            }
        );
        assert!(!outcome.is_empty());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "https://a.com/a\nhttps://a.com/c\n"
        );
    }

    #[test]
    fn test_finalize_everything_filtered_deletes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.com/?a=1\nhttps://a.com/list?page=2\n").unwrap();

        let outcome = finalize(&path, false).unwrap();
        assert_eq!(outcome.kept, 0);
        assert_eq!(outcome.removed, 2);
        assert!(outcome.deleted);
        assert!(outcome.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_finalize_include_params_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let content = "https://a.com/a\nhttps://a.com/b?x=1\n\n";
        fs::write(&path, content).unwrap();

        let outcome = finalize(&path, true).unwrap();
        assert_eq!(
            outcome,
            FinalizeOutcome {
                kept: 2,
                removed: 0,
                deleted: false
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_finalize_empty_file_with_params_is_deleted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "").unwrap();

        let outcome = finalize(&path, true).unwrap();
        assert!(outcome.deleted);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_output_missing_is_ok() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("never-created.txt");
        assert!(remove_output(&path).is_ok());
    }
}
