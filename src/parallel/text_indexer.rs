use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, Result};
use crate::index::concurrent::ConcurrentIndex;
use crate::index::inverted::InvertedIndex;
use crate::parallel::task_queue::TaskQueue;

/// Indexes `.txt`/`.text` files from disk.
///
/// A single file path is indexed as-is; a directory is walked recursively. Failures
/// on one file or subdirectory are logged and the walk carries on with its siblings.
pub struct TextIndexer {
    pub analyzer: Arc<Analyzer>,
    pub progress: Arc<AtomicUsize>,
}

impl TextIndexer {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        TextIndexer {
            analyzer,
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Files indexed so far.
    pub fn get_progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    /// Single-threaded ingestion. Each file is built separately and merged into
    /// `index` only if it was read to the end.
    pub fn index_path(&self, path: &Path, index: &mut InvertedIndex) -> Result<()> {
        for file in collect_files(path)? {
            let mut local = InvertedIndex::new();
            match index_file(&self.analyzer, &file, &mut local) {
                Ok(()) => {
                    index.merge_from(&local);
                    self.progress.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => tracing::warn!("Skipping {}: {}", file.display(), e),
            }
        }
        Ok(())
    }

    /// One task per file: each builds a private index and merges it into `index`.
    /// Returns once the queue is idle.
    pub fn index_path_parallel(
        &self,
        path: &Path,
        index: &Arc<ConcurrentIndex>,
        queue: &TaskQueue,
    ) -> Result<()> {
        let files = collect_files(path)?;
        tracing::info!("Indexing {} files from {}", files.len(), path.display());

        for file in files {
            let analyzer = Arc::clone(&self.analyzer);
            let index = Arc::clone(index);
            let progress = Arc::clone(&self.progress);

            queue.submit(move || {
                let mut local = InvertedIndex::new();
                index_file(&analyzer, &file, &mut local).map_err(|e| {
                    Error::ingestion(format!("{}: {}", file.display(), e.context))
                })?;
                index.merge_from(&local);
                progress.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Indexed {}", file.display());
                Ok(())
            })?;
        }

        queue.await_idle();
        Ok(())
    }
}

pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("text"))
        .unwrap_or(false)
}

/// Files to index under `path`. A path that is not a directory is returned as-is
/// regardless of its extension. Symbolic links inside a directory are not followed.
pub fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path)
        .map_err(|e| Error::ingestion(format!("{}: {}", path.display(), e)))?;

    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir() && is_text_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Indexes one UTF-8 file under its path string. Positions run on across lines.
pub fn index_file(analyzer: &Analyzer, path: &Path, index: &mut InvertedIndex) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);
    let location = path.to_string_lossy();
    let mut position = 0;

    for line in reader.lines() {
        let line = line?;
        position = index.add_batch(analyzer.stems(&line), &location, position);
    }
    Ok(())
}
