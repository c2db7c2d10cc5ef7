use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::article::Article;
use crate::collectors::NewsItem;

/// Which rows an incoming article is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Only rows on disk when the run started. Two identical new articles in
    /// one batch are both written.
    #[default]
    StartOfRun,
    /// Rows on disk plus every row written earlier in this run.
    PerRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendReport {
    pub appended: usize,
    pub skipped: usize,
}

/// Append-only CSV of `[published, title, description]` rows, no header.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every triple already in the file; empty when the file does not exist yet.
    pub fn load_existing(&self) -> Result<HashSet<Article>> {
        let mut existing = HashSet::new();
        if !self.path.exists() {
            return Ok(existing);
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        for (i, record) in rdr.records().enumerate() {
            let record =
                record.with_context(|| format!("failed to read row {} of {}", i + 1, self.path.display()))?;
            if record.len() < 3 {
                bail!(
                    "row {} of {} has {} fields, expected 3",
                    i + 1,
                    self.path.display(),
                    record.len()
                );
            }
            existing.insert(Article::new(&record[0], &record[1], &record[2]));
        }
        Ok(existing)
    }

    /// Sanitizes each item in order and appends the ones not already stored.
    ///
    /// Rows are flushed one at a time, so a failure part-way through keeps
    /// everything written before it. Nothing is created when `items` is empty.
    pub fn append(&self, items: &[NewsItem], policy: DedupPolicy) -> Result<AppendReport> {
        let mut report = AppendReport::default();
        if items.is_empty() {
            return Ok(report);
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("failed to create directory {}", dir.display()))?;
        }

        let mut seen = self.load_existing()?;
        debug!(existing = seen.len(), path = %self.path.display(), "loaded existing rows");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        for item in items {
            let article = Article::from_item(item)?;
            if seen.contains(&article) {
                report.skipped += 1;
                continue;
            }
            wtr.serialize(&article)
                .with_context(|| format!("failed to write row to {}", self.path.display()))?;
            wtr.flush()
                .with_context(|| format!("failed to flush {}", self.path.display()))?;
            report.appended += 1;
            if policy == DedupPolicy::PerRow {
                seen.insert(article);
            }
        }
        Ok(report)
    }
}
