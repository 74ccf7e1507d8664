//! Filename batch matcher: resolve a directory of image files against the
//! catalog, then commit accepted matches to the asset store.
//!
//! Resolution is pure and parallel; the commit phase is sequential and
//! idempotent, keyed by (product, source, content checksum). One unreadable
//! file never aborts the rest of the batch.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::services::assets::{content_checksum, AssetRecord, AssetStore};

use super::decision::DecisionThresholds;
use super::index::CandidateIndex;
use super::scoring::ScoreWeights;
use super::{resolve_observation, MatchCandidate, Observation, ResolutionResult, UnresolvedReason};

/// File extensions considered image observations.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Provenance source label recorded with every persisted asset.
    pub source: String,
    pub vocabulary: super::Vocabulary,
    pub weights: ScoreWeights,
    pub thresholds: DecisionThresholds,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source: "filename-import".to_string(),
            vocabulary: super::Vocabulary::default(),
            weights: ScoreWeights::default(),
            thresholds: DecisionThresholds::filename(),
        }
    }
}

/// Pure resolution output for a single file.
#[derive(Debug, Clone)]
pub struct FileResolution {
    pub path: PathBuf,
    pub resolution: ResolutionResult,
    /// Content checksum; None when the file could not be read.
    pub checksum: Option<String>,
    pub error: Option<String>,
}

/// Terminal per-file outcome after the commit phase.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum FileOutcome {
    Created { product_id: i64 },
    SkippedExisting,
    SkippedNoMatch,
    Ambiguous { candidates: Vec<MatchCandidate> },
    Failed { error: String },
}

impl FileOutcome {
    fn label(&self) -> &'static str {
        match self {
            FileOutcome::Created { .. } => "created",
            FileOutcome::SkippedExisting => "skipped_existing",
            FileOutcome::SkippedNoMatch => "skipped_no_match",
            FileOutcome::Ambiguous { .. } => "ambiguous",
            FileOutcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchSummary {
    pub created: usize,
    pub skipped_existing: usize,
    pub skipped_no_match: usize,
    pub ambiguous: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.created + self.skipped_existing + self.skipped_no_match + self.ambiguous + self.failed
    }

    fn count(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Created { .. } => self.created += 1,
            FileOutcome::SkippedExisting => self.skipped_existing += 1,
            FileOutcome::SkippedNoMatch => self.skipped_no_match += 1,
            FileOutcome::Ambiguous { .. } => self.ambiguous += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} created, {} existing, {} no match, {} ambiguous, {} failed",
            self.total(),
            self.created,
            self.skipped_existing,
            self.skipped_no_match,
            self.ambiguous,
            self.failed
        )
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
    pub summary: BatchSummary,
}

/// Collect image files under `dir`, sorted for deterministic ordering.
pub fn collect_image_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

/// Pure phase: resolve every image file independently. No writes.
pub fn resolve_directory(
    dir: &Path,
    index: &CandidateIndex,
    config: &BatchConfig,
) -> Vec<FileResolution> {
    let files = collect_image_files(dir);
    info!("[Batch] Resolving {} image files in {dir:?}", files.len());

    files
        .into_par_iter()
        .map(|path| resolve_file(path, index, config))
        .collect()
}

fn resolve_file(path: PathBuf, index: &CandidateIndex, config: &BatchConfig) -> FileResolution {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let (checksum, error) = match fs::read(&path) {
        Ok(bytes) => (Some(content_checksum(&bytes)), None),
        Err(error) => {
            warn!("[Batch] Unreadable file {path:?}: {error}");
            (None, Some(error.to_string()))
        }
    };

    if error.is_some() {
        return FileResolution {
            path,
            resolution: ResolutionResult::Unresolved {
                reason: UnresolvedReason::SourceUnreadable,
            },
            checksum,
            error,
        };
    }

    let observation = Observation::from_text(&stem, &config.vocabulary);
    let resolution = resolve_observation(&observation, index, &config.weights, &config.thresholds);

    FileResolution {
        path,
        resolution,
        checksum,
        error,
    }
}

/// Commit phase: apply resolved outcomes to the asset store.
///
/// Idempotent per item: an asset already recorded under the same
/// (product, source, checksum) key is skipped, so re-running a batch never
/// duplicates records.
pub fn commit_resolutions(
    resolutions: Vec<FileResolution>,
    store: &dyn AssetStore,
    config: &BatchConfig,
) -> BatchReport {
    let mut outcomes = Vec::with_capacity(resolutions.len());
    let mut summary = BatchSummary::default();

    for item in resolutions {
        let outcome = commit_file(&item, store, config);
        info!("[Batch] {} → {}", item.path.display(), outcome.label());
        summary.count(&outcome);
        outcomes.push((item.path, outcome));
    }

    info!("[Batch] {summary}");
    BatchReport { outcomes, summary }
}

fn commit_file(item: &FileResolution, store: &dyn AssetStore, config: &BatchConfig) -> FileOutcome {
    if let Some(error) = &item.error {
        return FileOutcome::Failed {
            error: error.clone(),
        };
    }

    match &item.resolution {
        ResolutionResult::Resolved { product_id, .. } => {
            let Some(checksum) = item.checksum.as_deref() else {
                return FileOutcome::Failed {
                    error: "missing checksum for resolved file".to_string(),
                };
            };
            persist_asset(item, *product_id, checksum, store, config)
        }
        ResolutionResult::Ambiguous { candidates } => FileOutcome::Ambiguous {
            candidates: candidates.clone(),
        },
        ResolutionResult::Unresolved { .. } => FileOutcome::SkippedNoMatch,
    }
}

fn persist_asset(
    item: &FileResolution,
    product_id: i64,
    checksum: &str,
    store: &dyn AssetStore,
    config: &BatchConfig,
) -> FileOutcome {
    match store.exists(product_id, &config.source, checksum) {
        Ok(true) => return FileOutcome::SkippedExisting,
        Ok(false) => {}
        Err(error) => {
            return FileOutcome::Failed {
                error: error.to_string(),
            }
        }
    }

    // Re-read at commit time; the resolve phase dropped the bytes.
    let bytes = match fs::read(&item.path) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!("[Batch] File vanished before commit {:?}: {error}", item.path);
            return FileOutcome::Failed {
                error: error.to_string(),
            };
        }
    };

    let original_name = item
        .path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let record = AssetRecord::new(product_id, &config.source, &original_name, checksum);

    match store.persist(&record, &bytes) {
        Ok(()) => FileOutcome::Created { product_id },
        Err(error) => FileOutcome::Failed {
            error: error.to_string(),
        },
    }
}

/// Resolve and commit in one call.
pub fn match_image_directory(
    dir: &Path,
    index: &CandidateIndex,
    store: &dyn AssetStore,
    config: &BatchConfig,
) -> BatchReport {
    let resolutions = resolve_directory(dir, index, config);
    commit_resolutions(resolutions, store, config)
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
