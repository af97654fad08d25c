use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::fs::move_into_place;
use crate::core::metadata::{get_movie_info, MetadataProvider};
use crate::core::naming::{build_destination, parse_query};
use crate::utils::{Error, MovieReorgResult};

#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
    pub dry_run: bool,
    pub fail_fast: bool,
}

impl OrganizeOptions {
    pub fn from_config(library: &crate::config::LibraryConfig) -> Self {
        Self {
            extensions: library
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            dry_run: library.dry_run,
            fail_fast: library.fail_fast,
        }
    }
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self::from_config(&crate::config::LibraryConfig::default())
    }
}

/// A video file found directly inside the library directory.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: String,
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMatch,
    EmptyTitle,
    /// The matched title has nothing left once made filesystem-safe.
    UnusableTitle,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatch => f.write_str("no match"),
            SkipReason::EmptyTitle => f.write_str("empty title"),
            SkipReason::UnusableTitle => f.write_str("unusable title"),
        }
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Moved { source: PathBuf, destination: PathBuf },
    Planned { source: PathBuf, destination: PathBuf },
    Skipped { file: String, reason: SkipReason },
    Failed { file: String, error: Error },
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Moved { source, destination } => {
                write!(f, "Moved: {} -> {}", display_name(source), destination.display())
            }
            FileOutcome::Planned { source, destination } => {
                write!(f, "Would move: {} -> {}", display_name(source), destination.display())
            }
            FileOutcome::Skipped { file, reason } => write!(f, "Skipped: {file} ({reason})"),
            FileOutcome::Failed { file, error } => write!(f, "Failed: {file}: {error}"),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub outcomes: Vec<FileOutcome>,
    /// Set when `fail_fast` stopped the run before every candidate was seen.
    pub halted: bool,
}

impl OrganizeReport {
    pub fn moved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Moved { .. } | FileOutcome::Planned { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Extension of `file_name` found in `extensions`, as written in the name.
/// A bare ".mkv" counts as an mkv file.
fn matching_extension<'a>(file_name: &'a str, extensions: &[String]) -> Option<&'a str> {
    extensions.iter().find_map(|ext| {
        let cut = file_name.len().checked_sub(ext.len() + 1)?;
        let suffix = file_name.get(cut..)?;
        let found = suffix.strip_prefix('.')?;
        found.eq_ignore_ascii_case(ext).then_some(found)
    })
}

/// Video files directly inside `directory`, in listing order.
pub fn scan_candidates(directory: &Path, extensions: &[String]) -> MovieReorgResult<Vec<CandidateFile>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        let Some(extension) = matching_extension(&file_name, extensions).map(str::to_string) else {
            continue;
        };
        candidates.push(CandidateFile {
            path,
            file_name,
            extension,
        });
    }
    Ok(candidates)
}

/// Sort every video file directly inside `directory` into a
/// "Title (Year)" folder next to it, one file at a time.
pub async fn organize(
    directory: &Path,
    provider: &dyn MetadataProvider,
    options: &OrganizeOptions,
) -> MovieReorgResult<OrganizeReport> {
    if !directory.is_dir() {
        return Err(Error::InvalidDirectory(directory.to_path_buf()));
    }

    let candidates = scan_candidates(directory, &options.extensions)?;
    tracing::info!(
        "Found {} video file(s) in '{}' (provider: {})",
        candidates.len(),
        directory.display(),
        provider.name()
    );

    let mut report = OrganizeReport::default();
    for candidate in candidates {
        let outcome = match process_file(directory, &candidate, provider, options).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!("Failed to process '{}': {error}", candidate.file_name);
                FileOutcome::Failed {
                    file: candidate.file_name.clone(),
                    error,
                }
            }
        };
        let failed = matches!(outcome, FileOutcome::Failed { .. });
        report.outcomes.push(outcome);

        if failed && options.fail_fast {
            tracing::warn!("fail_fast is set: stopping after '{}'", candidate.file_name);
            report.halted = true;
            break;
        }
    }

    Ok(report)
}

async fn process_file(
    directory: &Path,
    candidate: &CandidateFile,
    provider: &dyn MetadataProvider,
    options: &OrganizeOptions,
) -> MovieReorgResult<FileOutcome> {
    let query = parse_query(&candidate.file_name);
    if query.title.is_empty() {
        return Ok(FileOutcome::Skipped {
            file: candidate.file_name.clone(),
            reason: SkipReason::EmptyTitle,
        });
    }

    tracing::debug!(
        "'{}' -> query='{}' resolution={:?}",
        candidate.file_name,
        query.title,
        query.resolution
    );
    let info = get_movie_info(provider, &query.title).await?;
    let Some((title, year)) = info.resolved() else {
        tracing::info!("No match for '{}' (query '{}')", candidate.file_name, query.title);
        return Ok(FileOutcome::Skipped {
            file: candidate.file_name.clone(),
            reason: SkipReason::NoMatch,
        });
    };

    let Some(dest) =
        build_destination(title, year, query.resolution.as_deref(), &candidate.extension)
    else {
        tracing::warn!("Matched title '{}' for '{}' is not usable as a folder name", title, candidate.file_name);
        return Ok(FileOutcome::Skipped {
            file: candidate.file_name.clone(),
            reason: SkipReason::UnusableTitle,
        });
    };
    let folder = directory.join(&dest.folder_name);

    if options.dry_run {
        return Ok(FileOutcome::Planned {
            source: candidate.path.clone(),
            destination: folder.join(&dest.file_name),
        });
    }

    let destination = move_into_place(&candidate.path, &folder, &dest.file_name)?;
    tracing::info!("Moved '{}' -> '{}'", candidate.file_name, destination.display());
    Ok(FileOutcome::Moved {
        source: candidate.path.clone(),
        destination,
    })
}
