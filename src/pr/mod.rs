pub mod types;

pub use types::{Comment, PullRequestRecord};

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use types::{Edge, SearchDocument};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read input directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read input file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a PR search export (expected data.search.edges): {source}", .path.display())]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed record at edge {index} ({pr}) in {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        index: usize,
        pr: String,
        source: serde_json::Error,
    },
}

/// A validated PR record together with the edge it was read from.
///
/// The raw edge is what ends up in the audit dump, so it is kept byte-for-byte
/// as parsed rather than re-serialized from the record.
#[derive(Debug, Clone)]
pub struct PullRequestEntry {
    pub record: PullRequestRecord,
    pub raw: serde_json::Value,
}

/// Load every PR record from the `.json` files in `dir`.
///
/// Files are read in name order so repeated runs produce identical output.
/// Subdirectories and files with other extensions are skipped. A PR number
/// seen again (e.g. a re-exported page) is dropped; the first copy wins.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn load_dir(dir: &Path) -> Result<Vec<PullRequestEntry>, SourceError> {
    let read_dir_err = |source: std::io::Error| SourceError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for dir_entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = dir_entry.map_err(read_dir_err)?.path();
        if is_data_file(&path) {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-data file");
        }
    }
    files.sort();

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for path in &files {
        let loaded = load_file(path)?;
        debug!(path = %path.display(), records = loaded.len(), "read export file");
        for entry in loaded {
            if seen.insert(entry.record.number) {
                entries.push(entry);
            } else {
                duplicates += 1;
                warn!(path = %path.display(), pr = entry.record.number, "duplicate PR record, keeping first copy");
            }
        }
    }

    info!(files = files.len(), records = entries.len(), duplicates, "loaded PR records");
    Ok(entries)
}

/// Load and validate the PR records of a single export file.
pub fn load_file(path: &Path) -> Result<Vec<PullRequestEntry>, SourceError> {
    let contents = fs::read_to_string(path).map_err(|source| SourceError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &contents)
}

/// Parse one export document and validate each of its edges.
///
/// `path` is only used for diagnostics.
pub fn parse_document(path: &Path, contents: &str) -> Result<Vec<PullRequestEntry>, SourceError> {
    let document: SearchDocument =
        serde_json::from_str(contents).map_err(|source| SourceError::Document {
            path: path.to_path_buf(),
            source,
        })?;

    document
        .data
        .search
        .edges
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let edge = Edge::deserialize(&raw).map_err(|source| SourceError::Record {
                path: path.to_path_buf(),
                index,
                pr: describe_edge(&raw),
                source,
            })?;
            Ok(PullRequestEntry {
                record: edge.node.into(),
                raw,
            })
        })
        .collect()
}

fn is_data_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Best-effort label for an edge that failed validation.
fn describe_edge(raw: &serde_json::Value) -> String {
    match raw.pointer("/node/number").and_then(|n| n.as_u64()) {
        Some(number) => format!("PR #{number}"),
        None => "unknown PR".to_string(),
    }
}
