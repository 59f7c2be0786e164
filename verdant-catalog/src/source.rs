//! Loading of curated plant source files.
//!
//! A source file is a JSON (or YAML) document holding a sequence of plant
//! payloads, either as the top-level value or under a `plants` key. Entries
//! are kept as raw values so a single malformed payload can be reported on its
//! own instead of failing the whole file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::payload::PlantPayload;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable {path}: {source}")]
    Unavailable {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yml::Error,
    },
}

/// A loaded source file.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub entries: Vec<serde_json::Value>,
}

impl SourceDocument {
    /// File name used in reports and the import log.
    pub fn source_name(&self) -> String {
        source_name(&self.path)
    }
}

/// Display name for a source path: the file name, or the full path if it has none.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    List(Vec<serde_json::Value>),
    Wrapped { plants: Vec<serde_json::Value> },
}

impl DocumentShape {
    fn into_entries(self) -> Vec<serde_json::Value> {
        match self {
            Self::List(entries) | Self::Wrapped { plants: entries } => entries,
        }
    }
}

/// Read and parse one source file. The format is chosen by extension:
/// `.yaml` / `.yml` are YAML, anything else JSON.
pub fn load_source(path: &Path) -> Result<SourceDocument, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SourceError::Unavailable {
        path: path.display().to_string(),
        source: e,
    })?;

    let shape: DocumentShape = if is_yaml(path) {
        serde_yml::from_str(&contents).map_err(|e| SourceError::Yaml {
            path: path.display().to_string(),
            source: e,
        })?
    } else {
        serde_json::from_str(&contents).map_err(|e| SourceError::Json {
            path: path.display().to_string(),
            source: e,
        })?
    };

    Ok(SourceDocument {
        path: path.to_path_buf(),
        entries: shape.into_entries(),
    })
}

/// Decode one raw entry into a payload.
pub fn decode_entry(entry: &serde_json::Value) -> Result<PlantPayload, serde_json::Error> {
    PlantPayload::deserialize(entry)
}

/// Expand a list of paths: directories are replaced by their source files in
/// name order, plain paths are kept as given (even if they do not exist, so
/// the importer can report them).
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>, SourceError> {
    let mut out = Vec::new();
    for path in paths {
        if !path.is_dir() {
            out.push(path.clone());
            continue;
        }

        let mut entries: Vec<_> = std::fs::read_dir(path)
            .map_err(|e| SourceError::Unavailable {
                path: path.display().to_string(),
                source: e,
            })?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_source_file(p))
            .collect();
        entries.sort();
        out.extend(entries);
    }
    Ok(out)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

fn is_source_file(path: &Path) -> bool {
    is_yaml(path) || path.extension().is_some_and(|ext| ext == "json")
}
