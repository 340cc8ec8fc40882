use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::AgentPreferences;

/// Errors that can occur while reading preference files
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: expected `name: pref1, pref2`, got {content:?}")]
    MissingSeparator { line: usize, content: String },
}

/// Parse the `name: pref1, pref2, ...` format, one agent per line.
///
/// Whitespace around names and entries is ignored, as are lines with a
/// blank name and empty entries. Anything after a second `:` on a line is
/// dropped. Identifiers are not cross-checked against the other side.
pub fn parse_preferences(input: &str) -> Result<Vec<AgentPreferences>, ParseError> {
    let mut agents = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let mut pieces = line.split(':');
        let name = pieces.next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }

        let Some(rest) = pieces.next() else {
            return Err(ParseError::MissingSeparator {
                line: number + 1,
                content: line.to_string(),
            });
        };

        let preferences = rest
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        agents.push(AgentPreferences {
            id: name.to_string(),
            preferences,
        });
    }

    Ok(agents)
}

/// Read and parse a preference file
pub fn load_preferences<P: AsRef<Path>>(path: P) -> Result<Vec<AgentPreferences>, ParseError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let agents = parse_preferences(&content)?;
    tracing::debug!("Loaded {} agents from {}", agents.len(), path.display());
    Ok(agents)
}
