pub mod clipboard;
pub mod literal;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use literal::{extract_solution_literal, ExtractError};

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The controller as pasted into the game editor, next to this crate's manifest.
pub const SOLUTION_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/solution/solution.js");

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no `solution = {{ ... }};` assignment found in {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// How the `copy_solution` binary reports one copy attempt to the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Report {
    /// Printed on stdout, exit status 0.
    Copied(&'static str),
    /// Printed on stderr, exit status 0.
    NothingToCopy(&'static str),
    /// Logged as an error, exit status 1.
    Failed(String),
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Copied(_) | Report::NothingToCopy(_) => 0,
            Report::Failed(_) => 1,
        }
    }
}

pub fn report(result: &Result<String, CopyError>) -> Report {
    match result {
        Ok(_) => Report::Copied("Copied to clipboard! 📋"),
        Err(CopyError::NotFound(_)) => Report::NothingToCopy("Something went wrong! 😢"),
        Err(e) => Report::Failed(e.to_string()),
    }
}

/// Reads the controller source at `path` and puts its solution literal on `clipboard`.
pub fn copy_solution<P: AsRef<Path>, C: Clipboard>(path: P, clipboard: &mut C) -> Result<String, CopyError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CopyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let literal = extract_solution_literal(&source)?
        .ok_or_else(|| CopyError::NotFound(path.to_path_buf()))?;
    debug!("Extracted {} bytes from {}", literal.len(), path.display());

    clipboard.write_text(literal)?;
    Ok(literal.to_owned())
}
