//! Prepend a metadata header block to a documentation file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_TARGET: &str = ".cursor/rules/270-internationalization.mdc";

pub const DEFAULT_FRONTMATTER: &str = r#"---
description: "Standards for implementing internationalization across the application"
globs: ["**/*.py", "**/*.js", "**/*.ts", "**/*.jsx", "**/*.tsx",
        "locales/**/*"]
alwaysApply: false
---

"#;

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("file {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("frontmatter was not written to {path}, file begins with {head:?}")]
    Verification { path: PathBuf, head: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Added { bytes_before: usize, bytes_after: usize },
    AlreadyPresent,
}

/// True if `content` opens with a `---` delimiter line, after an optional BOM.
pub fn has_frontmatter(content: &str) -> bool {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line = content.split('\n').next().unwrap_or_default();
    first_line.trim_end_matches('\r') == DELIMITER && content.len() > first_line.len()
}

/// Prepend `header` to the file at `path` unless it already has frontmatter.
pub fn patch_file(path: &Path, header: &str) -> Result<PatchOutcome, FrontmatterError> {
    if !path.exists() {
        return Err(FrontmatterError::NotFound(path.to_path_buf()));
    }

    let io_err = |action: &'static str, source: std::io::Error| FrontmatterError::Io {
        action,
        path: path.to_path_buf(),
        source,
    };

    let content = fs::read_to_string(path).map_err(|e| io_err("read", e))?;
    tracing::info!(path = %path.display(), chars = content.chars().count(), "read file");

    if has_frontmatter(&content) {
        tracing::info!(path = %path.display(), "frontmatter already present, leaving file unchanged");
        return Ok(PatchOutcome::AlreadyPresent);
    }

    let patched = format!("{header}{content}");
    fs::write(path, &patched).map_err(|e| io_err("write", e))?;
    tracing::info!(path = %path.display(), chars = patched.chars().count(), "wrote file");

    let written = fs::read_to_string(path).map_err(|e| io_err("re-read", e))?;
    if !written.starts_with(DELIMITER) {
        return Err(FrontmatterError::Verification {
            path: path.to_path_buf(),
            head: written.chars().take(50).collect(),
        });
    }

    Ok(PatchOutcome::Added {
        bytes_before: content.len(),
        bytes_after: written.len(),
    })
}
