use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        UnexpectedEof => "File appears truncated or corrupted.",
        WriteZero => "Disk may be full. Free up space and try again.",
        Other if err.raw_os_error() == Some(28) => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

/// Simple CLI error from string.
pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Invalid file extension error.
pub fn extension_error(path: &Path) -> CliError {
    CliError {
        msg: format!(
            "Invalid file extension for '{}'. Expected .csv. Export the sheet as CSV first.",
            path.display()
        ),
        source: None,
    }
}

/// Reject paths that do not carry a `.csv` extension.
pub fn require_csv(path: &Path) -> Result<(), CliError> {
    let is_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(extension_error(path))
    }
}

/// Insert `_<suffix>` parts before the extension: `out.txt` with
/// `["Czech", "Polish"]` becomes `out_Czech_Polish.txt`.
pub fn expand_path(path: &Path, suffixes: &[&str]) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = stem;
    for suffix in suffixes {
        name.push('_');
        name.push_str(suffix);
    }
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Convert a library error into a CLI error with a hint.
pub fn spt_cli_error(context: &str, err: crate::SptError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for an error variant.
pub fn cli_hint(err: &crate::SptError) -> String {
    use crate::SptError::*;
    match err {
        Table { row, column, message } => {
            format!("row {row}, column {column}: {message}. Fix the cell and retry.")
        }
        Malformed(msg) => format!("{msg}. Check the table layout."),
        LengthMismatch { left, right } => format!(
            "wordlists have {left} and {right} entries. Both lists must cover the same slots."
        ),
        Trial(msg) => format!("{msg}. This is a bug."),
        Calibration(msg) => format!("{msg}. Check the reference sample."),
        Config(msg) => format!("{msg}. Invalid configuration."),
        Csv(e) => format!("{e}. The file is not valid CSV."),
        Io(io) => format!("{io}"),
    }
}
