//! Path checks shared by the subcommands.

use camino::{Utf8Path, Utf8PathBuf};

use crate::CliError;

/// Require `path` to name an existing regular file.
pub(crate) fn require_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match mqlib_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(inspect_error(path, field, source)),
    }
}

/// Require `path` to name an existing directory.
pub(crate) fn require_directory(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match mqlib_fs::dir_is_dir(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotDirectory {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(inspect_error(path, field, source)),
    }
}

/// Anchor `path` at the current directory.
pub(crate) fn absolute(path: &Utf8Path, field: &'static str) -> Result<Utf8PathBuf, CliError> {
    mqlib_fs::absolute_utf8(path).map_err(|source| CliError::InspectSourcePath {
        field,
        path: path.to_path_buf(),
        source,
    })
}

fn inspect_error(path: &Utf8Path, field: &'static str, source: std::io::Error) -> CliError {
    if source.kind() == std::io::ErrorKind::NotFound {
        CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }
    } else {
        CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }
    }
}
