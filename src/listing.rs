use crate::error::ExtractionError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List the source files under `path`, sorted by file name within each directory.
///
/// A path to a single file is accepted when its extension is one of `extensions`.
pub fn get_source_file_paths(
    path: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, ExtractionError> {
    if path.is_file() {
        return if has_extension(path, extensions) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err(ExtractionError::InvalidPath(format!(
                "{} is not a source file",
                path.display()
            )))
        };
    }
    if !path.is_dir() {
        return Err(ExtractionError::InvalidPath(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let paths: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.into_path())
        .collect();

    debug!(path = %path.display(), files = paths.len(), "Listed source files");
    Ok(paths)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}
