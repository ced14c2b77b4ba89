use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scanner for finding bundled clips in a directory tree
pub struct ClipScanner;

impl ClipScanner {
    /// Scan a directory recursively and return all files whose extension
    /// is in `extensions` (case-insensitive). Order follows the walk, sorted
    /// by file name for determinism.
    pub fn scan<P: AsRef<Path>>(directory: P, extensions: &[String]) -> Vec<PathBuf> {
        let mut clips = Vec::new();

        for entry in WalkDir::new(directory)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Skip directories
            if !path.is_file() {
                continue;
            }

            if let Some(extension) = path.extension() {
                let ext_str = extension.to_string_lossy().to_lowercase();
                if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext_str)) {
                    clips.push(path.to_path_buf());
                }
            }
        }

        clips
    }
}
