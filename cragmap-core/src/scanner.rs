use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SourceConfig;
use crate::node::{SourceCategory, SourceFile};

#[derive(Debug)]
pub enum ScanError {
    IoError(std::io::Error),
    Walk(walkdir::Error),
    InvalidPath(PathBuf),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::IoError(err)
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        ScanError::Walk(err)
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::IoError(e) => write!(f, "IO error: {}", e),
            ScanError::Walk(e) => write!(f, "Walk error: {}", e),
            ScanError::InvalidPath(p) => write!(f, "Invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for ScanError {}

/// Walks the configured source directories and reads every file in them.
pub struct SiteScanner {
    content_root: PathBuf,
    sources: Vec<SourceConfig>,
}

impl SiteScanner {
    pub fn new<P: AsRef<Path>>(content_root: P, sources: Vec<SourceConfig>) -> Self {
        Self {
            content_root: content_root.as_ref().to_path_buf(),
            sources,
        }
    }

    pub fn scan(&self) -> Result<Vec<SourceFile>, ScanError> {
        info!("Scanning: {}", self.content_root.display());

        let mut files = Vec::new();
        for source in &self.sources {
            if source.category == SourceCategory::Ignored {
                continue;
            }
            let root = self.content_root.join(&source.path);
            if !root.is_dir() {
                warn!("source {} not found at {}, skipping", source.name, root.display());
                continue;
            }
            let found = scan_source(&root, source.category)?;
            debug!("source {}: {} files", source.name, found.len());
            files.extend(found);
        }

        Ok(files)
    }
}

/// Read every file below `root`, skipping hidden entries.
pub fn scan_source(root: &Path, category: SourceCategory) -> Result<Vec<SourceFile>, ScanError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        files.push(read_source_file(root, entry.path(), category)?);
    }

    Ok(files)
}

pub fn read_source_file(
    root: &Path,
    path: &Path,
    category: SourceCategory,
) -> Result<SourceFile, ScanError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ScanError::InvalidPath(path.to_path_buf()))?;
    let base = relative
        .file_name()
        .ok_or_else(|| ScanError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy()
        .to_string();
    let relative_directory = relative
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(SourceFile {
        absolute_path: path.to_path_buf(),
        relative_directory,
        name: get_stem(path),
        extension: get_extension(path),
        base,
        category,
        content: std::fs::read(path)?,
    })
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn get_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn get_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => ext.to_string_lossy().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_source() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "USA/index.md", "---\narea_name: USA\n---\n");
        write(dir.path(), "USA/Oregon/giants-staircase.md", "x");
        write(dir.path(), "USA/.git/HEAD", "ref");
        write(dir.path(), ".DS_Store", "");

        let files = scan_source(dir.path(), SourceCategory::Areas).unwrap();
        let found: Vec<(&str, &str, &str, &str)> = files
            .iter()
            .map(|f| {
                (
                    f.relative_directory.as_str(),
                    f.base.as_str(),
                    f.name.as_str(),
                    f.extension.as_str(),
                )
            })
            .collect();

        // Byte order: "Oregon" sorts before "index.md".
        assert_eq!(
            found,
            vec![
                ("USA/Oregon", "giants-staircase.md", "giants-staircase", "md"),
                ("USA", "index.md", "index", "md"),
            ]
        );
        assert_eq!(files[0].content, b"x");
    }

    #[test]
    fn test_scanner_skips_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pages/about.md", "# About");

        let scanner = SiteScanner::new(
            dir.path(),
            vec![
                SourceConfig {
                    name: "areas-routes".into(),
                    path: "areas".into(),
                    category: SourceCategory::Areas,
                },
                SourceConfig {
                    name: "regular-md".into(),
                    path: "pages".into(),
                    category: SourceCategory::Pages,
                },
            ],
        );
        let files = scanner.scan().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].category, SourceCategory::Pages);
        assert_eq!(files[0].relative_directory, "");
    }
}
