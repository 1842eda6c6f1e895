//! Archive and directory ingestion with ignore rules and size limits.

use std::collections::BTreeSet;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::errors::Result;
use crate::lang::{classify, is_probably_binary};
use crate::types::FileRecord;

/// Entries larger than this are skipped outright.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_500_000;

const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    "venv",
    ".venv",
    "dist",
    "build",
];

/// Walks archives and directory trees into normalized [`FileRecord`] lists.
///
/// Filtering is identical for both sources: ignored directory segments,
/// oversized entries, binary content, and unsupported languages are dropped.
/// Output order is discovery order; callers sort or prioritize explicitly
/// when order matters.
#[derive(Debug, Clone)]
pub struct SourceIngestor {
    ignore_dirs: BTreeSet<String>,
    max_file_bytes: u64,
}

impl Default for SourceIngestor {
    fn default() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl SourceIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory name to the ignore set.
    pub fn ignore_dir(mut self, name: impl Into<String>) -> Self {
        self.ignore_dirs.insert(name.into());
        self
    }

    /// Overrides the per-entry size limit.
    pub fn max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = limit;
        self
    }

    /// Extracts supported files from an in-memory zip archive.
    ///
    /// Corrupt or unreadable individual entries are skipped with a warning.
    ///
    /// # Errors
    /// Fails only if the archive itself cannot be opened.
    pub fn ingest_archive(&self, bytes: &[u8]) -> Result<Vec<FileRecord>> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut out = Vec::new();

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(e) => e,
                Err(err) => {
                    warn!(%err, index, "skipping unreadable archive entry");
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            let path = entry.name().to_string();
            if self.is_ignored(&path) {
                continue;
            }
            if entry.size() > self.max_file_bytes {
                debug!(%path, size = entry.size(), "skipping oversized entry");
                continue;
            }
            let Some(language) = classify(&path) else {
                continue;
            };

            let mut raw = Vec::with_capacity(entry.size() as usize);
            if let Err(err) = entry.read_to_end(&mut raw) {
                warn!(%err, %path, "skipping corrupt archive entry");
                continue;
            }
            if is_probably_binary(&raw) {
                continue;
            }

            out.push(FileRecord {
                name: basename(&path).to_string(),
                content: String::from_utf8_lossy(&raw).into_owned(),
                language,
                size: raw.len() as u64,
                path,
            });
        }

        debug!(files = out.len(), "archive ingestion finished");
        Ok(out)
    }

    /// Walks a local directory tree and extracts supported files.
    ///
    /// Paths are recorded relative to `root`, `/`-separated. A missing or
    /// non-directory root yields an empty list rather than an error.
    pub fn ingest_directory(&self, root: &Path) -> Vec<FileRecord> {
        if !root.is_dir() {
            warn!(root = %root.display(), "ingestion root is not a directory");
            return Vec::new();
        }

        let mut out = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
            // Prune ignored directories instead of filtering their contents
            // one file at a time.
            !(e.file_type().is_dir()
                && e.depth() > 0
                && self
                    .ignore_dirs
                    .contains(e.file_name().to_string_lossy().as_ref()))
        });

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let rel_path = rel.to_string_lossy().replace('\\', "/");
            if self.is_ignored(&rel_path) {
                continue;
            }
            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(err) => {
                    warn!(%err, path = %rel_path, "skipping unreadable file");
                    continue;
                }
            };
            if size > self.max_file_bytes {
                debug!(path = %rel_path, size, "skipping oversized file");
                continue;
            }
            let Some(language) = classify(&rel_path) else {
                continue;
            };
            let raw = match std::fs::read(entry.path()) {
                Ok(r) => r,
                Err(err) => {
                    warn!(%err, path = %rel_path, "skipping unreadable file");
                    continue;
                }
            };
            if is_probably_binary(&raw) {
                continue;
            }

            out.push(FileRecord {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: rel_path,
                content: String::from_utf8_lossy(&raw).into_owned(),
                language,
                size,
            });
        }

        debug!(files = out.len(), root = %root.display(), "directory ingestion finished");
        out
    }

    fn is_ignored(&self, path: &str) -> bool {
        path.split(['/', '\\'])
            .any(|segment| self.ignore_dirs.contains(segment))
    }
}

/// Guesses the project flavor from well-known marker files.
pub fn detect_project_type(files: &[FileRecord]) -> &'static str {
    let has = |marker: &str| files.iter().any(|f| f.path.to_lowercase().contains(marker));
    if has("package.json") {
        "nodejs"
    } else if has("requirements.txt") || has("pyproject.toml") {
        "python"
    } else if has("pom.xml") || has("build.gradle") {
        "java"
    } else if has("go.mod") {
        "go"
    } else {
        "unknown"
    }
}

/// Sorted newline-joined path listing, used as the project structure summary.
pub fn file_tree(files: &[FileRecord]) -> String {
    let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    paths.sort_unstable();
    paths.join("\n")
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn archive_filters_ignored_binary_and_unsupported() {
        let bytes = zip_bytes(&[
            ("node_modules/lib.js", b"module.exports = 1;\n"),
            ("src/app.py", b"print('hello')\n"),
            ("image.png", b"\x89PNG\x00\x00\x1a\n"),
            ("README", b"plain text, unsupported\n"),
        ]);

        let files = SourceIngestor::default().ingest_archive(&bytes).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/app.py");
        assert_eq!(files[0].name, "app.py");
        assert_eq!(files[0].language, "python");
        assert_eq!(files[0].size, 15);
    }

    #[test]
    fn archive_respects_size_limit() {
        let big = vec![b'a'; 64];
        let bytes = zip_bytes(&[("big.py", big.as_slice()), ("small.py", b"x = 1\n")]);

        let files = SourceIngestor::default()
            .max_file_bytes(32)
            .ingest_archive(&bytes)
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "small.py");
    }

    #[test]
    fn directory_walk_applies_same_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("node_modules")).unwrap();
        std::fs::write(root.join("src/main.go"), "package main\n").unwrap();
        std::fs::write(root.join("node_modules/x.js"), "ignored\n").unwrap();
        std::fs::write(root.join("blob.py"), b"\x00\x01\x02binary".as_slice()).unwrap();
        std::fs::write(root.join("notes.txt"), "unsupported\n").unwrap();

        let files = SourceIngestor::default().ingest_directory(root);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/main.go");
        assert_eq!(files[0].language, "go");
    }

    #[test]
    fn missing_root_is_empty_not_fatal() {
        let files =
            SourceIngestor::default().ingest_directory(Path::new("/definitely/not/here"));
        assert!(files.is_empty());
    }

    #[test]
    fn project_type_and_tree() {
        let mk = |path: &str| FileRecord {
            name: basename(path).to_string(),
            path: path.to_string(),
            content: String::new(),
            language: "json",
            size: 0,
        };
        let files = vec![mk("b/package.json"), mk("a/index.js")];
        assert_eq!(detect_project_type(&files), "nodejs");
        assert_eq!(file_tree(&files), "a/index.js\nb/package.json");
    }
}
