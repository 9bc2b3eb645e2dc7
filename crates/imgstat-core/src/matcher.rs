//! Path matching: expands directories and an extension filter into files.

use futures_util::future::try_join_all;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::RunConfig;
use crate::error::MatchError;

/// Matches files beneath directories against a `**/*.{ext,...}` pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    matcher: GlobMatcher,
}

impl PathMatcher {
    /// Compile the matcher for the config's extension filter.
    pub fn new(config: &RunConfig) -> Result<Self, MatchError> {
        Self::from_pattern(&config.glob_pattern())
    }

    /// Compile a matcher from a raw glob pattern relative to each directory.
    pub fn from_pattern(pattern: &str) -> Result<Self, MatchError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| MatchError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// The pattern applied beneath each directory.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Find all matching regular files beneath one directory.
    ///
    /// Hidden entries are skipped, except the directory itself. Results are
    /// sorted by path.
    pub fn match_directory(&self, directory: &Path) -> Result<Vec<PathBuf>, MatchError> {
        if !directory.exists() {
            return Err(MatchError::DirectoryNotFound(directory.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(directory)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| MatchError::Unreadable {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| directory.to_path_buf()),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(directory).unwrap_or(entry.path());
            if self.matcher.is_match(relative) {
                files.push(clean_path(entry.path()));
            }
        }

        files.sort();
        tracing::debug!(
            "Matched {} file(s) in {:?} with {}",
            files.len(),
            directory,
            self.pattern
        );
        Ok(files)
    }

    /// Match every directory concurrently and merge the results.
    ///
    /// Lists are concatenated in directory order and de-duplicated keeping
    /// the first appearance. The first directory to fail fails the whole
    /// match.
    pub async fn match_all(&self, directories: &[PathBuf]) -> Result<Vec<PathBuf>, MatchError> {
        let tasks = directories.iter().cloned().map(|directory| {
            let matcher = self.clone();
            async move {
                let dir = directory.clone();
                tokio::task::spawn_blocking(move || matcher.match_directory(&dir))
                    .await
                    .map_err(|e| MatchError::Task {
                        directory,
                        message: e.to_string(),
                    })?
            }
        });

        let lists = try_join_all(tasks).await?;
        Ok(dedupe(lists.into_iter().flatten()))
    }
}

/// Remove duplicate paths, keeping the first occurrence of each.
pub fn dedupe(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Drop `.` components so `./a.png` and `a.png` compare equal.
pub fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_match_directory_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("nested/deep/c.jpg"));
        touch(&dir.path().join("nested/d.gif"));

        let matcher = PathMatcher::new(&RunConfig::new(["unused"], "png jpg")).unwrap();
        let files = matcher.match_directory(dir.path()).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.png", "nested/deep/c.jpg"]);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("upper.PNG"));
        touch(&dir.path().join("lower.png"));

        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let files = matcher.match_directory(dir.path()).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["lower.png"]);
    }

    #[test]
    fn test_match_skips_hidden_entries_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".hidden.png"));
        touch(&dir.path().join(".cache/inside.png"));
        fs::create_dir_all(dir.path().join("folder.png")).unwrap();
        touch(&dir.path().join("visible.png"));

        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let files = matcher.match_directory(dir.path()).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["visible.png"]);
    }

    #[test]
    fn test_hidden_root_directory_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".assets");
        touch(&root.join("a.png"));
        touch(&root.join("icons/b.png"));
        touch(&root.join(".cache/c.png"));

        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let files = matcher.match_directory(&root).unwrap();

        assert_eq!(names(&files, &root), vec!["a.png", "icons/b.png"]);
    }

    #[test]
    fn test_wildcard_matches_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("sub/c.webp"));
        touch(&dir.path().join("README"));
        touch(&dir.path().join("LICENSE"));

        for filter in ["*", ""] {
            let matcher = PathMatcher::new(&RunConfig::new(["unused"], filter)).unwrap();
            let files = matcher.match_directory(dir.path()).unwrap();

            assert_eq!(
                names(&files, dir.path()),
                vec!["a.png", "b.txt", "sub/c.webp"],
                "filter {filter:?} should skip extensionless files"
            );
        }
    }

    #[test]
    fn test_missing_directory_fails() {
        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let err = matcher
            .match_directory(Path::new("/nonexistent/imgstat/dir"))
            .unwrap_err();
        assert!(matches!(err, MatchError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let err = PathMatcher::from_pattern("**/*.{png").unwrap_err();
        assert!(matches!(err, MatchError::InvalidPattern { .. }));
    }

    #[test]
    fn test_dedupe_preserves_first_appearance() {
        let paths = vec![
            PathBuf::from("b.png"),
            PathBuf::from("a.png"),
            PathBuf::from("b.png"),
            PathBuf::from("c.png"),
            PathBuf::from("a.png"),
        ];
        assert_eq!(
            dedupe(paths),
            vec![
                PathBuf::from("b.png"),
                PathBuf::from("a.png"),
                PathBuf::from("c.png")
            ]
        );
    }

    #[test]
    fn test_clean_path_drops_current_dir() {
        assert_eq!(clean_path(Path::new("./imgs/./a.png")), PathBuf::from("imgs/a.png"));
    }

    #[tokio::test]
    async fn test_match_all_merges_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("one/a.png"));
        touch(&dir.path().join("two/b.png"));

        let one = dir.path().join("one");
        let two = dir.path().join("two");
        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();

        let files = matcher
            .match_all(&[two.clone(), one.clone(), two.clone()])
            .await
            .unwrap();

        assert_eq!(files, vec![two.join("b.png"), one.join("a.png")]);
    }

    #[tokio::test]
    async fn test_match_all_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.png"));

        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let result = matcher
            .match_all(&[dir.path().to_path_buf(), dir.path().join("missing")])
            .await;

        assert!(matches!(result, Err(MatchError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_match_all_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = PathMatcher::from_pattern("**/*.png").unwrap();
        let files = matcher.match_all(&[dir.path().to_path_buf()]).await.unwrap();
        assert!(files.is_empty());
    }
}
