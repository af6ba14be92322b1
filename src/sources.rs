// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: sources  —  source-file enumeration
// ─────────────────────────────────────────────────────────────────────────────

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collect every `*.{extension}` file under each of `dirs`
/// (resolved against `root`).
///
/// Results are sorted within each directory and the directory list keeps
/// its given order, so the returned set is stable across runs. Missing
/// directories contribute nothing.
pub fn glob_sources<P: AsRef<Path>>(root: &Path, dirs: &[P], extension: &str) -> Vec<PathBuf> {
    let mut sources = Vec::new();

    for dir in dirs {
        let base = root.join(dir.as_ref());

        let mut found: Vec<PathBuf> = WalkDir::new(&base)
            .into_iter()
            .flatten()
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path().extension().and_then(|x| x.to_str()) == Some(extension)
            })
            .map(|e| e.path().to_owned())
            .collect();

        found.sort();
        sources.extend(found);
    }

    sources
}

/// Drop every file whose path contains one of the given substrings.
/// Mirrors the old exclude-list behavior of the per-project scripts.
pub fn remove_matching(files: &mut Vec<PathBuf>, patterns: &[String]) {
    if patterns.is_empty() {
        return;
    }
    files.retain(|f| {
        let path = f.to_string_lossy();
        !patterns.iter().any(|p| path.contains(p.as_str()))
    });
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn globs_recursively_and_sorts_within_each_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        touch(&root.join("video/codec.cpp"));
        touch(&root.join("video/scale/yuv.cpp"));
        touch(&root.join("video/notes.txt"));
        touch(&root.join("audio/mixer.cpp"));

        let found = glob_sources(root, &["video", "audio"], "cpp");
        assert_eq!(
            found,
            vec![
                root.join("video/codec.cpp"),
                root.join("video/scale/yuv.cpp"),
                root.join("audio/mixer.cpp"),
            ]
        );
    }

    #[test]
    fn glob_is_stable_across_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for name in ["b.cpp", "a.cpp", "sub/c.cpp"] {
            touch(&root.join("src").join(name));
        }

        let first  = glob_sources(root, &["src"], "cpp");
        let second = glob_sources(root, &["src"], "cpp");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_dirs_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let found = glob_sources(tmp.path(), &["does-not-exist"], "cpp");
        assert!(found.is_empty());
    }

    #[test]
    fn remove_matching_filters_by_substring() {
        let mut files = vec![
            PathBuf::from("src/core.cpp"),
            PathBuf::from("src/legacy/old.cpp"),
            PathBuf::from("src/test_main.cpp"),
        ];
        remove_matching(&mut files, &["legacy".to_owned(), "test_".to_owned()]);
        assert_eq!(files, vec![PathBuf::from("src/core.cpp")]);
    }
}
