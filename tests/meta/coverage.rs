//! Checks that the unit test tree mirrors the source tree

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Files that only declare modules or start a binary
    fn is_structural(relative: &str) -> bool {
        relative == "lib.rs" || relative.ends_with("main.rs") || relative.ends_with("mod.rs")
    }

    /// Relative paths of every directory and `.rs` file below `dir`
    fn collect(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(io::Error::other)?
                .to_string_lossy()
                .to_string();
            if path.is_dir() {
                paths.insert(relative);
                collect(&path, base, paths)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    fn tree(root: &str) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        let base = Path::new(root);
        if let Err(error) = collect(base, base, &mut paths) {
            panic!("failed to scan {root}: {error}");
        }
        paths
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let tests = tree("tests/unit");
        let missing: Vec<String> = tree("src")
            .into_iter()
            .filter(|path| !is_structural(path) && !tests.contains(path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();
        assert!(
            missing.is_empty(),
            "Source files without a unit test counterpart:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let sources = tree("src");
        let orphaned: Vec<String> = tree("tests/unit")
            .into_iter()
            .filter(|path| !is_structural(path) && !sources.contains(path))
            .map(|path| format!("  - tests/unit/{path} (no src/{path})"))
            .collect();
        assert!(
            orphaned.is_empty(),
            "Unit test files without a source counterpart:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let mut empty = Vec::new();
        for relative in tree("tests") {
            let path = Path::new("tests").join(&relative);
            if path.is_dir() || is_structural(&relative) {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) if content.contains("#[test]") => {}
                Ok(_) => empty.push(format!("  - {}", path.display())),
                Err(error) => panic!("failed to read {}: {error}", path.display()),
            }
        }
        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
