//! Lint: non-test engine code must not panic on bad input.
//!
//! Gameplay rejections return `false` and fallible boundaries return
//! `Result`, so `.unwrap()`, `.expect(` and `panic!` only belong in tests.
//!
//! This test scans every `.rs` file under `src/` and flags those calls
//! before the file's inline `#[cfg(test)] mod ... {` block.

use std::fs;
use std::path::Path;

const FORBIDDEN: &[&str] = &[".unwrap()", ".expect(", "panic!(", "unreachable!("];

/// Scan source for panicking calls outside the trailing test module.
fn find_panics(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        // Test code starts at `#[cfg(test)]` followed by an inline module.
        if trimmed == "#[cfg(test)]" {
            let next = lines[idx + 1..].iter().map(|l| l.trim()).find(|l| !l.is_empty());
            if next.is_some_and(|l| l.starts_with("mod ") && l.ends_with('{')) {
                break;
            }
        }

        if trimmed.starts_with("//") {
            continue;
        }

        if FORBIDDEN.iter().any(|pat| line.contains(pat)) {
            violations.push((idx + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn no_panicking_calls_outside_tests() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut all_violations = Vec::new();

    visit_source_files(&src_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found panicking calls in non-test code.\n\
             Return false for rejected commands or propagate a Result instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            let display_path = path.display().to_string();
            for (line_num, line) in find_panics(&source) {
                violations.push((display_path.clone(), line_num, line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap_in_library_code() {
        let source = "fn f() {\n    let x = parse().unwrap();\n}\n";
        assert_eq!(find_panics(source).len(), 1);
    }

    #[test]
    fn allows_unwrap_or_variants() {
        let source = "let x = a.unwrap_or(0);\nlet y = b.unwrap_or_default();\n";
        assert!(find_panics(source).is_empty());
    }

    #[test]
    fn ignores_trailing_test_module() {
        let source = "fn f() {}\n\n#[cfg(test)]\nmod tests {\n    fn g() { h().unwrap(); }\n}\n";
        assert!(find_panics(source).is_empty());
    }

    #[test]
    fn cfg_test_module_declaration_does_not_end_scan() {
        let source = "#[cfg(test)]\nmod helpers;\n\nfn f() { g().expect(\"x\"); }\n";
        assert_eq!(find_panics(source).len(), 1);
    }

    #[test]
    fn ignores_comments() {
        let source = "// calling .unwrap() here would be wrong\n";
        assert!(find_panics(source).is_empty());
    }
}
