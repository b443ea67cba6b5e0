//! Path and filter utilities

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// OS clutter files that never carry photo metadata.
pub fn is_os_hidden_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    matches!(
        name,
        // macOS
        ".DS_Store" | ".AppleDouble" | ".LSOverride"
        // Windows
        | "Thumbs.db" | "ehthumbs.db" | "Desktop.ini"
        // Linux
        | ".directory"
    ) || name.starts_with("._") // macOS resource forks
}

/// Returns true if the file should become an extraction task.
/// Exclude patterns are matched against every component below `root` and against the full path.
pub fn should_include_in_walk(path: &Path, root: &Path, exclude_patterns: &[String]) -> bool {
    if path == root || is_os_hidden_file(path) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let rel = path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf());
    let path_str = path.to_string_lossy();
    !exclude_patterns.iter().any(|pattern| {
        glob_match(pattern, &path_str)
            || rel
                .components()
                .any(|c| glob_match(pattern, &c.as_os_str().to_string_lossy()))
    })
}

/// Simple glob matching: `*` matches any run of characters, `?` exactly one.
/// A leading `!` is ignored (negation handled by caller).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_chars(&p, &t)
}

fn glob_match_chars(p: &[char], t: &[char]) -> bool {
    match p.split_first() {
        None => t.is_empty(),
        Some(('*', rest)) => (0..=t.len()).any(|skip| glob_match_chars(rest, &t[skip..])),
        Some(('?', rest)) => !t.is_empty() && glob_match_chars(rest, &t[1..]),
        Some((c, rest)) => t.first() == Some(c) && glob_match_chars(rest, &t[1..]),
    }
}

/// Canonicalize the scan root and require it to be a directory.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf> {
    let canonical = root
        .canonicalize()
        .with_context(|| format!("canonicalize root {}", root.display()))?;
    if !canonical.is_dir() {
        bail!("not a directory: {}", canonical.display());
    }
    Ok(canonical)
}
