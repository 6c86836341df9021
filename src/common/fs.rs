use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Make sure the directory that will hold `file` exists.
pub(crate) fn ensure_parent_dir(file: &Path) -> Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out/nested/plan.csv");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().join("out/nested").is_dir());
    }

    #[test]
    fn bare_file_name_needs_no_parent() {
        assert!(ensure_parent_dir(Path::new("plan.csv")).is_ok());
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "x").unwrap();
        assert!(ensure_parent_dir(&blocker.join("plan.csv")).is_err());
    }
}
