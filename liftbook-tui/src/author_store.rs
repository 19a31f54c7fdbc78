use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::config_dir;

pub fn author_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("author"))
}

pub fn load_author() -> Result<Option<String>> {
    read_author(&author_path()?)
}

pub fn save_author(author: &str) -> Result<()> {
    write_author(&author_path()?, author)
}

fn read_author(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let author = std::fs::read_to_string(path).context("Failed to read author file")?;
    let author = author.trim().to_lowercase();
    if author.is_empty() {
        return Ok(None);
    }
    Ok(Some(author))
}

fn write_author(path: &Path, author: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, author.trim().to_lowercase())
        .with_context(|| format!("Failed to write author to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("liftbook-author-{}-{}", std::process::id(), name))
            .join("author")
    }

    #[test]
    fn missing_file_means_no_author() {
        let path = scratch_path("missing");
        assert_eq!(read_author(&path).unwrap(), None);
    }

    #[test]
    fn author_is_stored_lowercased() {
        let path = scratch_path("roundtrip");
        write_author(&path, " JDoe\n").unwrap();

        assert_eq!(read_author(&path).unwrap(), Some("jdoe".to_string()));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
