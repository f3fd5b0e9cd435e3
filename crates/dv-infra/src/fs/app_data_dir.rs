use std::path::{Path, PathBuf};

use anyhow::Result;

/// Root directory for Devora data.
///
/// A non-empty `configured` path wins; otherwise `~/.devora`.
/// Does not create the directory.
pub fn app_data_dir(configured: &Path) -> Result<PathBuf> {
    if !configured.as_os_str().is_empty() {
        return Ok(configured.to_path_buf());
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to get home directory"))?;
    Ok(home.join(".devora"))
}

/// Per-project card files.
pub fn cards_dir(root: &Path) -> PathBuf {
    root.join("cards")
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let dir = app_data_dir(Path::new("/srv/devora")).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/devora"));
        assert_eq!(cards_dir(&dir), PathBuf::from("/srv/devora/cards"));
    }

    #[test]
    fn empty_falls_back_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(app_data_dir(Path::new("")).unwrap(), home.join(".devora"));
        }
    }
}
