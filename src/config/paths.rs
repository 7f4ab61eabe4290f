use std::fs;
use std::path::PathBuf;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::Result;

/// Manages paths for rateport configuration and data
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root configuration directory (~/.rateport)
    pub root: PathBuf,
    /// Configuration file path (~/.rateport/config.toml)
    pub config_file: PathBuf,
    /// Local store directory (~/.rateport/data)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance using the user's home directory
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME")?;
        Ok(Self::under(PathBuf::from(home).join(".rateport")))
    }

    /// Lay out all paths below an explicit root directory
    pub fn under(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.toml"),
            data_dir: root.join("data"),
            root,
        }
    }

    /// Ensure the configuration directory exists with proper permissions
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        // 700 = owner only
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.root, perms)?;
        }

        Ok(())
    }

    /// Check if the config file exists
    pub fn config_exists(&self) -> bool {
        self.config_file.exists()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::under(PathBuf::from(".rateport")))
    }
}
