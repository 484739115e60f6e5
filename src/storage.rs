use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Abstract token persistence interface
pub trait TokenStorage {
    /// Return the stored token. If none is stored, returns Ok(None)
    fn load(&self) -> Result<Option<String>>;
    /// Persist the token
    fn save(&self, token: &str) -> Result<()>;
    /// Delete the token
    fn delete(&self) -> Result<()>;
}

/// File-based token persistence implementation
pub struct FileTokenStorage {
    path: PathBuf,
}

/// `<home>/.til/token`; fails when there is no home directory.
pub fn token_path_in(home: Option<&Path>) -> Result<PathBuf> {
    let home = home.context("HOME environment variable not set")?;
    Ok(home.join(".til").join("token"))
}

impl FileTokenStorage {
    pub fn with_path(path: PathBuf) -> Self {
        FileTokenStorage { path }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).context("Failed to read token file")?;
        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let mut file = File::create(&self.path).context("Failed to open token file for writing")?;
        file.write_all(token.trim().as_bytes())
            .context("Failed to write token to file")?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to delete token file")?;
        }
        Ok(())
    }
}

/// Picks the token for API requests: `env_token` (from `GITHUB_TOKEN`) first,
/// then whatever `storage` holds. Without storage the request is anonymous.
pub fn resolve_token(
    env_token: Option<String>,
    storage: Option<&dyn TokenStorage>,
) -> Result<Option<String>> {
    match (env_token.filter(|t| !t.trim().is_empty()), storage) {
        (Some(token), _) => Ok(Some(token.trim().to_string())),
        (None, Some(storage)) => storage.load(),
        (None, None) => Ok(None),
    }
}
