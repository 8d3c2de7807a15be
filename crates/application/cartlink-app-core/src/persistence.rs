use crate::domain::Settings;
use crate::ports::SettingsRepo;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "com";
const ORG: &str = "cartlink";
const APP: &str = "cartlink";

/// Settings stored as JSON, by default in the platform config directory.
pub struct FilePersistence {
    override_path: Option<PathBuf>,
}

impl Default for FilePersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePersistence {
    pub fn new() -> Self {
        Self {
            override_path: None,
        }
    }

    /// Read and write `path` instead of the platform location.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            override_path: Some(path.into()),
        }
    }

    fn config_dir(&self) -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(QUALIFIER, ORG, APP)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        Ok(config_dir.to_path_buf())
    }

    pub fn settings_path(&self) -> Result<PathBuf> {
        match &self.override_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.config_dir()?.join("settings.json")),
        }
    }

    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path()?;
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        settings
            .key_table()
            .with_context(|| format!("Invalid key bindings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let path = self.settings_path()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        atomic_write(&path, json.as_bytes()).context("Failed to write settings")?;
        Ok(())
    }
}

impl SettingsRepo for FilePersistence {
    fn load(&self) -> Result<Settings> {
        self.load_settings()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.save_settings(settings)
    }
}

fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    };

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {}", tmp_path.display()))?;

    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {}", tmp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {}", tmp_path.display()))?;
    drop(file);

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            fs::rename(&tmp_path, path).with_context(|| {
                format!("Failed to replace destination file {}", path.display())
            })?;
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "Failed to rename temp file {} to {}",
                    tmp_path.display(),
                    path.display()
                )
            });
        }
    }

    Ok(())
}
