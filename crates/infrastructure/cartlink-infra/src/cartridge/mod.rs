use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::debug;

use cartlink_app_core::CartridgeFile;

#[derive(Debug, Error)]
pub enum CartridgeOpenError {
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
    #[error("{0} has no file name")]
    NoFileName(Utf8PathBuf),
}

/// A cartridge picked from the local filesystem.
///
/// Nothing is read until [`CartridgeFile::read_all`] is called, so a file
/// that disappears after selection surfaces as a read error.
#[derive(Debug, Clone)]
pub struct FsCartridgeFile {
    path: Utf8PathBuf,
    name: String,
}

impl FsCartridgeFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, CartridgeOpenError> {
        let path = path.into();
        let name = path
            .file_name()
            .ok_or_else(|| CartridgeOpenError::NoFileName(path.clone()))?
            .to_string();
        if !cartlink_config::has_cartridge_extension(&name) {
            debug!("{name} does not carry the .{} extension", cartlink_config::CARTRIDGE_EXTENSION);
        }
        Ok(Self { path, name })
    }

    pub fn from_std_path(path: &std::path::Path) -> Result<Self, CartridgeOpenError> {
        let path = Utf8Path::from_path(path)
            .ok_or_else(|| CartridgeOpenError::NonUtf8Path(path.display().to_string()))?;
        Self::new(path)
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl CartridgeFile for FsCartridgeFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!("read {} bytes from {}", bytes.len(), self.path);
        Ok(bytes)
    }
}
