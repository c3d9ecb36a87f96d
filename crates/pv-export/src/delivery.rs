//! Client-local delivery of exported bytes

use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::ExportError;

/// Hands a finished export to the user under a filename.
///
/// Assumed synchronous-enough not to need cancellation; implementations
/// decide what "save" means (a downloads directory here, a browser download
/// or share sheet elsewhere).
pub trait Delivery: Send + Sync {
    fn deliver(&self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Delivery into a local directory.
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), mime, size = bytes.len(), "export written");
        Ok(())
    }
}
