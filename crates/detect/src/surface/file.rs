use {
    crate::{DetectError, LoadedResult, Surface},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// Keeps the latest result in a file on disk.
///
/// Each result is written to a sibling temp file and renamed over the
/// target, so readers never see a half-written image.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".part");
        self.path.with_file_name(name)
    }
}

impl Surface for FileSurface {
    fn show(&self, result: &LoadedResult) -> Result<(), DetectError> {
        let temp = self.temp_path();
        fs::write(&temp, &result.payload)?;
        fs::rename(&temp, &self.path)?;
        log::debug!(
            "result #{} ({}) written to {}",
            result.id,
            result.image.size,
            self.path.display()
        );
        Ok(())
    }
}
