//! Where image files come from.
//!
//! The session only ever sees `(name, bytes)` pairs. A browser host builds them
//! from a folder picker; the native binary reads them from disk with
//! [`FolderProvider`].

use crate::model::SourceFile;
use crate::state::LoadError;

/// Delivers the files of a user-selected folder.
pub trait FileProvider {
    fn files(&self) -> Result<Vec<SourceFile>, LoadError>;
}

/// Files already in memory, e.g. handed over by a web host.
impl FileProvider for Vec<SourceFile> {
    fn files(&self) -> Result<Vec<SourceFile>, LoadError> {
        Ok(self.clone())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FolderProvider;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use super::FileProvider;
    use crate::model::{SourceFile, is_image_filename};
    use crate::state::LoadError;

    /// Reads every image below a folder, including subfolders.
    ///
    /// Names are paths relative to the root joined with `/`, so `cats/01.png`
    /// stays distinct from `dogs/01.png`.
    #[derive(Debug, Clone)]
    pub struct FolderProvider {
        root: PathBuf,
    }

    impl FolderProvider {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        fn scan(&self, folder: &Path, out: &mut Vec<SourceFile>) -> Result<(), LoadError> {
            for entry in std::fs::read_dir(folder)?.filter_map(|e| e.ok()) {
                let path = entry.path();

                if path.is_dir() {
                    if let Err(e) = self.scan(&path, out) {
                        log::warn!("Failed to scan subdirectory {:?}: {}", path, e);
                    }
                    continue;
                }

                let Some(name) = self.relative_name(&path) else {
                    continue;
                };
                if !is_image_filename(&name) {
                    log::trace!("Skipping non-image file {:?}", path);
                    continue;
                }

                match std::fs::read(&path) {
                    Ok(bytes) => out.push(SourceFile::new(name, bytes)),
                    Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
                }
            }
            Ok(())
        }

        fn relative_name(&self, path: &Path) -> Option<String> {
            let relative = path.strip_prefix(&self.root).ok()?;
            let parts: Option<Vec<&str>> = relative.iter().map(|c| c.to_str()).collect();
            Some(parts?.join("/"))
        }
    }

    impl FileProvider for FolderProvider {
        fn files(&self) -> Result<Vec<SourceFile>, LoadError> {
            let mut files = Vec::new();
            self.scan(&self.root, &mut files)?;
            log::info!(
                "Scanned folder {:?}: found {} images",
                self.root,
                files.len()
            );
            Ok(files)
        }
    }
}
