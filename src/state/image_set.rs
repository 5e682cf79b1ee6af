//! Ordered image list and the current position in it.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{ImageRef, SourceFile, is_image_filename};

/// Errors that can occur when loading images.
#[derive(Debug, Error)]
pub enum LoadError {
    /// None of the provided files has a recognised image extension
    #[error("No image files found among {provided} provided files")]
    NoImages {
        /// Number of files the provider delivered
        provided: usize,
    },

    /// Two files resolved to the same image name
    #[error("Duplicate image name: {0}")]
    DuplicateName(String),

    /// Two images differ only by extension and would share one label file
    #[error("Images '{first}' and '{second}' would both be labeled as '{label}'")]
    DuplicateLabelName {
        label: String,
        first: String,
        second: String,
    },

    /// I/O error in the file provider
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The images of a session, sorted by name, with a cursor.
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    images: Vec<ImageRef>,
    current_index: Option<usize>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with the recognised images among `files`, sorted by name.
    ///
    /// Names are ordered by byte value, so uppercase sorts before lowercase.
    /// The cursor moves to the first image. If no file is an image the set is
    /// left as it was and an error is returned.
    pub fn load(&mut self, files: Vec<SourceFile>) -> Result<(), LoadError> {
        let provided = files.len();
        let mut images: Vec<ImageRef> = files
            .into_iter()
            .filter(|f| {
                let keep = is_image_filename(&f.name);
                if !keep {
                    log::trace!("Skipping non-image: {}", f.name);
                }
                keep
            })
            .map(|f| ImageRef::new(f.name, f.bytes))
            .collect();

        if images.is_empty() {
            return Err(LoadError::NoImages { provided });
        }

        images.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = images.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(LoadError::DuplicateName(pair[0].name().to_string()));
        }

        let mut labels: HashMap<String, &str> = HashMap::with_capacity(images.len());
        for image in &images {
            let label = image.label_file_name();
            if let Some(first) = labels.get(&label) {
                return Err(LoadError::DuplicateLabelName {
                    first: first.to_string(),
                    second: image.name().to_string(),
                    label,
                });
            }
            labels.insert(label, image.name());
        }

        log::info!(
            "Loaded {} images ({} files provided)",
            images.len(),
            provided
        );

        self.images = images;
        self.current_index = Some(0);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Get the current image.
    pub fn current(&self) -> Option<&ImageRef> {
        self.images.get(self.current_index?)
    }

    /// Move by `delta`, clamped to the list bounds. Returns true if the cursor moved.
    pub fn navigate(&mut self, delta: isize) -> bool {
        let Some(current) = self.current_index else {
            return false;
        };
        let last = self.images.len().saturating_sub(1) as isize;
        let target = (current as isize + delta).clamp(0, last) as usize;
        self.go_to(target)
    }

    /// Jump to `index`. Out-of-range indices are ignored. Returns true if the cursor moved.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.images.len() || self.current_index == Some(index) {
            return false;
        }
        self.current_index = Some(index);
        true
    }

    /// Record the intrinsic size of an image once the renderer has decoded it.
    pub fn set_dimensions(&mut self, name: &str, width: u32, height: u32) -> bool {
        let Some(slot) = self.images.iter_mut().find(|img| img.name() == name) else {
            return false;
        };
        *slot = slot.clone().with_dimensions(width, height);
        true
    }

    /// Get progress string like "3 / 15".
    pub fn progress(&self) -> String {
        match self.current_index {
            Some(index) => format!("{} / {}", index + 1, self.images.len()),
            None => format!("0 / {}", self.images.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|n| SourceFile::new(*n, Vec::new()))
            .collect()
    }

    #[test]
    fn test_load_filters_and_sorts() {
        let mut set = ImageSet::new();
        set.load(files(&["c.png", "notes.txt", "a.JPG", "b.gif"]))
            .unwrap();
        let names: Vec<_> = set.images().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["a.JPG", "b.gif", "c.png"]);
        assert_eq!(set.current_index(), Some(0));
    }

    #[test]
    fn test_load_without_images_keeps_previous_state() {
        let mut set = ImageSet::new();
        set.load(files(&["a.png", "b.png"])).unwrap();
        set.navigate(1);
        let err = set.load(files(&["readme.md"])).unwrap_err();
        assert!(matches!(err, LoadError::NoImages { provided: 1 }));
        assert_eq!(set.len(), 2);
        assert_eq!(set.current_index(), Some(1));
    }

    #[test]
    fn test_load_rejects_duplicate_names() {
        let mut set = ImageSet::new();
        let err = set.load(files(&["a.png", "a.png"])).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateName(_)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_rejects_shared_label_file() {
        let mut set = ImageSet::new();
        set.load(files(&["b.png"])).unwrap();

        let err = set.load(files(&["a.png", "a.jpg", "c.png"])).unwrap_err();
        match err {
            LoadError::DuplicateLabelName {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "a.txt");
                assert_eq!(first, "a.jpg");
                assert_eq!(second, "a.png");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(set.len(), 1);

        // Same stem in different folders is fine
        set.load(files(&["cats/a.png", "dogs/a.png"])).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_uppercase_sorts_first() {
        let mut set = ImageSet::new();
        set.load(files(&["a.png", "B.png"])).unwrap();
        let names: Vec<_> = set.images().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["B.png", "a.png"]);
    }

    #[test]
    fn test_navigate_clamps() {
        let mut set = ImageSet::new();
        set.load(files(&["a.png", "b.png", "c.png"])).unwrap();
        assert!(!set.navigate(-1));
        assert_eq!(set.current_index(), Some(0));
        assert!(set.navigate(1));
        assert!(set.navigate(1));
        assert!(!set.navigate(1));
        assert_eq!(set.current_index(), Some(2));
        assert_eq!(set.progress(), "3 / 3");
    }

    #[test]
    fn test_navigate_on_empty_set() {
        let mut set = ImageSet::new();
        assert!(!set.navigate(1));
        assert!(set.current().is_none());
        assert_eq!(set.progress(), "0 / 0");
    }

    #[test]
    fn test_go_to_out_of_range_is_ignored() {
        let mut set = ImageSet::new();
        set.load(files(&["a.png", "b.png"])).unwrap();
        assert!(!set.go_to(5));
        assert!(set.go_to(1));
        assert_eq!(set.current().map(ImageRef::name), Some("b.png"));
    }
}
