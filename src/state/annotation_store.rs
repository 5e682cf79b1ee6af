//! Per-image bounding-box storage.

use std::collections::HashMap;

use crate::model::BoundingBox;

/// Boxes keyed by image name, each list in creation order.
///
/// An image without an entry behaves exactly like one with an empty list.
/// Selection is not tracked here; callers holding a box index must drop or
/// remap it after a deletion.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    boxes: HashMap<String, Vec<BoundingBox>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a box to an image's list. Overlapping boxes are allowed.
    pub fn add_box(&mut self, image_name: &str, bbox: BoundingBox) -> usize {
        let list = self.boxes.entry(image_name.to_string()).or_default();
        list.push(bbox);
        list.len() - 1
    }

    /// Remove the box at `index`, shifting later boxes down by one.
    ///
    /// Out-of-range indices leave the store untouched and return `None`.
    pub fn delete_box(&mut self, image_name: &str, index: usize) -> Option<BoundingBox> {
        let list = self.boxes.get_mut(image_name)?;
        if index >= list.len() {
            return None;
        }
        Some(list.remove(index))
    }

    /// Remove every box from an image. Returns how many were removed.
    pub fn clear(&mut self, image_name: &str) -> usize {
        self.boxes
            .get_mut(image_name)
            .map(|list| std::mem::take(list).len())
            .unwrap_or(0)
    }

    /// Boxes of an image in creation order.
    pub fn boxes(&self, image_name: &str) -> &[BoundingBox] {
        self.boxes.get(image_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if an image has at least one box.
    pub fn has_annotations(&self, image_name: &str) -> bool {
        !self.boxes(image_name).is_empty()
    }

    /// Total number of boxes across all images.
    pub fn total_boxes(&self) -> usize {
        self.boxes.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn named(name: &str) -> BoundingBox {
        BoundingBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), 5.0, 0, name).unwrap()
    }

    #[test]
    fn test_absent_image_is_empty() {
        let store = AnnotationStore::new();
        assert!(store.boxes("missing.png").is_empty());
        assert!(!store.has_annotations("missing.png"));
    }

    #[test]
    fn test_add_keeps_creation_order() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.add_box("a.png", named("A")), 0);
        assert_eq!(store.add_box("a.png", named("B")), 1);
        let names: Vec<_> = store.boxes("a.png").iter().map(|b| b.class_name()).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(store.has_annotations("a.png"));
    }

    #[test]
    fn test_delete_shifts_later_boxes() {
        let mut store = AnnotationStore::new();
        for n in ["A", "B", "C"] {
            store.add_box("img.jpg", named(n));
        }
        let removed = store.delete_box("img.jpg", 1).unwrap();
        assert_eq!(removed.class_name(), "B");
        let names: Vec<_> = store
            .boxes("img.jpg")
            .iter()
            .map(|b| b.class_name())
            .collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let mut store = AnnotationStore::new();
        store.add_box("img.jpg", named("A"));
        assert!(store.delete_box("img.jpg", 3).is_none());
        assert!(store.delete_box("other.jpg", 0).is_none());
        assert_eq!(store.boxes("img.jpg").len(), 1);
    }

    #[test]
    fn test_clear_only_touches_one_image() {
        let mut store = AnnotationStore::new();
        store.add_box("a.png", named("A"));
        store.add_box("a.png", named("B"));
        store.add_box("b.png", named("C"));
        assert_eq!(store.clear("a.png"), 2);
        assert!(!store.has_annotations("a.png"));
        assert!(store.has_annotations("b.png"));
        assert_eq!(store.total_boxes(), 1);
    }
}
