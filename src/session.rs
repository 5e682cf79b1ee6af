//! The annotation session: one owner for all labeling state.
//!
//! A `Session` holds the class list, the ordered images, the boxes per image,
//! the current selection and the box being dragged out. The host feeds it
//! discrete events (pointer, key, wheel) one at a time and reads back draw lists
//! and panel views; nothing here blocks or touches the display directly.
//!
//! Selection and the in-progress drag belong to the displayed image. Moving to
//! another image drops both, while committed boxes stay in the store under the
//! image name and reappear when the image is shown again.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use crate::constants::{DEFAULT_LABEL_PRECISION, DEFAULT_MIN_BOX_SIZE};
use crate::coords::{SurfaceRect, to_image_space};
use crate::export::{Archiver, DatasetSnapshot, ExportArtifact, ExportError, SnapshotImage};
#[cfg(not(target_arch = "wasm32"))]
use crate::export::ExportWorker;
use crate::geometry::{hit_test, normalize_drag};
use crate::input::{InputEvent, Key};
use crate::keybindings::{KeyAction, KeyBindings};
use crate::model::{BoundingBox, ClassRegistry, ImageRef, Point, Rect, SourceFile};
use crate::render::{Frame, build_frame};
use crate::state::{AnnotationStore, ImageSet, LoadError};
use crate::views::{self, AnnotationRow, ImageListEntry, StatusLine};

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Boxes must be strictly larger than this on both axes
    pub min_box_size: f32,
    /// Decimals written per normalized label value
    pub label_precision: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            label_precision: DEFAULT_LABEL_PRECISION,
        }
    }
}

/// State of the box currently being dragged out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Drawing a box from `start` to `current` (image space).
    Drawing { start: Point, current: Point },
}

impl DragState {
    /// Check if we're currently drawing something.
    pub fn is_drawing(&self) -> bool {
        matches!(self, DragState::Drawing { .. })
    }

    /// The normalized rectangle of the drag so far.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            DragState::Idle => None,
            DragState::Drawing { start, current } => Some(normalize_drag(*start, *current)),
        }
    }
}

/// What a pointer press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// No image is displayed or the point could not be mapped
    Ignored,
    /// An existing box was hit and is now selected
    Selected(usize),
    /// Nothing was hit; a new drag has started
    DragStarted,
}

/// A single-user labeling session.
#[derive(Debug, Default)]
pub struct Session {
    settings: SessionSettings,
    bindings: KeyBindings,
    classes: ClassRegistry,
    images: ImageSet,
    store: AnnotationStore,
    selection: Option<usize>,
    drag: DragState,
    active_class: usize,
    surface: Option<SurfaceRect>,
}

impl Session {
    pub fn new(settings: SessionSettings, bindings: KeyBindings) -> Self {
        Self {
            settings,
            bindings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Replace the class list from newline-separated text.
    pub fn set_classes_text(&mut self, text: &str) {
        self.classes.set_from_text(text);
        self.after_classes_changed();
    }

    /// Replace the class list from individual lines.
    pub fn set_classes<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.classes.set_classes(lines);
        self.after_classes_changed();
    }

    fn after_classes_changed(&mut self) {
        if self.active_class >= self.classes.len() {
            self.active_class = 0;
        }
        if self.classes.is_empty() {
            log::info!("Class list is empty; drawing and export are disabled");
        }
    }

    /// Drawing, clearing and export are only offered once classes exist.
    pub fn controls_enabled(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Class that newly drawn boxes receive.
    pub fn active_class(&self) -> usize {
        self.active_class
    }

    /// Choose the class for new boxes. Out-of-range indices are ignored.
    pub fn set_active_class(&mut self, index: usize) -> bool {
        if index >= self.classes.len() {
            return false;
        }
        self.active_class = index;
        true
    }

    /// Step the active class, wrapping. No-op without classes.
    pub fn cycle_active_class(&mut self, step: isize) -> Option<usize> {
        let next = self.classes.cycle(self.active_class, step)?;
        self.active_class = next;
        Some(next)
    }

    /// One wheel notch over the canvas: up selects the previous class, down the next.
    pub fn wheel(&mut self, delta_y: f32) -> Option<usize> {
        let step = if delta_y < 0.0 { -1 } else { 1 };
        self.cycle_active_class(step)
    }

    // ------------------------------------------------------------------
    // Images and navigation
    // ------------------------------------------------------------------

    /// Replace the image list with the recognised images among `files`.
    ///
    /// Boxes drawn earlier stay in the store under their image names. On error the
    /// session is left unchanged.
    pub fn load_images(&mut self, files: Vec<SourceFile>) -> Result<(), LoadError> {
        self.images.load(files)?;
        self.on_image_changed();
        Ok(())
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.images.current()
    }

    /// Move by `delta` images, clamped at both ends.
    pub fn navigate(&mut self, delta: isize) -> bool {
        let moved = self.images.navigate(delta);
        if moved {
            self.on_image_changed();
        }
        moved
    }

    /// Jump to an image from the list.
    pub fn go_to(&mut self, index: usize) -> bool {
        let moved = self.images.go_to(index);
        if moved {
            self.on_image_changed();
        }
        moved
    }

    /// Record an image's intrinsic size once the renderer has decoded it.
    pub fn set_image_dimensions(&mut self, name: &str, width: u32, height: u32) -> bool {
        self.images.set_dimensions(name, width, height)
    }

    /// Tell the session where the surface is on screen. `None` means unscaled.
    pub fn set_surface(&mut self, surface: Option<SurfaceRect>) {
        self.surface = surface;
    }

    fn on_image_changed(&mut self) {
        self.selection = None;
        self.drag = DragState::Idle;
        if let Some(image) = self.images.current() {
            log::debug!(
                "Showing '{}' ({}) with {} boxes",
                image.name(),
                self.images.progress(),
                self.store.boxes(image.name()).len()
            );
        }
    }

    // ------------------------------------------------------------------
    // Boxes and selection
    // ------------------------------------------------------------------

    /// Boxes of the displayed image.
    pub fn current_boxes(&self) -> &[BoundingBox] {
        match self.images.current() {
            Some(image) => self.store.boxes(image.name()),
            None => &[],
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Select a box of the displayed image, e.g. from the annotation list.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.current_boxes().len() {
            return false;
        }
        self.selection = Some(index);
        true
    }

    /// Delete the selected box. No-op without a selection.
    pub fn delete_selected(&mut self) -> Option<BoundingBox> {
        let index = self.selection.take()?;
        let name = self.images.current()?.name().to_string();
        let removed = self.store.delete_box(&name, index);
        if removed.is_some() {
            log::debug!("Deleted box {} on '{}'", index, name);
        }
        removed
    }

    /// Remove every box on the displayed image. Confirmation is up to the host.
    pub fn clear_current(&mut self) -> usize {
        let Some(name) = self.images.current().map(|i| i.name().to_string()) else {
            return 0;
        };
        self.selection = None;
        let removed = self.store.clear(&name);
        log::info!("Cleared {} boxes on '{}'", removed, name);
        removed
    }

    // ------------------------------------------------------------------
    // Pointer protocol (image-space coordinates)
    // ------------------------------------------------------------------

    /// Press: select the topmost box under the point, or start a new drag.
    pub fn pointer_down(&mut self, point: Point) -> PointerOutcome {
        if self.images.current().is_none() {
            return PointerOutcome::Ignored;
        }

        if let Some(index) = hit_test(point, self.current_boxes()) {
            self.selection = Some(index);
            self.drag = DragState::Idle;
            return PointerOutcome::Selected(index);
        }

        self.selection = None;
        self.drag = DragState::Drawing {
            start: point,
            current: point,
        };
        PointerOutcome::DragStarted
    }

    /// Move while dragging: update the transient box. Returns false when not dragging.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match &mut self.drag {
            DragState::Drawing { current, .. } => {
                *current = point;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Release: commit the dragged box if it is large enough, otherwise drop it.
    ///
    /// Returns the index of the new box on the displayed image.
    pub fn pointer_up(&mut self) -> Option<usize> {
        let rect = std::mem::take(&mut self.drag).rect()?;
        let image = self.images.current()?;

        let rect = match image.dimensions() {
            Some((w, h)) => rect.clamp_to(w as f32, h as f32),
            None => rect,
        };

        let Some(class_name) = self.classes.get(self.active_class) else {
            log::warn!("Discarding box on '{}': no classes defined", image.name());
            return None;
        };

        let Some(bbox) = BoundingBox::new(
            rect,
            self.settings.min_box_size,
            self.active_class,
            class_name,
        ) else {
            log::debug!(
                "Discarding {:.1}x{:.1} drag (minimum {})",
                rect.width,
                rect.height,
                self.settings.min_box_size
            );
            return None;
        };

        let name = image.name().to_string();
        let index = self.store.add_box(&name, bbox);
        log::debug!("Added box {} on '{}'", index, name);
        Some(index)
    }

    /// Abandon the drag in progress, if any.
    pub fn cancel_drag(&mut self) -> bool {
        let was_drawing = self.drag.is_drawing();
        self.drag = DragState::Idle;
        was_drawing
    }

    // ------------------------------------------------------------------
    // Event dispatch (surface coordinates)
    // ------------------------------------------------------------------

    /// Map a screen point on the surface into the displayed image's pixels.
    pub fn map_surface_point(&self, point: Point) -> Option<Point> {
        let (w, h) = self.images.current()?.dimensions()?;
        let surface = self.surface.unwrap_or_else(|| SurfaceRect::unscaled(w, h));
        to_image_space(point, &surface, w, h)
    }

    /// Handle a key press according to the keybindings. Returns true if it did anything.
    pub fn key(&mut self, key: Key) -> bool {
        match self.bindings.action_for_key(key) {
            Some(KeyAction::NextImage) => self.navigate(1),
            Some(KeyAction::PrevImage) => self.navigate(-1),
            Some(KeyAction::DeleteSelected) => self.delete_selected().is_some(),
            Some(KeyAction::CancelDrag) => self.cancel_drag(),
            None => false,
        }
    }

    /// Feed one input event. Returns true if the session state changed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(p) => match self.map_surface_point(p) {
                Some(point) => self.pointer_down(point) != PointerOutcome::Ignored,
                None => false,
            },
            InputEvent::PointerMove(p) => match self.map_surface_point(p) {
                Some(point) => self.pointer_move(point),
                None => false,
            },
            InputEvent::PointerUp => {
                let was_drawing = self.drag.is_drawing();
                self.pointer_up().is_some() || was_drawing
            }
            InputEvent::Wheel { delta_y } => self.wheel(delta_y).is_some(),
            InputEvent::Key(key) => self.key(key),
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Draw list for the displayed image.
    pub fn frame(&self) -> Option<Frame> {
        let image = self.images.current()?;
        Some(build_frame(
            image,
            self.store.boxes(image.name()),
            self.selection,
            self.drag.rect(),
        ))
    }

    pub fn image_list(&self) -> Vec<ImageListEntry> {
        views::image_list(&self.images, &self.store)
    }

    pub fn annotation_rows(&self) -> Vec<AnnotationRow> {
        match self.images.current() {
            Some(image) => {
                views::annotation_rows(image, self.store.boxes(image.name()), self.selection)
            }
            None => Vec::new(),
        }
    }

    pub fn status(&self) -> Option<StatusLine> {
        views::status_line(&self.images)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Check the export preconditions without building anything.
    pub fn ensure_exportable(&self) -> Result<(), ExportError> {
        if self.images.is_empty() {
            return Err(ExportError::NoImages);
        }
        if self.classes.is_empty() {
            return Err(ExportError::NoClasses);
        }
        Ok(())
    }

    /// Freeze the current images, boxes and classes for export.
    pub fn snapshot(&self) -> DatasetSnapshot {
        DatasetSnapshot {
            images: self
                .images
                .images()
                .iter()
                .map(|image| SnapshotImage {
                    image: image.clone(),
                    boxes: self.store.boxes(image.name()).to_vec(),
                })
                .collect(),
            classes: self.classes.clone(),
            precision: self.settings.label_precision,
        }
    }

    /// Export synchronously.
    pub fn export(&self, archiver: &dyn Archiver) -> Result<ExportArtifact, ExportError> {
        self.ensure_exportable()?;
        self.snapshot().export(archiver)
    }

    /// Export on a background thread; poll the returned worker from the event loop.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_export(&self, archiver: Arc<dyn Archiver>) -> Result<ExportWorker, ExportError> {
        self.ensure_exportable()?;
        ExportWorker::spawn(self.snapshot(), archiver)
    }
}
