use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use super::*;
use crate::model::{Rect, encode_test_png};

/// Archiver that records the entries it was given and returns their paths joined.
#[derive(Default)]
struct RecordingArchiver {
    seen: Mutex<Vec<ArchiveEntry>>,
}

impl Archiver for RecordingArchiver {
    fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.extend_from_slice(entries);
        }
        let joined: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        Ok(joined.join("\n").into_bytes())
    }
}

/// Archiver that does not return until it is released.
struct GatedArchiver {
    release: Mutex<Receiver<()>>,
}

impl Archiver for GatedArchiver {
    fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        if let Ok(release) = self.release.lock() {
            let _ = release.recv();
        }
        ZipArchiver.archive(entries)
    }
}

struct FailingArchiver;

impl Archiver for FailingArchiver {
    fn archive(&self, _entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        Err(ArchiveError::Failed("disk full".into()))
    }
}

fn bbox(x: f32, y: f32, w: f32, h: f32, class_index: usize, name: &str) -> BoundingBox {
    BoundingBox::new(Rect::new(x, y, w, h), 5.0, class_index, name).unwrap()
}

fn snapshot() -> DatasetSnapshot {
    DatasetSnapshot {
        images: vec![
            SnapshotImage {
                image: ImageRef::new("a.png", encode_test_png(640, 480)),
                boxes: vec![
                    bbox(100.0, 120.0, 60.0, 200.0, 0, "cat"),
                    bbox(300.0, 200.0, 150.0, 100.0, 1, "dog"),
                ],
            },
            SnapshotImage {
                image: ImageRef::new("b.jpeg", vec![1, 2, 3]),
                boxes: Vec::new(),
            },
        ],
        classes: ClassRegistry::from_text("cat\ndog"),
        precision: 3,
    }
}

fn text_of<'a>(entries: &'a [ArchiveEntry], path: &str) -> &'a str {
    let entry = entries.iter().find(|e| e.path == path).unwrap();
    std::str::from_utf8(entry.content.as_bytes()).unwrap()
}

#[test]
fn test_entry_layout_and_order() {
    let (entries, report) = snapshot().build_entries().unwrap();
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "images/a.png",
            "labels/a.txt",
            "images/b.jpeg",
            "labels/b.txt",
            "classes.txt",
        ]
    );
    assert_eq!(report.images_exported, 2);
    assert_eq!(report.annotations_exported, 2);
    assert!(!report.has_warnings());
}

#[test]
fn test_label_and_class_contents() {
    let (entries, _) = snapshot().build_entries().unwrap();
    assert_eq!(
        text_of(&entries, "labels/a.txt"),
        "0 0.203 0.458 0.094 0.417\n1 0.586 0.521 0.234 0.208"
    );
    assert_eq!(text_of(&entries, "classes.txt"), "cat\ndog");
}

#[test]
fn test_image_without_boxes_gets_empty_label_file() {
    // b.jpeg is not decodable, but it has no boxes so its size is never needed
    let (entries, _) = snapshot().build_entries().unwrap();
    assert_eq!(text_of(&entries, "labels/b.txt"), "");
    assert_eq!(
        entries
            .iter()
            .find(|e| e.path == "images/b.jpeg")
            .unwrap()
            .content
            .as_bytes(),
        &[1, 2, 3]
    );
}

#[test]
fn test_preconditions() {
    let mut empty = snapshot();
    empty.images.clear();
    assert!(matches!(empty.build_entries(), Err(ExportError::NoImages)));

    let mut no_classes = snapshot();
    no_classes.classes = ClassRegistry::new();
    assert!(matches!(
        no_classes.build_entries(),
        Err(ExportError::NoClasses)
    ));
}

#[test]
fn test_shared_label_file_is_rejected() {
    let mut snap = snapshot();
    snap.images.push(SnapshotImage {
        image: ImageRef::new("a.jpg", encode_test_png(10, 10)),
        boxes: Vec::new(),
    });
    match snap.build_entries() {
        Err(ExportError::DuplicateLabel(path)) => assert_eq!(path, "labels/a.txt"),
        other => panic!("unexpected result: {:?}", other.map(|(e, _)| e.len())),
    }
}

#[test]
fn test_boxes_without_dimensions_fail() {
    let mut snap = snapshot();
    snap.images[1].boxes.push(bbox(0.0, 0.0, 10.0, 10.0, 0, "cat"));
    assert!(matches!(
        snap.build_entries(),
        Err(ExportError::Format(FormatError::MissingDimensions { .. }))
    ));
}

#[test]
fn test_class_follows_name_after_reorder() {
    let mut snap = snapshot();
    snap.classes = ClassRegistry::from_text("dog\ncat");
    let (entries, report) = snap.build_entries().unwrap();
    let labels = text_of(&entries, "labels/a.txt");
    let classes: Vec<&str> = labels
        .lines()
        .map(|l| l.split(' ').next().unwrap())
        .collect();
    assert_eq!(classes, vec!["1", "0"]);
    assert!(!report.has_warnings());
}

#[test]
fn test_removed_class_keeps_stale_index_with_warning() {
    let mut snap = snapshot();
    snap.classes = ClassRegistry::from_text("cat\nbird");
    let (entries, report) = snap.build_entries().unwrap();
    let labels = text_of(&entries, "labels/a.txt");
    assert!(labels.lines().nth(1).unwrap().starts_with("1 "));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].image, "a.png");
}

#[test]
fn test_export_uses_archiver_and_name() {
    let archiver = RecordingArchiver::default();
    let artifact = snapshot().export(&archiver).unwrap();
    assert_eq!(artifact.file_name, "yolo_dataset.zip");
    assert_eq!(archiver.seen.lock().unwrap().len(), 5);
    assert!(String::from_utf8(artifact.bytes).unwrap().ends_with("classes.txt"));
}

#[test]
fn test_archiver_failure_is_reported() {
    assert!(matches!(
        snapshot().export(&FailingArchiver),
        Err(ExportError::Archive(ArchiveError::Failed(_)))
    ));
}

#[test]
fn test_zip_export_is_deterministic() {
    let first = snapshot().export(&ZipArchiver).unwrap();
    let second = snapshot().export(&ZipArchiver).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_worker_delivers_result() {
    let worker = ExportWorker::spawn(snapshot(), Arc::new(ZipArchiver)).unwrap();
    let artifact = worker.wait().unwrap();
    assert_eq!(artifact.report.images_exported, 2);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_worker_poll_until_done() {
    let mut worker = ExportWorker::spawn(snapshot(), Arc::new(ZipArchiver)).unwrap();
    let result = loop {
        if let Some(result) = worker.poll() {
            break result;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    };
    assert!(result.is_ok());
    assert!(worker.poll().is_none());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_dropping_running_worker_does_not_block() {
    let (release_tx, release_rx) = mpsc::channel();
    let archiver = Arc::new(GatedArchiver {
        release: Mutex::new(release_rx),
    });
    let worker = ExportWorker::spawn(snapshot(), archiver).unwrap();

    // The archiver is still waiting, so joining here would never return
    drop(worker);
    release_tx.send(()).unwrap();
}
