use std::path::Path;

use super::*;
use crate::discovery::resolver::{DESCRIPTOR_FILE, DiscoverySession};

const PATTERN: &str = "E##_##_##_##_##_##__";
const EVENT: &str = "E01_02_03_04_05_06__x";

fn scratch_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fdt_localizer_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_descriptor(event_dir: &Path, set: &str, frame: &str, text: &str) -> PathBuf {
    let json_dir = event_dir.join(set).join(frame).join("Render").join("Json");
    std::fs::create_dir_all(&json_dir).unwrap();
    let path = json_dir.join(DESCRIPTOR_FILE);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn rewrite_replaces_every_occurrence() {
    let out = rewrite_descriptor("a/X/b and a/X/b again", "a/X/b", "L");
    assert_eq!(out, "L and L again");
    assert_eq!(rewrite_descriptor("untouched", "a/X/b", "L"), "untouched");
}

#[test]
fn references_use_event_and_set_names() {
    let root = scratch_root("refs");
    let event_dir = root.join("soccer").join(EVENT);
    write_descriptor(&event_dir, "SET1", "F1", "{}");

    let catalog = DiscoverySession::new(&root, PATTERN).discover().unwrap();
    let frame = &catalog.frames[0];
    assert_eq!(
        authoring_set_reference(frame),
        format!("Events/{EVENT}/SET1")
    );
    assert_eq!(
        local_set_reference(frame),
        slash_path(&event_dir.join("SET1"))
    );
}

#[test]
fn localize_writes_sibling_and_keeps_original() {
    let root = scratch_root("write");
    let event_dir = root.join(EVENT);
    let original = format!(
        r#"{{"startFrame": 1, "endFrame": 2, "mesh": "Events/{EVENT}/SET1/mesh.obj", "tex": "Events/{EVENT}/SET1/t.png"}}"#
    );
    let src = write_descriptor(&event_dir, "SET1", "F1", &original);

    let catalog = DiscoverySession::new(&root, PATTERN).discover().unwrap();
    let stats = localize_catalog(&catalog);
    assert_eq!(
        stats,
        LocalizeStats {
            total: 1,
            written: 1,
            skipped: 0
        }
    );

    assert_eq!(std::fs::read_to_string(&src).unwrap(), original);
    let localized =
        std::fs::read_to_string(src.parent().unwrap().join("testMe.json")).unwrap();
    let local_set = slash_path(&event_dir.join("SET1"));
    assert!(localized.contains(&format!("{local_set}/mesh.obj")));
    assert!(localized.contains(&format!("{local_set}/t.png")));
    assert!(!localized.contains("Events/"));
}

#[test]
fn relative_events_reference_is_rewritten() {
    let root = scratch_root("relative");
    let event_dir = root.join(EVENT);
    let original = format!(r#"{{"mesh": "Events/{EVENT}/SET1/mesh.obj"}}"#);
    let src = write_descriptor(&event_dir, "SET1", "F1", &original);

    let catalog = DiscoverySession::new(&root, PATTERN).discover().unwrap();
    let dst = localize_frame(&catalog.frames[0]).unwrap();

    let local_set = slash_path(&event_dir.join("SET1"));
    assert_eq!(
        std::fs::read_to_string(dst).unwrap(),
        format!(r#"{{"mesh": "{local_set}/mesh.obj"}}"#)
    );
    assert_eq!(std::fs::read_to_string(src).unwrap(), original);
}

#[test]
fn drive_prefixed_reference_keeps_its_prefix() {
    let root = scratch_root("drive");
    let event_dir = root.join(EVENT);
    let original = format!(r#"{{"mesh": "D:/Events/{EVENT}/SET1/mesh.obj"}}"#);
    write_descriptor(&event_dir, "SET1", "F1", &original);

    let catalog = DiscoverySession::new(&root, PATTERN).discover().unwrap();
    let dst = localize_frame(&catalog.frames[0]).unwrap();

    let local_set = slash_path(&event_dir.join("SET1"));
    assert_eq!(
        std::fs::read_to_string(dst).unwrap(),
        format!(r#"{{"mesh": "D:/{local_set}/mesh.obj"}}"#)
    );
}

#[test]
fn missing_descriptor_is_skipped_and_others_continue() {
    let root = scratch_root("skip");
    let event_dir = root.join(EVENT);
    let gone = write_descriptor(&event_dir, "SET1", "F1", "{}");
    write_descriptor(&event_dir, "SET1", "F2", "{}");

    let catalog = DiscoverySession::new(&root, PATTERN).discover().unwrap();
    std::fs::remove_file(&gone).unwrap();

    let stats = localize_catalog(&catalog);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.written, 1);
    assert_eq!(stats.skipped, 1);
    assert!(matches!(
        localize_frame(&catalog.frames[0]),
        Err(TesterError::Skipped(_))
    ));
}
