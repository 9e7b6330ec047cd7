//! Integration tests for configuration flowing into the canvas.

use picturebook_core::{EditorConfig, PictureBookError};
use picturebook_timeline::{Clip, Modifiers};

use crate::support::{at, canvas_with, drag};

#[test]
fn partial_json_keeps_defaults() {
    let config = EditorConfig::from_json(br#"{ "snap_threshold_px": 30.0 }"#).unwrap();
    assert_eq!(config.snap_threshold_px, 30.0);
    assert_eq!(config.edge_threshold_px, EditorConfig::default().edge_threshold_px);
    assert_eq!(config.layout, EditorConfig::default().layout);
}

#[test]
fn invalid_json_is_rejected() {
    let err = EditorConfig::from_json(br#"{ "min_duration": -1.0 }"#).unwrap_err();
    assert!(matches!(err, PictureBookError::Config(_)));

    let err = EditorConfig::from_json(b"not json").unwrap_err();
    assert!(matches!(err, PictureBookError::Serialization(_)));
}

#[test]
fn wider_snap_threshold_reaches_further() {
    let config = EditorConfig::from_json(br#"{ "snap_threshold_px": 30.0 }"#).unwrap();
    let clip = Clip::image("a", 0, 1.0, 1.0);
    let id = clip.id;
    let mut canvas = canvas_with(config, 100.0, vec![clip]);
    canvas.set_playhead(5.0, false);

    // 0.25s from the playhead: outside the default 0.1s, inside 0.3s.
    let from = at(&canvas, 1.5, 0);
    let to = at(&canvas, 5.75, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);
    assert_eq!(canvas.timeline().get(id).unwrap().start, 5.0);
}

#[test]
fn larger_minimum_duration_limits_trims() {
    let config = EditorConfig::from_json(br#"{ "min_duration": 0.5 }"#).unwrap();
    let clip = Clip::image("a", 0, 1.0, 2.0);
    let id = clip.id;
    let mut canvas = canvas_with(config, 100.0, vec![clip]);

    let from = at(&canvas, 2.98, 0);
    let to = at(&canvas, 0.98, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);
    assert!((canvas.timeline().get(id).unwrap().duration - 0.5).abs() < 1e-9);
}
