//! Integration tests for the object store and selection controller.
//!
//! Exercises the store through the public API only: append order, the
//! single-active invariant, and the idle error path.

use std::sync::Arc;

use canvas_core::{
    Background, Bitmap, CanvasError, ObjectKind, Scene, SceneObject, Selection, TextStyle,
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_TEXT, IMAGE_TARGET_SIZE, PRESET_BACKGROUNDS,
};

#[allow(clippy::cast_precision_loss)]
fn centre() -> (f32, f32) {
    (CANVAS_WIDTH as f32 / 2.0, CANVAS_HEIGHT as f32 / 2.0)
}

fn text_object(content: &str) -> SceneObject {
    let (cx, cy) = centre();
    SceneObject::text(content, TextStyle::default()).centered_at(cx, cy)
}

fn image_object(width: u32, height: u32) -> SceneObject {
    let (cx, cy) = centre();
    let bitmap = Bitmap {
        width,
        height,
        png: Arc::from(Vec::new()),
        readback_permitted: true,
    };
    SceneObject::image("fixture.png", bitmap, IMAGE_TARGET_SIZE).centered_at(cx, cy)
}

// ==========================================================================
// Append order
// ==========================================================================

#[test]
fn test_every_add_is_last_and_active() {
    let mut scene = Scene::new();
    for i in 0..10 {
        let id = if i % 2 == 0 {
            scene.add(text_object(&format!("text {i}")))
        } else {
            scene.add(image_object(640, 480))
        };
        assert_eq!(scene.last().map(|o| o.id), Some(id));
        assert_eq!(scene.selection(), Selection::Active(id));
        assert_eq!(scene.len(), i + 1);
    }
}

#[test]
fn test_image_normalized_and_centred() {
    let mut scene = Scene::new();
    scene.add(image_object(1024, 300));

    let image = scene.active().expect("active image");
    let (w, h) = image.scaled_size();
    assert!((w - 200.0).abs() < 1e-3);
    assert!((h - 200.0).abs() < 1e-3);
    assert!((image.transform.x - 250.0).abs() < f32::EPSILON);
    assert!((image.transform.y - 250.0).abs() < f32::EPSILON);
}

#[test]
fn test_default_text_style() {
    let object = text_object(DEFAULT_TEXT);
    let ObjectKind::Text(text) = &object.kind else {
        panic!("expected text");
    };
    assert_eq!(text.content, "Your Text Here");
    assert!((text.style.font_size - 30.0).abs() < f32::EPSILON);
    assert_eq!(text.style.fill, "white");
    assert_eq!(text.style.stroke, "#000000");
    assert!((text.style.stroke_width - 2.0).abs() < f32::EPSILON);
}

// ==========================================================================
// Selection invariant
// ==========================================================================

#[test]
fn test_delete_shrinks_by_one_then_idles() {
    let mut scene = Scene::new();
    scene.add(text_object("a"));
    scene.add(image_object(10, 10));
    scene.add(text_object("c"));

    let before = scene.len();
    scene.delete_active().expect("delete");
    assert_eq!(scene.len(), before - 1);
    assert_eq!(scene.selection(), Selection::Idle);
    assert!(scene.active().is_none());

    let err = scene.delete_active().expect_err("second delete is idle");
    assert!(err.is_nothing_selected());
    assert_eq!(scene.len(), before - 1);
}

#[test]
fn test_deleting_reselected_middle_object_keeps_order() {
    let mut scene = Scene::new();
    let a = scene.add(text_object("a"));
    let b = scene.add(text_object("b"));
    let c = scene.add(text_object("c"));

    scene.select(b).expect("select");
    scene.delete_active().expect("delete");

    let ids: Vec<_> = scene.objects().map(|o| o.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn test_edit_on_image_is_rejected_without_change() {
    let mut scene = Scene::new();
    scene.add(image_object(10, 10));

    let err = scene.set_active_text("nope").expect_err("images are not text");
    assert!(matches!(err, CanvasError::InvalidOperation(_)));
    assert!(scene.active().is_some_and(SceneObject::is_image));
}

// ==========================================================================
// Background palette
// ==========================================================================

#[test]
fn test_background_cycle_wraps() {
    let mut bg = Background::new();
    let seen: Vec<_> = (0..PRESET_BACKGROUNDS.len()).map(|_| bg.cycle()).collect();
    assert_eq!(seen.last().copied(), Some(PRESET_BACKGROUNDS[0]));
    assert_eq!(bg.index(), 0);
}
