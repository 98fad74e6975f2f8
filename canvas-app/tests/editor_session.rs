//! Integration tests for editing sessions (canvas-app).
//!
//! Bitmaps are generated in-test and served from data URIs, temp files or a
//! stub fetcher, so nothing here touches the network or installed fonts.

use canvas_app::{
    BitmapFetcher, BitmapSource, Editor, EditorConfig, EditorError, FetchError, FetchedBitmap,
};
use canvas_core::{Notice, ObjectKind, Selection};
use canvas_renderer::image::png_data_uri;
use canvas_renderer::{ExportFormat, RenderError};
use image::ImageEncoder;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// A 2x1 PNG: red on the left, blue on the right.
fn red_blue_png() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), 2, 1, image::ExtendedColorType::Rgba8)
        .expect("encode fixture");
    png
}

fn config() -> EditorConfig {
    EditorConfig {
        load_system_fonts: false,
        ..EditorConfig::default()
    }
}

fn fixture_source() -> BitmapSource {
    png_data_uri(&red_blue_png()).parse().expect("data uri")
}

/// Serves the fixture after one scheduler yield, like a network round trip.
struct StubFetcher {
    readback_permitted: bool,
}

impl BitmapFetcher for StubFetcher {
    async fn fetch(&self, _source: &BitmapSource) -> Result<FetchedBitmap, FetchError> {
        tokio::task::yield_now().await;
        Ok(FetchedBitmap {
            bytes: red_blue_png(),
            readback_permitted: self.readback_permitted,
        })
    }
}

fn stub_editor(readback_permitted: bool) -> (Editor<StubFetcher>, UnboundedReceiver<Notice>) {
    let (tx, rx) = unbounded_channel();
    let editor = Editor::initialize(config(), StubFetcher { readback_permitted }, tx)
        .expect("editor");
    (editor, rx)
}

fn source_editor() -> (Editor, UnboundedReceiver<Notice>) {
    let (tx, rx) = unbounded_channel();
    (Editor::new(config(), tx).expect("editor"), rx)
}

fn decode_rgb(bytes: &[u8]) -> image::RgbImage {
    image::load_from_memory(bytes).expect("decode export").to_rgb8()
}

// ==========================================================================
// Scenarios
// ==========================================================================

#[test]
fn test_text_flip_delete_scenario() {
    let (editor, mut rx) = source_editor();
    assert_eq!(editor.background().map(|b| b.index()).ok(), Some(0));

    let id = editor.add_text("A").expect("add text");
    assert_eq!(editor.object_count().ok(), Some(1));
    assert_eq!(editor.selection().ok(), Some(Selection::Active(id)));

    assert_eq!(editor.flip_active().ok(), Some(true));
    let flipped = editor
        .with_scene(|scene| scene.get(id).map(|o| o.transform.flip_x))
        .expect("scene");
    assert_eq!(flipped, Some(true));

    let removed = editor.delete_active().expect("delete");
    assert_eq!(removed.id, id);
    assert_eq!(editor.object_count().ok(), Some(0));
    assert_eq!(editor.selection().ok(), Some(Selection::Idle));

    let err = editor.flip_active().unwrap_err();
    assert!(err.is_nothing_selected());
    assert_eq!(rx.try_recv().ok(), Some(Notice::nothing_selected("flip")));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_delete_twice_reports_once_per_call() {
    let (editor, mut rx) = source_editor();
    editor.add_text("A").expect("add");
    editor.add_text("B").expect("add");

    editor.delete_active().expect("delete");
    assert_eq!(editor.object_count().ok(), Some(1));

    assert!(editor.delete_active().is_err());
    assert_eq!(editor.object_count().ok(), Some(1));
    assert_eq!(rx.try_recv().ok(), Some(Notice::nothing_selected("delete")));
}

#[tokio::test]
async fn test_add_image_normalizes_and_centres() {
    let (editor, mut rx) = source_editor();
    let id = editor.add_image(&fixture_source()).await.expect("add image");

    let (size, centre, is_image) = editor
        .with_scene(|scene| {
            let object = scene.last().expect("object");
            (
                object.scaled_size(),
                (object.transform.x, object.transform.y),
                object.is_image(),
            )
        })
        .expect("scene");
    assert!(is_image);
    assert_eq!(size, (200.0, 200.0));
    assert_eq!(centre, (250.0, 250.0));
    assert_eq!(editor.selection().ok(), Some(Selection::Active(id)));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_add_image_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fixture.png");
    std::fs::write(&path, red_blue_png()).expect("write fixture");

    let (editor, _rx) = source_editor();
    let source: BitmapSource = path.to_string_lossy().parse().expect("path source");
    editor.add_image(&source).await.expect("add image");

    let source_label = editor
        .with_scene(|scene| match &scene.last().expect("object").kind {
            ObjectKind::Image(image) => image.source.clone(),
            ObjectKind::Text(_) => String::new(),
        })
        .expect("scene");
    assert!(source_label.ends_with("fixture.png"));
}

#[tokio::test]
async fn test_undecodable_image_leaves_scene_unchanged() {
    let (editor, mut rx) = source_editor();
    editor.add_text("keep me").expect("add");

    let source: BitmapSource = "data:text/plain,not%20an%20image".parse().expect("data uri");
    let err = editor.add_image(&source).await.unwrap_err();
    assert!(matches!(err, EditorError::Render(RenderError::Resource(_))));

    assert_eq!(editor.object_count().ok(), Some(1));
    assert!(editor
        .with_scene(|scene| scene.active().is_some_and(|o| o.is_text()))
        .expect("scene"));
    let notice = rx.try_recv().expect("notice");
    assert_eq!(notice, Notice::image_load_failed());
    assert_eq!(notice.severity, canvas_core::Severity::Destructive);
}

#[tokio::test]
async fn test_missing_file_reports_load_failure() {
    let (editor, mut rx) = source_editor();
    let source: BitmapSource = "/no/such/dir/fixture.png".parse().expect("path");
    let err = editor.add_image(&source).await.unwrap_err();
    assert!(matches!(err, EditorError::Fetch(FetchError::Io(_))));
    assert_eq!(rx.try_recv().ok(), Some(Notice::image_load_failed()));
}

// ==========================================================================
// Disposal while pending
// ==========================================================================

#[tokio::test]
async fn test_dispose_while_image_pending_is_a_no_op() {
    let (editor, mut rx) = stub_editor(true);
    let source = fixture_source();

    let (result, disposed) = tokio::join!(editor.add_image(&source), async {
        editor.dispose()
    });

    assert!(disposed);
    assert!(matches!(result, Err(EditorError::Disposed)));
    assert!(editor.is_disposed());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_dispose_while_export_pending_is_a_no_op() {
    let (editor, mut rx) = stub_editor(true);
    editor.add_text("A").expect("add");

    let (result, _) = tokio::join!(editor.export_to_image(), async { editor.dispose() });
    assert!(matches!(result, Err(EditorError::Disposed)));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_clones_share_the_session() {
    let (editor, _rx) = stub_editor(true);
    let other = editor.clone();
    other.add_image(&fixture_source()).await.expect("add");
    assert_eq!(editor.object_count().ok(), Some(1));
    other.dispose();
    assert!(editor.is_disposed());
}

// ==========================================================================
// Export
// ==========================================================================

#[tokio::test]
async fn test_export_shows_rendered_pixels() {
    let (editor, _rx) = stub_editor(true);
    editor.add_image(&fixture_source()).await.expect("add");

    let artifact = editor.export_to_image().await.expect("export");
    assert_eq!(artifact.file_name, "canvas.png");
    assert_eq!(artifact.mime_type, "image/png");

    let rgb = decode_rgb(&artifact.bytes);
    assert_eq!(rgb.dimensions(), (500, 500));
    let left = rgb.get_pixel(170, 250).0;
    let right = rgb.get_pixel(330, 250).0;
    assert!(left[0] > 200 && left[2] < 60, "left half should be red: {left:?}");
    assert!(right[2] > 200 && right[0] < 60, "right half should be blue: {right:?}");
    assert_eq!(rgb.get_pixel(10, 10).0, [0x1f, 0x29, 0x37]);

    editor.flip_active().expect("flip");
    let flipped = decode_rgb(&editor.export_to_image().await.expect("export").bytes);
    let left = flipped.get_pixel(170, 250).0;
    assert!(left[2] > 200 && left[0] < 60, "flip should mirror: {left:?}");
}

#[tokio::test]
async fn test_export_is_deterministic() {
    let (editor, _rx) = stub_editor(true);
    editor.add_image(&fixture_source()).await.expect("add");
    editor.cycle_background().expect("cycle");

    let first = editor.export_to_image().await.expect("first");
    let second = editor.export_to_image().await.expect("second");
    assert_eq!(first.bytes, second.bytes);

    editor.flip_active().expect("flip");
    editor.flip_active().expect("flip back");
    let third = editor.export_to_image().await.expect("third");
    assert_eq!(first.bytes, third.bytes);
}

#[tokio::test]
async fn test_jpeg_export() {
    let (tx, _rx) = unbounded_channel();
    let config = config().with_export_format(ExportFormat::Jpeg);
    let editor = Editor::initialize(config, StubFetcher { readback_permitted: true }, tx)
        .expect("editor");

    let artifact = editor.export_to_image().await.expect("export");
    assert_eq!(artifact.file_name, "canvas.jpg");
    assert_eq!(artifact.mime_type, "image/jpeg");
    assert_eq!(&artifact.bytes[..2], &[0xFF, 0xD8]);
    assert!(artifact.data_url().starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_tainted_surface_refuses_export() {
    let (editor, mut rx) = stub_editor(false);
    editor.add_image(&fixture_source()).await.expect("add");
    assert_eq!(editor.is_tainted().ok(), Some(true));

    let err = editor.export_to_image().await.unwrap_err();
    assert!(matches!(err, EditorError::Render(RenderError::Tainted)));
    assert_eq!(rx.try_recv().ok(), Some(Notice::export_failed()));

    // Removing the bitmap does not clear the taint.
    editor.delete_active().expect("delete");
    assert!(editor.export_to_image().await.is_err());
}
