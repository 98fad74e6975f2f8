//! Scene composition into an SVG document.
//!
//! The surface is drawn by building one SVG per frame (background rect, then
//! one group per object in insertion order) and rasterizing it.

use std::fmt::Write;

use canvas_core::{Background, ObjectKind, Scene, SceneObject, TextAlign, TextContent};

use crate::image::png_data_uri;

/// Build the SVG for a frame.
#[must_use]
pub fn scene_to_svg(scene: &Scene, background: Background, width: u32, height: u32) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );

    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(background.color()),
    );

    for object in scene.objects() {
        render_object_svg(&mut svg, object);
    }

    svg.push_str("</svg>");
    svg
}

/// Render a single object as a transformed group centred on its anchor.
fn render_object_svg(svg: &mut String, object: &SceneObject) {
    let tf = &object.transform;
    let flip = if tf.flip_x { -1.0 } else { 1.0 };

    let _ = write!(
        svg,
        "<g transform=\"translate({} {}) rotate({}) scale({} {})\">",
        tf.x,
        tf.y,
        tf.rotation,
        tf.scale_x * flip,
        tf.scale_y,
    );

    match &object.kind {
        ObjectKind::Image(image) => {
            let (w, h) = object.natural_size();
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"none\" xlink:href=\"{}\"/>",
                -w / 2.0,
                -h / 2.0,
                png_data_uri(&image.bitmap.png),
            );
        }
        ObjectKind::Text(text) => {
            let (w, _) = object.natural_size();
            render_text_svg(svg, text, w);
        }
    }

    svg.push_str("</g>");
}

/// Render text lines stacked around the anchor, fill first, outline on top.
#[allow(clippy::cast_precision_loss)]
fn render_text_svg(svg: &mut String, text: &TextContent, box_width: f32) {
    let style = &text.style;
    let line_x = match style.align {
        TextAlign::Left => -box_width / 2.0,
        TextAlign::Center => 0.0,
        TextAlign::Right => box_width / 2.0,
    };
    let line_step = style.font_size * style.line_height;
    let first_y = -(text.line_count().saturating_sub(1) as f32) * line_step / 2.0;

    let _ = write!(
        svg,
        "<text font-family=\"{}, sans-serif\" font-size=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" text-anchor=\"{}\" dominant-baseline=\"central\" xml:space=\"preserve\">",
        escape_xml(&style.font_family),
        style.font_size,
        escape_xml(&style.fill),
        escape_xml(&style.stroke),
        style.stroke_width,
        style.align.svg_anchor(),
    );

    for (i, line) in text.lines().enumerate() {
        let y = first_y + i as f32 * line_step;
        let _ = write!(
            svg,
            "<tspan x=\"{line_x}\" y=\"{y}\">{}</tspan>",
            escape_xml(line),
        );
    }

    svg.push_str("</text>");
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
