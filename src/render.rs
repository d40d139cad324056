//! CPU rasterization of the canvas scene.
//!
//! Vector shapes go through tiny-skia; mosaic pixelation and image overlays
//! operate on the RGBA buffer directly; text runs through ab_glyph/imageproc
//! in a final pass per object. Objects are painted strictly in render order
//! so a mosaic pixelates exactly what is underneath it at that point in the
//! stack.

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, warn};
use tiny_skia::{
    FillRule, GradientStop, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Shader,
    SpreadMode, Stroke, Transform,
};

use crate::canvas::CanvasState;
use crate::draw::{AnnotationObject, Color, GradientDirection, ToolKind};
use crate::error::EditorError;
use crate::util::{self, Point};

/// Default arrowhead geometry, matching the on-canvas preview.
const ARROWHEAD_LENGTH: f64 = 20.0;
const ARROWHEAD_ANGLE: f64 = 30.0;

/// World-to-output mapping for one render pass.
#[derive(Debug, Clone, Copy)]
struct View {
    zoom: f64,
    pan: Point,
    /// Output pixels per screen unit.
    ratio: f64,
}

impl View {
    fn map(&self, world: Point) -> (f32, f32) {
        let screen = crate::canvas::transform::world_to_screen(world, self.pan, self.zoom);
        ((screen.x * self.ratio) as f32, (screen.y * self.ratio) as f32)
    }

    /// Combined world-to-output scale factor.
    fn scale(&self) -> f64 {
        self.zoom * self.ratio
    }
}

/// Rasterizes the full scene into an RGBA buffer.
///
/// # Arguments
/// * `state` - Canvas state (view transform, background, committed objects)
/// * `draft` - Uncommitted in-progress object, painted on top when present
/// * `viewport` - Canvas size in screen units
/// * `pixel_ratio` - Output density multiplier
pub fn render_scene(
    state: &CanvasState,
    draft: Option<&AnnotationObject>,
    viewport: (f64, f64),
    pixel_ratio: u32,
) -> Result<RgbaImage, EditorError> {
    let ratio = f64::from(pixel_ratio.max(1));
    let out_w = ((viewport.0 * ratio).round() as u32).max(1);
    let out_h = ((viewport.1 * ratio).round() as u32).max(1);
    let view = View {
        zoom: state.zoom(),
        pan: state.pan(),
        ratio,
    };

    let mut canvas = RgbaImage::from_pixel(out_w, out_h, Rgba([255, 255, 255, 255]));

    if let Some(bg) = state.background() {
        let (px, py) = view.map(Point::new(bg.x, bg.y));
        let scaled_w = (f64::from(bg.width) * bg.scale_x * view.scale()).round() as u32;
        let scaled_h = (f64::from(bg.height) * bg.scale_y * view.scale()).round() as u32;
        if scaled_w > 0 && scaled_h > 0 {
            let resized = imageops::resize(
                bg.image.as_ref(),
                scaled_w,
                scaled_h,
                imageops::FilterType::Triangle,
            );
            imageops::overlay(&mut canvas, &resized, px as i64, py as i64);
        }
    }

    let font = load_system_font();
    if font.is_none() {
        warn!("no usable system font found; text annotations will be skipped");
    }

    for obj in state.render_order() {
        draw_object(&mut canvas, obj, view, font.as_ref())?;
    }
    if let Some(draft) = draft {
        draw_object(&mut canvas, draft, view, font.as_ref())?;
    }

    debug!("rendered {}x{} scene", out_w, out_h);
    Ok(canvas)
}

fn draw_object(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
    font: Option<&FontArc>,
) -> Result<(), EditorError> {
    match obj.kind {
        ToolKind::Rectangle => draw_rectangle(canvas, obj, view),
        ToolKind::Circle | ToolKind::Step => draw_disc(canvas, obj, view, font),
        ToolKind::Line | ToolKind::Pen => draw_polyline(canvas, obj, view, false),
        ToolKind::Arrow => draw_polyline(canvas, obj, view, true),
        ToolKind::Mosaic => {
            draw_mosaic(canvas, obj, view);
            Ok(())
        }
        ToolKind::Gradient => draw_gradient(canvas, obj, view),
        ToolKind::Image => {
            draw_image(canvas, obj, view);
            Ok(())
        }
        ToolKind::Text => {
            draw_text_object(canvas, obj, view, font);
            Ok(())
        }
        ToolKind::Select | ToolKind::Drag => Ok(()),
    }
}

fn draw_rectangle(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
) -> Result<(), EditorError> {
    let (x, y, w, h) = util::normalize_rect(obj.x, obj.y, obj.width_or_zero(), obj.height_or_zero());
    let (px, py) = view.map(Point::new(x, y));
    let pw = (w * view.scale()) as f32;
    let ph = (h * view.scale()) as f32;
    let Some(rect) = Rect::from_xywh(px, py, pw.max(0.01), ph.max(0.01)) else {
        return Ok(());
    };
    let path = PathBuilder::from_rect(rect);

    with_pixmap(canvas, |pixmap| {
        if let Some(fill) = obj.fill.filter(Color::is_visible) {
            pixmap.fill_path(
                &path,
                &solid_paint(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(stroke) = obj.stroke.filter(Color::is_visible) {
            pixmap.stroke_path(
                &path,
                &solid_paint(stroke),
                &stroke_style(obj, view, false),
                Transform::identity(),
                None,
            );
        }
    })
}

/// Circles and step markers share the disc geometry; steps add a centered
/// number on top.
fn draw_disc(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
    font: Option<&FontArc>,
) -> Result<(), EditorError> {
    let (cx, cy) = view.map(obj.position());
    let radius = (obj.radius() * view.scale()) as f32;
    if radius < 0.1 {
        return Ok(());
    }

    let mut pb = PathBuilder::new();
    pb.push_circle(cx, cy, radius);
    let Some(path) = pb.finish() else {
        return Ok(());
    };

    with_pixmap(canvas, |pixmap| {
        if let Some(fill) = obj.fill.filter(Color::is_visible) {
            pixmap.fill_path(
                &path,
                &solid_paint(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(stroke) = obj.stroke.filter(Color::is_visible) {
            pixmap.stroke_path(
                &path,
                &solid_paint(stroke),
                &stroke_style(obj, view, false),
                Transform::identity(),
                None,
            );
        }
    })?;

    if obj.kind == ToolKind::Step {
        if let (Some(font), Some(number)) = (font, obj.step_number) {
            let label = number.to_string();
            let size = (obj.width_or_zero() * 0.5 * view.scale()).max(1.0) as f32;
            let (tw, th) = text_size(size, font, &label);
            let color = obj.stroke.unwrap_or(crate::draw::color::STEP_STROKE);
            draw_text_mut(
                canvas,
                Rgba(color.to_rgba8()),
                cx as i32 - tw as i32 / 2,
                cy as i32 - th as i32 / 2,
                size,
                font,
                &label,
            );
        }
    }
    Ok(())
}

/// Lines, pen strokes, and arrows: a round-capped polyline through the
/// object's points, plus head lines at the final point for arrows.
fn draw_polyline(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
    arrowhead: bool,
) -> Result<(), EditorError> {
    let Some(points) = obj.points.as_deref() else {
        return Ok(());
    };
    if points.len() < 4 {
        return Ok(());
    }
    let Some(stroke) = obj.stroke.filter(Color::is_visible) else {
        return Ok(());
    };

    let mut pb = PathBuilder::new();
    let (x0, y0) = view.map(Point::new(points[0], points[1]));
    pb.move_to(x0, y0);
    for pair in points[2..].chunks_exact(2) {
        let (x, y) = view.map(Point::new(pair[0], pair[1]));
        pb.line_to(x, y);
    }

    if arrowhead {
        let n = points.len();
        let (tip_x, tip_y) = (points[n - 2], points[n - 1]);
        let (tail_x, tail_y) = (points[n - 4], points[n - 3]);
        let [(lx, ly), (rx, ry)] = util::calculate_arrowhead(
            tip_x,
            tip_y,
            tail_x,
            tail_y,
            ARROWHEAD_LENGTH,
            ARROWHEAD_ANGLE,
        );
        let (tpx, tpy) = view.map(Point::new(tip_x, tip_y));
        let (lpx, lpy) = view.map(Point::new(lx, ly));
        let (rpx, rpy) = view.map(Point::new(rx, ry));
        pb.move_to(lpx, lpy);
        pb.line_to(tpx, tpy);
        pb.line_to(rpx, rpy);
    }

    let Some(path) = pb.finish() else {
        return Ok(());
    };
    with_pixmap(canvas, |pixmap| {
        pixmap.stroke_path(
            &path,
            &solid_paint(stroke),
            &stroke_style(obj, view, true),
            Transform::identity(),
            None,
        );
    })
}

/// Pixelates the backdrop under the mosaic region by averaging square blocks.
fn draw_mosaic(canvas: &mut RgbaImage, obj: &AnnotationObject, view: View) {
    let (x, y, w, h) = util::normalize_rect(obj.x, obj.y, obj.width_or_zero(), obj.height_or_zero());
    let (px, py) = view.map(Point::new(x, y));
    let pw = (w * view.scale()).round() as i32;
    let ph = (h * view.scale()).round() as i32;
    let block = ((f64::from(obj.mosaic_size.unwrap_or(10)) * view.scale()).round() as u32).max(1);

    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
    let min_x = (px as i32).max(0) as u32;
    let min_y = (py as i32).max(0) as u32;
    let max_x = (px as i32 + pw - 1).min(cw - 1);
    let max_y = (py as i32 + ph - 1).min(ch - 1);
    if max_x < min_x as i32 || max_y < min_y as i32 {
        return;
    }
    let (max_x, max_y) = (max_x as u32, max_y as u32);

    let mut block_y = min_y;
    while block_y <= max_y {
        let end_y = (block_y + block - 1).min(max_y);
        let mut block_x = min_x;
        while block_x <= max_x {
            let end_x = (block_x + block - 1).min(max_x);

            let mut total = [0u64; 4];
            let mut count = 0u64;
            for by in block_y..=end_y {
                for bx in block_x..=end_x {
                    let pixel = canvas.get_pixel(bx, by);
                    for (sum, channel) in total.iter_mut().zip(pixel.0) {
                        *sum += u64::from(channel);
                    }
                    count += 1;
                }
            }
            let avg = Rgba([
                (total[0] / count) as u8,
                (total[1] / count) as u8,
                (total[2] / count) as u8,
                (total[3] / count) as u8,
            ]);
            for by in block_y..=end_y {
                for bx in block_x..=end_x {
                    canvas.put_pixel(bx, by, avg);
                }
            }

            block_x += block;
        }
        block_y += block;
    }
}

fn draw_gradient(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
) -> Result<(), EditorError> {
    let (x, y, w, h) = util::normalize_rect(obj.x, obj.y, obj.width_or_zero(), obj.height_or_zero());
    let (px, py) = view.map(Point::new(x, y));
    let pw = (w * view.scale()) as f32;
    let ph = (h * view.scale()) as f32;
    let Some(rect) = Rect::from_xywh(px, py, pw.max(0.01), ph.max(0.01)) else {
        return Ok(());
    };

    let colors = obj.gradient_colors.as_deref().unwrap_or(&[
        crate::draw::color::GRADIENT_START,
        crate::draw::color::GRADIENT_END,
    ]);
    if colors.len() < 2 {
        return Ok(());
    }
    let stops: Vec<GradientStop> = colors
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let pos = i as f32 / (colors.len() - 1) as f32;
            GradientStop::new(pos, skia_color(*c))
        })
        .collect();

    let direction = obj
        .gradient_direction
        .unwrap_or(GradientDirection::Horizontal);
    let start = tiny_skia::Point::from_xy(rect.left(), rect.top());
    let end = match direction {
        GradientDirection::Horizontal => tiny_skia::Point::from_xy(rect.right(), rect.top()),
        GradientDirection::Vertical => tiny_skia::Point::from_xy(rect.left(), rect.bottom()),
        GradientDirection::Diagonal => tiny_skia::Point::from_xy(rect.right(), rect.bottom()),
    };
    let Some(shader) =
        tiny_skia::LinearGradient::new(start, end, stops, SpreadMode::Pad, Transform::identity())
    else {
        return Ok(());
    };

    let path = PathBuilder::from_rect(rect);
    with_pixmap(canvas, |pixmap| {
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    })
}

fn draw_image(canvas: &mut RgbaImage, obj: &AnnotationObject, view: View) {
    let Some(payload) = &obj.image else {
        // Geometry reserved but pixels not attached yet.
        return;
    };
    let (px, py) = view.map(obj.position());
    let pw = (obj.width_or_zero() * view.scale()).round() as u32;
    let ph = (obj.height_or_zero() * view.scale()).round() as u32;
    if pw == 0 || ph == 0 {
        return;
    }
    let resized = imageops::resize(
        payload.pixels.as_ref(),
        pw,
        ph,
        imageops::FilterType::Triangle,
    );
    imageops::overlay(canvas, &resized, px as i64, py as i64);
}

fn draw_text_object(
    canvas: &mut RgbaImage,
    obj: &AnnotationObject,
    view: View,
    font: Option<&FontArc>,
) {
    let Some(font) = font else {
        return;
    };
    let Some(text) = obj.text.as_deref() else {
        return;
    };
    let size = (obj.font_size.unwrap_or(40.0) * view.scale()).max(1.0) as f32;
    let color = obj.fill.unwrap_or(crate::draw::color::TEXT_FILL);
    let (px, py) = view.map(obj.position());

    // Manual line layout; imageproc draws a single run per call.
    let line_height = size * 1.2;
    for (i, line) in text.lines().enumerate() {
        draw_text_mut(
            canvas,
            Rgba(color.to_rgba8()),
            px as i32,
            (py + i as f32 * line_height) as i32,
            size,
            font,
            line,
        );
    }
}

// ===== Helpers =====

/// Copies the canvas into a pixmap, runs the drawing closure, and copies the
/// result back. Both buffers are straight RGBA of the same size; the scene is
/// composited over an opaque base so premultiplication differences are moot.
fn with_pixmap<F>(canvas: &mut RgbaImage, f: F) -> Result<(), EditorError>
where
    F: FnOnce(&mut Pixmap),
{
    let (w, h) = canvas.dimensions();
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| EditorError::ExportFailure("cannot allocate pixmap".into()))?;
    pixmap.data_mut().copy_from_slice(canvas.as_raw());
    f(&mut pixmap);
    canvas.copy_from_slice(pixmap.data());
    Ok(())
}

fn solid_paint(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(skia_color(color)),
        anti_alias: true,
        ..Paint::default()
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn stroke_style(obj: &AnnotationObject, view: View, round: bool) -> Stroke {
    let width = (obj.stroke_width.unwrap_or(2.0) * view.scale()).max(0.5) as f32;
    if round {
        Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        }
    } else {
        Stroke {
            width,
            ..Stroke::default()
        }
    }
}

fn load_system_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Helvetica.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FactoryDefaults, IdAllocator, factory};
    use crate::input::EditorState;

    fn rect_object(x: f64, y: f64, w: f64, h: f64) -> AnnotationObject {
        let mut ids = IdAllocator::new();
        let mut obj = factory::create(
            ToolKind::Rectangle,
            Point::new(x, y),
            &[],
            &mut ids,
            &FactoryDefaults::default(),
        );
        obj.width = Some(w);
        obj.height = Some(h);
        obj
    }

    #[test]
    fn scene_size_follows_viewport_and_ratio() {
        let state = CanvasState::default();
        let scene = render_scene(&state, None, (320.0, 200.0), 2).unwrap();
        assert_eq!(scene.dimensions(), (640, 400));
    }

    #[test]
    fn rectangle_stroke_touches_the_canvas() {
        let mut canvas = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let obj = rect_object(20.0, 20.0, 40.0, 30.0);
        let view = View {
            zoom: 1.0,
            pan: Point::default(),
            ratio: 1.0,
        };
        draw_object(&mut canvas, &obj, view, None).unwrap();

        // Accent stroke runs along the top edge.
        let px = canvas.get_pixel(40, 20);
        assert_ne!(px.0, [255, 255, 255, 255]);
    }

    #[test]
    fn mosaic_averages_blocks_in_place() {
        // Left half black, right half white; a full-cover mosaic with one big
        // block turns the region into the average gray.
        let mut canvas = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let mut ids = IdAllocator::new();
        let mut obj = factory::create(
            ToolKind::Mosaic,
            Point::new(0.0, 0.0),
            &[],
            &mut ids,
            &FactoryDefaults::default(),
        );
        obj.width = Some(40.0);
        obj.height = Some(40.0);
        obj.mosaic_size = Some(40);

        let view = View {
            zoom: 1.0,
            pan: Point::default(),
            ratio: 1.0,
        };
        draw_mosaic(&mut canvas, &obj, view);

        let px = canvas.get_pixel(5, 5);
        assert_eq!(px.0[0], px.0[1]);
        assert!(px.0[0] > 100 && px.0[0] < 150);
        assert_eq!(*canvas.get_pixel(5, 5), *canvas.get_pixel(35, 35));
    }

    #[test]
    fn hidden_objects_are_not_painted() {
        let mut editor = EditorState::new();
        editor.load_background(RgbaImage::from_pixel(
            100,
            100,
            image::Rgba([255, 255, 255, 255]),
        ));
        let mut obj = rect_object(10.0, 10.0, 50.0, 50.0);
        obj.fill = Some(Color::from_rgb8(255, 0, 0));
        obj.visible = false;
        editor.replace_objects(vec![obj]);

        let scene = render_scene(editor.state(), None, (100.0, 100.0), 1).unwrap();
        for pixel in scene.pixels() {
            assert_eq!(pixel.0, [255, 255, 255, 255]);
        }
    }
}
