//! PNG export of the annotated scene.
//!
//! Export always renders from an identity view (zoom 1, no pan) regardless of
//! how the user has the canvas positioned; the user's view is restored
//! afterwards, including on the error path.

use std::io::Cursor;

use chrono::Local;
use image::ImageFormat;
use log::info;

use crate::error::EditorError;
use crate::input::EditorState;
use crate::render;
use crate::util::Point;

/// Restores the saved view transform when dropped.
struct ViewResetGuard<'a> {
    editor: &'a mut EditorState,
    zoom: f64,
    pan: Point,
}

impl<'a> ViewResetGuard<'a> {
    fn reset(editor: &'a mut EditorState) -> Self {
        let zoom = editor.state().zoom();
        let pan = editor.state().pan();
        editor.store.set_view(1.0, Point::default());
        Self { editor, zoom, pan }
    }
}

impl Drop for ViewResetGuard<'_> {
    fn drop(&mut self) {
        self.editor.store.set_view(self.zoom, self.pan);
    }
}

/// Renders the scene to an encoded PNG at the configured pixel ratio.
///
/// Fails with [`EditorError::ExportFailure`] when no background is loaded;
/// there is nothing meaningful to export from a bare canvas.
pub fn export_png(editor: &mut EditorState) -> Result<Vec<u8>, EditorError> {
    if editor.state().background().is_none() {
        return Err(EditorError::ExportFailure(
            "no background image loaded".into(),
        ));
    }

    let viewport = editor.viewport();
    let ratio = editor.pixel_ratio;
    let guard = ViewResetGuard::reset(editor);
    let scene = render::render_scene(guard.editor.state(), None, viewport, ratio)?;
    drop(guard);

    let mut buffer = Cursor::new(Vec::new());
    scene
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| EditorError::ExportFailure(e.to_string()))?;
    let bytes = buffer.into_inner();
    info!(
        "exported {}x{} PNG, {} bytes",
        scene.width(),
        scene.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// Timestamped default file name for a fresh export.
pub fn export_file_name() -> String {
    Local::now()
        .format("annotation-%Y-%m-%dT%H-%M-%S.png")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn export_without_background_fails() {
        let mut editor = EditorState::new();
        let err = export_png(&mut editor).unwrap_err();
        assert!(matches!(err, EditorError::ExportFailure(_)));
    }

    #[test]
    fn export_produces_a_png_at_pixel_ratio() {
        let mut editor = EditorState::new();
        editor.set_viewport(200.0, 150.0);
        editor.load_background(RgbaImage::new(100, 100));

        let bytes = export_png(&mut editor).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 400);
        assert_eq!(decoded.height(), 300);
    }

    #[test]
    fn export_restores_the_user_view() {
        let mut editor = EditorState::new();
        editor.load_background(RgbaImage::new(100, 100));
        editor.zoom(0.5);
        let zoom_before = editor.state().zoom();
        let pan_before = editor.state().pan();

        export_png(&mut editor).unwrap();
        assert_eq!(editor.state().zoom(), zoom_before);
        assert_eq!(editor.state().pan(), pan_before);
    }

    #[test]
    fn file_name_carries_a_timestamp() {
        let name = export_file_name();
        assert!(name.starts_with("annotation-"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "annotation-2024-01-01T00-00-00.png".len());
    }
}
