//! In-scene error placard
//!
//! A red slab with a black text panel in front of it, floating one unit
//! above the origin. The text itself is laid out as if on a 256x128 canvas
//! stretched over the panel; the UI draws each line as a screen-space label
//! at its projected anchor.

use cgmath::Point3;
use log::error;

use crate::gfx::{
    geometry::{generate_box, generate_plane},
    scene::model::MeshData,
};

pub const BOX_SIZE: [f32; 3] = [1.0, 0.5, 0.1];
pub const BOX_CENTER: [f32; 3] = [0.0, 1.0, 0.0];
pub const PANEL_SIZE: [f32; 2] = [1.0, 0.5];
pub const PANEL_CENTER: [f32; 3] = [0.0, 1.0, 0.06];

const CANVAS_WIDTH: f32 = 256.0;
const CANVAS_HEIGHT: f32 = 128.0;
const LINE_HEIGHT: f32 = 20.0;

/// sRGB colours of the slab and the text panel
pub const BOX_COLOR: [u8; 4] = [255, 0, 0, 255];
pub const PANEL_COLOR: [u8; 4] = [0, 0, 0, 255];

/// One text line and the world point its centre sits on
#[derive(Debug, Clone, PartialEq)]
pub struct PlacardLine {
    pub text: String,
    pub anchor: Point3<f32>,
}

/// Canvas-space centre of each line: horizontally centred, the block of
/// lines vertically centred with a fixed line height
pub fn canvas_line_positions(line_count: usize) -> Vec<[f32; 2]> {
    if line_count == 0 {
        return Vec::new();
    }
    let start_y = CANVAS_HEIGHT / 2.0 - ((line_count - 1) as f32 * LINE_HEIGHT) / 2.0;
    (0..line_count)
        .map(|i| [CANVAS_WIDTH / 2.0, start_y + i as f32 * LINE_HEIGHT])
        .collect()
}

/// Maps a canvas pixel onto the text panel in world space
fn canvas_to_world(canvas: [f32; 2]) -> Point3<f32> {
    let u = canvas[0] / CANVAS_WIDTH - 0.5;
    let v = 0.5 - canvas[1] / CANVAS_HEIGHT;
    Point3::new(
        PANEL_CENTER[0] + u * PANEL_SIZE[0],
        PANEL_CENTER[1] + v * PANEL_SIZE[1],
        PANEL_CENTER[2],
    )
}

/// Splits `message` on newlines and anchors every line on the panel
pub fn placard_line_anchors(message: &str) -> Vec<PlacardLine> {
    let lines: Vec<&str> = message.split('\n').collect();
    lines
        .iter()
        .zip(canvas_line_positions(lines.len()))
        .map(|(text, canvas)| PlacardLine {
            text: text.to_string(),
            anchor: canvas_to_world(canvas),
        })
        .collect()
}

/// Optional on-screen log of messages, errors highlighted
#[derive(Debug, Clone, Default)]
pub struct InfoBox {
    entries: Vec<InfoEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoEntry {
    pub text: String,
    pub is_error: bool,
}

impl InfoBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) {
        self.entries.push(InfoEntry {
            text: text.to_string(),
            is_error: false,
        });
    }

    pub fn push_error(&mut self, message: &str) {
        self.entries.push(InfoEntry {
            text: format!("Error: {}", message),
            is_error: true,
        });
    }

    pub fn entries(&self) -> &[InfoEntry] {
        &self.entries
    }
}

/// Geometry and text of one placard; GPU buffers are made by the scene
#[derive(Debug, Clone)]
pub struct Placard {
    pub message: String,
    pub slab: MeshData,
    pub panel: MeshData,
    pub lines: Vec<PlacardLine>,
}

impl Placard {
    pub fn new(message: &str) -> Self {
        let slab = generate_box(BOX_SIZE[0], BOX_SIZE[1], BOX_SIZE[2])
            .translated(BOX_CENTER)
            .into_mesh_data("placard slab");
        let panel = generate_plane(PANEL_SIZE[0], PANEL_SIZE[1], 1, 1)
            .translated(PANEL_CENTER)
            .into_mesh_data("placard panel");

        Self {
            message: message.to_string(),
            slab,
            panel,
            lines: placard_line_anchors(message),
        }
    }
}

/// Builds a placard for `message`, logs it and records it in `info_box`
pub fn show_error(message: &str, info_box: Option<&mut InfoBox>) -> Placard {
    error!("Error: {}", message);
    if let Some(info_box) = info_box {
        info_box.push_error(message);
    }
    Placard::new(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_centred() {
        assert_eq!(canvas_line_positions(1), vec![[128.0, 64.0]]);
        let lines = placard_line_anchors("boom");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].anchor, Point3::new(0.0, 1.0, 0.06));
    }

    #[test]
    fn test_lines_are_spaced_and_centred_as_a_block() {
        let positions = canvas_line_positions(3);
        assert_eq!(positions, vec![[128.0, 44.0], [128.0, 64.0], [128.0, 84.0]]);

        let lines = placard_line_anchors("a\nb\nc");
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[2].text, "c");
        // 20 canvas px of 128 is 0.078125 world units on a 0.5 high panel
        assert!((lines[0].anchor.y - (1.0 + 0.078125)).abs() < 1e-6);
        assert!((lines[1].anchor.y - 1.0).abs() < 1e-6);
        assert!((lines[2].anchor.y - (1.0 - 0.078125)).abs() < 1e-6);
        assert!(lines.iter().all(|l| l.anchor.x == 0.0 && l.anchor.z == 0.06));
    }

    #[test]
    fn test_placard_geometry_position() {
        let placard = Placard::new("x");
        let max_z = placard
            .slab
            .vertices
            .iter()
            .map(|v| v.position[2])
            .fold(f32::MIN, f32::max);
        assert!((max_z - 0.05).abs() < 1e-6);
        assert_eq!(placard.slab.indices.len(), 36);

        // Panel sits just in front of the slab
        assert!(placard.panel.vertices.iter().all(|v| v.position[2] == 0.06));
        let ys: Vec<f32> = placard.panel.vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (0.75..=1.25).contains(y)));
    }

    #[test]
    fn test_show_error_appends_to_info_box() {
        let mut info = InfoBox::new();
        info.push("Lightmap viewer");
        let placard = show_error("Model missing\nCheck the path", Some(&mut info));

        assert_eq!(placard.lines.len(), 2);
        let last = info.entries().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.text, "Error: Model missing\nCheck the path");

        let without = show_error("quiet", None);
        assert_eq!(without.message, "quiet");
    }
}
