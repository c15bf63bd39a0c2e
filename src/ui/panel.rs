//! Lighting panel
//!
//! A colour picker and a strength slider. The panel only reports changes;
//! the application forwards them to the scene.

use imgui::Condition;

use crate::config::LightConfig;
use crate::gfx::color::LightColor;

/// A change made in the panel this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEvent {
    ColorChanged(LightColor),
    StrengthChanged(f32),
}

/// Rounds `value` to the nearest `step` above `min`, clamped to the range
pub fn snap_to_step(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if step <= 0.0 {
        return clamped;
    }
    let steps = ((clamped - min) / step).round();
    // Snap off float noise such as 1.5000001
    let snapped = ((min + steps * step) * 1e4).round() / 1e4;
    snapped.clamp(min, max)
}

pub struct LightPanel {
    color: [f32; 3],
    strength: f32,
    min: f32,
    max: f32,
    step: f32,
    width: f32,
}

impl LightPanel {
    /// `width` is in UI pixels
    pub fn new(light: &LightConfig, initial_color: LightColor, width: f32) -> Self {
        Self {
            color: initial_color.srgb(),
            strength: snap_to_step(light.strength, light.strength_min, light.strength_max, light.strength_step),
            min: light.strength_min,
            max: light.strength_max,
            step: light.strength_step,
            width,
        }
    }

    pub fn color(&self) -> LightColor {
        LightColor::from_srgb(self.color)
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Takes a raw slider value; returns the snapped value if it changed
    pub fn apply_strength(&mut self, raw: f32) -> Option<f32> {
        let snapped = snap_to_step(raw, self.min, self.max, self.step);
        if snapped == self.strength {
            return None;
        }
        self.strength = snapped;
        Some(snapped)
    }

    /// Takes a raw picker value; returns the colour if it changed
    pub fn apply_color(&mut self, srgb: [f32; 3]) -> Option<LightColor> {
        let color = LightColor::from_srgb(srgb);
        if color.srgb() == self.color {
            return None;
        }
        self.color = color.srgb();
        Some(color)
    }

    /// Draws the panel in the top-right corner
    pub fn draw(&mut self, ui: &imgui::Ui) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return events;
        }

        let width = self.width;
        ui.window("Lighting")
            .size([width, 0.0], Condition::FirstUseEver)
            .position([display_size[0] - width - 10.0, 10.0], Condition::FirstUseEver)
            .resizable(false)
            .collapsible(true)
            .build(|| {
                let mut color = self.color;
                if ui.color_edit3("Light color", &mut color) {
                    if let Some(c) = self.apply_color(color) {
                        events.push(PanelEvent::ColorChanged(c));
                    }
                }

                let mut strength = self.strength;
                if ui
                    .slider_config("Light strength", self.min, self.max)
                    .display_format("%.1f")
                    .build(&mut strength)
                {
                    if let Some(s) = self.apply_strength(strength) {
                        events.push(PanelEvent::StrengthChanged(s));
                    }
                }
            });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> LightPanel {
        let light = LightConfig::default();
        let color = LightColor::from_hex(&light.color).unwrap();
        LightPanel::new(&light, color, 250.0)
    }

    #[test]
    fn test_defaults() {
        let panel = panel();
        assert_eq!(panel.strength(), 1.5);
        assert_eq!(panel.color().to_hex(), "#ff115e");
    }

    #[test]
    fn test_snap_to_step() {
        assert_eq!(snap_to_step(1.46, 0.0, 3.0, 0.1), 1.5);
        assert_eq!(snap_to_step(1.44, 0.0, 3.0, 0.1), 1.4);
        assert_eq!(snap_to_step(-2.0, 0.0, 3.0, 0.1), 0.0);
        assert_eq!(snap_to_step(7.0, 0.0, 3.0, 0.1), 3.0);
        assert_eq!(snap_to_step(0.7, 0.0, 3.0, 0.1), 0.7);
        assert_eq!(snap_to_step(2.25, 0.0, 3.0, 0.0), 2.25);
    }

    #[test]
    fn test_strength_events_only_on_change() {
        let mut panel = panel();
        assert_eq!(panel.apply_strength(1.52), None);
        assert_eq!(panel.apply_strength(2.04), Some(2.0));
        assert_eq!(panel.strength(), 2.0);
        assert_eq!(panel.apply_strength(2.0), None);
    }

    #[test]
    fn test_color_events_only_on_change() {
        let mut panel = panel();
        let same = panel.color().srgb();
        assert_eq!(panel.apply_color(same), None);

        let changed = panel.apply_color([0.0, 1.0, 0.0]).unwrap();
        assert_eq!(changed.to_hex(), "#00ff00");
        assert_eq!(panel.color(), changed);
    }
}
