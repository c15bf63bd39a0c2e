//! Loading overlay, info box and placard labels
//!
//! The overlay covers the whole window while assets load, fades out once
//! they are in and stays up with a Reload button when anything failed.

use std::time::Instant;

use imgui::{Condition, StyleColor, StyleVar, WindowFlags};

use crate::{
    loading::{LoadingManager, OverlayPhase},
    scene::{placard::InfoBox, ScreenLabel},
};

const BACKDROP: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
const BAR_TRACK: [f32; 4] = [0.267, 0.267, 0.267, 1.0];
const BAR_FILL: [f32; 4] = [0.204, 0.596, 0.859, 1.0];
const ERROR_RED: [f32; 4] = [0.906, 0.298, 0.235, 1.0];
const INFO_ERROR_RED: [f32; 4] = [1.0, 0.251, 0.251, 1.0];
const BAR_SIZE: [f32; 2] = [200.0, 5.0];
const DETAILS_WIDTH: f32 = 400.0;

/// Something the user asked for from the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Reload,
}

/// Draws the loading overlay; `scale` converts CSS-like sizes to UI pixels
pub fn draw_loading_overlay(
    ui: &imgui::Ui,
    loading: &LoadingManager,
    now: Instant,
    scale: f32,
) -> Option<OverlayAction> {
    let phase = loading.phase();
    let opacity = loading.overlay_opacity(now);
    if phase == OverlayPhase::Hidden || opacity <= 0.0 {
        return None;
    }

    let display_size = ui.io().display_size;
    let mut action = None;

    let mut flags = WindowFlags::NO_DECORATION
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_SAVED_SETTINGS
        | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS;
    if matches!(phase, OverlayPhase::FadingOut { .. }) {
        flags |= WindowFlags::NO_INPUTS;
    }

    let _alpha = ui.push_style_var(StyleVar::Alpha(opacity));
    let _bg = ui.push_style_color(StyleColor::WindowBg, BACKDROP);
    let _border = ui.push_style_var(StyleVar::WindowBorderSize(0.0));

    ui.window("##loading_overlay")
        .position([0.0, 0.0], Condition::Always)
        .size(display_size, Condition::Always)
        .flags(flags)
        .build(|| {
            let is_error = phase == OverlayPhase::Error;
            let status = loading.status_text();
            let bar_size = [BAR_SIZE[0] * scale, BAR_SIZE[1] * scale];

            let block_height = if is_error { 220.0 * scale } else { 40.0 * scale };
            let top = ((display_size[1] - block_height) * 0.5).max(0.0);
            ui.set_cursor_pos([0.0, top]);

            centered(ui, display_size[0], ui.calc_text_size(status)[0]);
            if is_error {
                ui.text_colored(ERROR_RED, status);
            } else {
                ui.text(status);
            }

            centered(ui, display_size[0], bar_size[0]);
            let fill = if is_error { ERROR_RED } else { BAR_FILL };
            let _track = ui.push_style_color(StyleColor::FrameBg, BAR_TRACK);
            let _fill = ui.push_style_color(StyleColor::PlotHistogram, fill);
            imgui::ProgressBar::new(loading.percent() as f32 / 100.0)
                .size(bar_size)
                .overlay_text("")
                .build(ui);

            if let Some(failure) = loading.failure().filter(|_| is_error) {
                ui.dummy([0.0, 15.0 * scale]);
                let width = (DETAILS_WIDTH * scale).min(display_size[0]);
                for line in failure.details().lines() {
                    centered(ui, display_size[0], ui.calc_text_size(line)[0].min(width));
                    let wrap = ui.push_text_wrap_pos_with_pos(ui.cursor_pos()[0] + width);
                    ui.text(line);
                    wrap.end();
                }

                ui.dummy([0.0, 10.0 * scale]);
                let button = [100.0 * scale, 0.0];
                centered(ui, display_size[0], button[0]);
                if ui.button_with_size("Reload", button) {
                    action = Some(OverlayAction::Reload);
                }
            }
        });

    action
}

fn centered(ui: &imgui::Ui, available: f32, width: f32) {
    let x = ((available - width) * 0.5).max(0.0);
    ui.set_cursor_pos([x, ui.cursor_pos()[1]]);
}

/// Draws the info box in the bottom-left corner
pub fn draw_info_box(ui: &imgui::Ui, info: &InfoBox, scale: f32) {
    let display_size = ui.io().display_size;
    let width = 320.0 * scale;

    ui.window("Info")
        .position([10.0, display_size[1] - 10.0], Condition::FirstUseEver)
        .position_pivot([0.0, 1.0])
        .size([width, 0.0], Condition::FirstUseEver)
        .flags(WindowFlags::NO_SAVED_SETTINGS | WindowFlags::ALWAYS_AUTO_RESIZE)
        .build(|| {
            let wrap = ui.push_text_wrap_pos_with_pos(width);
            for entry in info.entries() {
                if entry.is_error {
                    ui.dummy([0.0, 10.0 * scale]);
                    ui.text_colored(INFO_ERROR_RED, &entry.text);
                } else {
                    ui.text(&entry.text);
                }
            }
            wrap.end();
        });
}

/// Draws placard text centred on each label's position
pub fn draw_placard_labels(ui: &imgui::Ui, labels: &[ScreenLabel]) {
    if labels.is_empty() {
        return;
    }
    let draw_list = ui.get_foreground_draw_list();
    for label in labels {
        let size = ui.calc_text_size(&label.text);
        let pos = [
            label.position[0] - size[0] * 0.5,
            label.position[1] - size[1] * 0.5,
        ];
        draw_list.add_text(pos, [1.0, 1.0, 1.0, 1.0], &label.text);
    }
}
