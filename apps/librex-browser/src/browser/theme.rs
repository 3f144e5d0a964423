use super::*;
use lx_config::Rgb;

pub(super) fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

fn corner_radius(style: &ChromeStyle) -> egui::CornerRadius {
    let radius = style.corner_radius.round().clamp(0.0, f32::from(u8::MAX));
    egui::CornerRadius::same(radius as u8)
}

/// Applies the chrome stylesheet on top of egui's dark theme.
pub(super) fn apply_chrome_style(ctx: &egui::Context, chrome: &ChromeStyle) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();

    let accent = color(chrome.accent_color);
    let radius = corner_radius(chrome);

    style.visuals.window_fill = color(chrome.window_fill);
    style.visuals.panel_fill = color(chrome.panel_fill);
    style.visuals.extreme_bg_color = color(chrome.window_fill);
    style.visuals.override_text_color = Some(color(chrome.text_color));
    style.visuals.hyperlink_color = accent;
    style.visuals.selection.bg_fill = accent;
    style.visuals.selection.stroke.color = color(chrome.text_color);
    style.visuals.window_corner_radius = radius;

    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
        &mut style.visuals.widgets.open,
    ] {
        widget.corner_radius = radius;
    }
    style.visuals.widgets.active.bg_fill = accent;

    style.spacing.item_spacing = egui::vec2(chrome.item_spacing, chrome.item_spacing);

    ctx.set_style(style);
}
