use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_DEEP: Color32 = Color32::from_rgb(6, 6, 8);
pub const BG_PANEL: Color32 = Color32::from_rgb(12, 12, 15);
pub const BG_WIDGET: Color32 = Color32::from_rgb(22, 22, 28);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(32, 32, 40);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(44, 42, 30);
pub const BG_ERROR: Color32 = Color32::from_rgb(40, 15, 15);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(176, 174, 168);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 108, 104);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(228, 226, 220);

pub const ACCENT_AMBER: Color32 = Color32::from_rgb(224, 180, 60);
pub const ACCENT_TEAL: Color32 = Color32::from_rgb(64, 178, 166);
pub const ACCENT_RED: Color32 = Color32::from_rgb(196, 58, 48);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(60, 58, 40, 80);

fn widget(fill: Color32, stroke: Stroke, text: Color32, expansion: f32) -> egui::style::WidgetVisuals {
    egui::style::WidgetVisuals {
        bg_fill: fill,
        weak_bg_fill: fill,
        bg_stroke: stroke,
        rounding: Rounding::same(3.0),
        fg_stroke: Stroke::new(1.0, text),
        expansion,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive = widget(BG_PANEL, Stroke::new(1.0, BORDER_SUBTLE), TEXT_MUTED, 0.0);
    visuals.widgets.inactive = widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_PRIMARY, 0.0);
    visuals.widgets.hovered = widget(BG_WIDGET_HOVER, Stroke::new(1.0, ACCENT_TEAL), TEXT_BRIGHT, 1.0);
    visuals.widgets.active = widget(BG_WIDGET_ACTIVE, Stroke::new(2.0, ACCENT_AMBER), TEXT_BRIGHT, 1.0);
    visuals.widgets.open = widget(BG_WIDGET_ACTIVE, Stroke::new(1.0, ACCENT_TEAL), TEXT_BRIGHT, 0.0);

    visuals.selection = egui::style::Selection {
        bg_fill: ACCENT_AMBER.gamma_multiply(0.35),
        stroke: Stroke::new(1.0, ACCENT_AMBER),
    };
    visuals.hyperlink_color = ACCENT_TEAL;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_DEEP;
    visuals.warn_fg_color = ACCENT_AMBER;
    visuals.error_fg_color = ACCENT_RED;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.panel_fill = BG_PANEL;
    visuals.slider_trailing_fill = true;

    ctx.style_mut(|style| {
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.slider_width = 170.0;
        style.text_styles = [
            (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
        ]
        .into();
    });
}
