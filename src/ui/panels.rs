use egui::{Color32, Context, RichText, ScrollArea, Ui};

use crate::input::InteractionState;
use crate::renderer::RenderMode;
use crate::surface::cache::CacheStats;
use crate::surface::tessellator::{U_RANGE, V_RANGE};
use crate::surface::{NormalMode, SHAPE_PRESETS};
use crate::ui::state::UiState;
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub rebuild_mesh: bool,
    pub reload_texture: bool,
    pub reset_view: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub rows: usize,
    pub columns: usize,
    pub bytes: usize,
    pub build_ms: f32,
    pub cache: CacheStats,
    pub cached: usize,
}

pub enum TextureStatus {
    Loading,
    Ready { width: u32, height: u32 },
    Missing(String),
}

/// Read-only view of the application handed to the panel each frame.
pub struct PanelStatus<'a> {
    pub mesh: MeshStats,
    pub mesh_error: Option<&'a str>,
    pub texture: &'a TextureStatus,
    pub interaction: InteractionState,
}

pub fn draw_side_panel(ctx: &Context, state: &mut UiState, status: &PanelStatus) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(300.0)
        .max_width(400.0)
        .default_width(320.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Twisted Torus").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Parametric surface viewer").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "PRESET");
                egui::ComboBox::from_id_salt("shape_presets")
                    .selected_text(SHAPE_PRESETS[state.selected_preset].name)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (i, preset) in SHAPE_PRESETS.iter().enumerate() {
                            if ui.selectable_label(state.selected_preset == i, preset.name).clicked() {
                                state.apply_preset(i);
                            }
                        }
                    });
                ui.add_space(4.0);
                ui.label(RichText::new(SHAPE_PRESETS[state.selected_preset].description)
                    .color(TEXT_MUTED).size(11.0).italics());
                ui.add_space(16.0);

                section_header(ui, "SHAPE");
                let mut changed = false;
                egui::Grid::new("shape_params").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
                    ui.label("R");
                    changed |= ui.add(egui::Slider::new(&mut state.major_radius, 0.1..=6.0)).changed();
                    ui.end_row();

                    ui.label("a");
                    changed |= ui.add(egui::Slider::new(&mut state.amplitude, 0.1..=6.0)).changed();
                    ui.end_row();

                    ui.label("n");
                    changed |= ui.add(egui::Slider::new(&mut state.lobes, 1..=24)).changed();
                    ui.end_row();

                    ui.label("zoom");
                    changed |= ui.add(egui::Slider::new(&mut state.zoom, 0.5..=8.0)).changed();
                    ui.end_row();
                });
                ui.add_space(16.0);

                section_header(ui, "TESSELLATION");
                egui::Grid::new("tessellation").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
                    ui.label("step u");
                    changed |= ui.add(egui::DragValue::new(&mut state.step_u)
                        .speed(0.001).range(0.002..=U_RANGE).max_decimals(4)).changed();
                    ui.end_row();

                    ui.label("step v");
                    changed |= ui.add(egui::DragValue::new(&mut state.step_v)
                        .speed(0.001).range(0.002..=V_RANGE / 2.0).max_decimals(4)).changed();
                    ui.end_row();

                    ui.label("normal du");
                    changed |= ui.add(egui::DragValue::new(&mut state.normal_deltas.du)
                        .speed(0.0005).range(0.0001..=0.1).max_decimals(4)).changed();
                    ui.end_row();

                    ui.label("normal dv");
                    changed |= ui.add(egui::DragValue::new(&mut state.normal_deltas.dv)
                        .speed(0.0005).range(0.0001..=0.1).max_decimals(4)).changed();
                    ui.end_row();
                });
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("Normals:");
                    for mode in NormalMode::ALL {
                        if ui.selectable_label(state.normal_mode == mode, mode.label()).clicked()
                            && state.normal_mode != mode
                        {
                            state.normal_mode = mode;
                            changed = true;
                        }
                    }
                });
                match state.tessellation_settings().vertex_count() {
                    Ok(count) => {
                        ui.label(RichText::new(format!("{} vertices", fmt_num(count)))
                            .color(TEXT_MUTED).size(11.0));
                    }
                    Err(err) => {
                        ui.label(RichText::new(err.to_string()).color(ACCENT_AMBER).size(11.0));
                    }
                }
                if changed {
                    actions.rebuild_mesh = true;
                }
                if let Some(err) = status.mesh_error {
                    error_box(ui, err);
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                section_header(ui, "VIEW");
                ui.horizontal(|ui| {
                    ui.label("Mode:");
                    for mode in RenderMode::ALL {
                        if ui.selectable_label(state.scene.render_mode == mode, mode.label()).clicked() {
                            state.scene.render_mode = mode;
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Texture angle:");
                    ui.add(egui::Slider::new(&mut state.scene.texture_angle, -std::f32::consts::PI..=std::f32::consts::PI));
                });
                ui.horizontal(|ui| {
                    ui.label("Shininess:");
                    ui.add(egui::Slider::new(&mut state.scene.material.shininess, 1.0..=128.0).logarithmic(true));
                });
                ui.horizontal(|ui| {
                    if ui.button("Reset rotation").clicked() {
                        actions.reset_view = true;
                    }
                    ui.checkbox(&mut state.show_help, "Help");
                    ui.checkbox(&mut state.show_stats, "Stats");
                });
                ui.checkbox(&mut state.legacy_a_key_fallthrough, "A key also moves point up");
                ui.add_space(16.0);

                section_header(ui, "TEXTURE");
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut state.texture_path)
                        .hint_text("built-in checker")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::new(12.0, egui::FontFamily::Monospace)));
                    if ui.button("Load").clicked() {
                        actions.reload_texture = true;
                    }
                });
                ui.add_space(4.0);
                texture_status(ui, status.texture);
                ui.add_space(16.0);

                if state.show_stats {
                    ui.separator();
                    ui.add_space(12.0);
                    stats_panel(ui, status);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn error_box(ui: &mut Ui, message: &str) {
    ui.add_space(6.0);
    egui::Frame::default()
        .fill(BG_ERROR)
        .stroke(egui::Stroke::new(1.0, ACCENT_RED))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(message).color(ACCENT_RED).size(11.0));
        });
}

fn texture_status(ui: &mut Ui, status: &TextureStatus) {
    match status {
        TextureStatus::Loading => {
            ui.label(RichText::new("Loading...").color(ACCENT_AMBER).size(11.0));
        }
        TextureStatus::Ready { width, height } => {
            ui.label(RichText::new(format!("{width} x {height}")).color(ACCENT_TEAL).size(11.0));
        }
        TextureStatus::Missing(err) => error_box(ui, err),
    }
}

fn stats_panel(ui: &mut Ui, status: &PanelStatus) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
            let mesh = &status.mesh;

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                stat_row(ui, "Vertices", fmt_num(mesh.vertex_count), ACCENT_TEAL);
                stat_row(ui, "Grid", format!("{} x {}", mesh.rows, mesh.columns), TEXT_PRIMARY);
                stat_row(ui, "Memory", format!("{:.1} MB", mesh.bytes as f64 / (1024.0 * 1024.0)), TEXT_PRIMARY);
                stat_row(ui, "Build ms", format!("{:.1}", mesh.build_ms), TEXT_PRIMARY);
                stat_row(ui, "Cache", format!("{} hit / {} miss ({} kept)", mesh.cache.hits, mesh.cache.misses, mesh.cached), TEXT_PRIMARY);
                stat_row(ui, "t", format!("{:.2}", status.interaction.light_angle), ACCENT_AMBER);
                stat_row(
                    ui,
                    "point",
                    format!("({:.2}, {:.2})", status.interaction.point.x, status.interaction.point.y),
                    ACCENT_AMBER,
                );
            });
        });
}

fn stat_row(ui: &mut Ui, label: &str, value: String, color: Color32) {
    ui.label(RichText::new(label).color(TEXT_MUTED));
    ui.label(RichText::new(value).color(color));
    ui.end_row();
}

pub fn draw_help_overlay(ctx: &Context) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("LMB+Drag - Rotate | Left/Right - Light").color(TEXT_MUTED));
                    ui.label(RichText::new("WASD - Move texture point").color(TEXT_MUTED));
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(12), "12");
        assert_eq!(fmt_num(396_270), "396.3K");
        assert_eq!(fmt_num(1_000_000), "1.00M");
    }
}
