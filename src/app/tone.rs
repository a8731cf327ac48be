// ============================================================================
// TONELAB WINDOW: grayscale point and frequency filters
// ============================================================================

use eframe::egui;
use image::GrayImage;

use super::{Notices, PREVIEW_SIZE, Preview, color_image};
use crate::commands::{ToneOp, ToneSettings};
use crate::components::dialogs::{Notice, muted};
use crate::io::{self, FileHandler};
use crate::ops;
use crate::session::{Session, Stage};

/// Operation buttons per row of the grid.
const OPS_PER_ROW: usize = 3;

enum Action {
    Load,
    Run(ToneOp),
    Save,
    ResetSettings,
}

pub struct ToneApp {
    session: Session<GrayImage>,
    settings: ToneSettings,
    files: FileHandler,
    preview: Preview,
    notices: Notices,
    status: String,
}

impl ToneApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: Session::new(),
            settings: ToneSettings::default(),
            files: FileHandler::new(),
            preview: Preview::new("tonelab_preview"),
            notices: Notices::default(),
            status: "Load an image to begin.".to_string(),
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        match self.session.current() {
            Some(img) => self
                .preview
                .set(ctx, color_image(img, Some((PREVIEW_SIZE, PREVIEW_SIZE)))),
            None => self.preview.clear(),
        }
    }

    fn load(&mut self, ctx: &egui::Context) {
        let Some(path) = self.files.pick_image() else {
            return;
        };
        match self.session.load_with(&path, io::load_gray) {
            Ok(img) => {
                let hist = ops::histogram(img);
                let used = hist.iter().filter(|&&n| n > 0).count();
                self.status = format!(
                    "{} ({}x{}, {} grey levels)",
                    path.display(),
                    img.width(),
                    img.height(),
                    used
                );
                self.refresh_preview(ctx);
            }
            Err(e) => self.notices.push_error(&e),
        }
    }

    fn run(&mut self, op: ToneOp, ctx: &egui::Context) {
        let settings = self.settings;
        match self.session.apply(op.label(), |img| op.apply(img, &settings)) {
            Ok(_) => {
                self.status = format!("Showing: {}", op.label());
                self.refresh_preview(ctx);
            }
            Err(e) => self.notices.push_error(&e),
        }
    }

    fn save(&mut self) {
        if self.session.stage() != Stage::Result {
            self.notices.push_error(&crate::Error::NoResult);
            return;
        }
        let Some(path) = self.files.pick_save_path("result.jpg") else {
            return;
        };
        match self.session.save(&path, self.files.quality) {
            Ok(_) => self
                .notices
                .push(Notice::info("Saved", format!("Image saved to {}", path.display()))),
            Err(e) => self.notices.push_error(&e),
        }
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        ui.heading("Settings");
        ui.add_space(4.0);
        egui::Grid::new("tone_settings")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Gamma");
                ui.add(
                    egui::DragValue::new(&mut self.settings.gamma)
                        .speed(0.01)
                        .clamp_range(0.01..=10.0)
                        .max_decimals(2),
                );
                ui.end_row();

                ui.label("Cutoff D0");
                ui.add(
                    egui::DragValue::new(&mut self.settings.butterworth.cutoff)
                        .speed(0.5)
                        .clamp_range(0.5..=2048.0)
                        .max_decimals(1),
                );
                ui.end_row();

                ui.label("Order n");
                ui.add(egui::DragValue::new(&mut self.settings.butterworth.order).clamp_range(1..=10));
                ui.end_row();
            });
        ui.add_space(6.0);
        if ui.button("Defaults").clicked() {
            action = Some(Action::ResetSettings);
        }
        action
    }

    fn operations_grid(&self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        egui::Grid::new("tone_ops")
            .num_columns(OPS_PER_ROW)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for (i, op) in ToneOp::all().iter().enumerate() {
                    let btn = egui::Button::new(op.label()).min_size(egui::vec2(170.0, 26.0));
                    if ui.add(btn).clicked() {
                        action = Some(Action::Run(*op));
                    }
                    if (i + 1) % OPS_PER_ROW == 0 {
                        ui.end_row();
                    }
                }
            });
        action
    }
}

impl eframe::App for ToneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let locked = self.notices.is_open();
        let mut action = None;

        egui::TopBottomPanel::top("tone_toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!locked, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Load Image").clicked() {
                        action = Some(Action::Load);
                    }
                    if ui.button("Save Result").clicked() {
                        action = Some(Action::Save);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("tone_status").show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.status).color(muted(ctx)));
        });

        egui::SidePanel::left("tone_settings_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!locked, |ui| {
                    if let Some(a) = self.settings_panel(ui) {
                        action = Some(a);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!locked, |ui| {
                if let Some(a) = self.operations_grid(ui) {
                    action = Some(a);
                }
            });
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                let side = PREVIEW_SIZE as f32;
                self.preview.show(ui, egui::vec2(side, side));
            });
        });

        match action {
            Some(Action::Load) => self.load(ctx),
            Some(Action::Run(op)) => self.run(op, ctx),
            Some(Action::Save) => self.save(),
            Some(Action::ResetSettings) => self.settings = ToneSettings::default(),
            None => {}
        }

        self.notices.show(ctx);
    }
}
