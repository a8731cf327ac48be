// ============================================================================
// WARPLAB WINDOW: colour geometric transforms
// ============================================================================

use std::path::Path;

use eframe::egui;
use image::RgbImage;

use super::{Notices, Preview, VIEW_MAX, color_image, fit_within};
use crate::commands::{Warp, WarpKind, WarpOptions};
use crate::components::dialogs::{DialogResult, Notice, NumericPrompt, muted};
use crate::io::{self, FileHandler, SAMPLE_IMAGES};
use crate::ops::Interpolation;
use crate::session::{Session, Stage};

enum Action {
    Load,
    OpenPrompt,
    Save,
}

pub struct WarpApp {
    session: Session<RgbImage>,
    sample: usize,
    kind: WarpKind,
    options: WarpOptions,
    prompt: Option<NumericPrompt>,
    files: FileHandler,
    preview: Preview,
    notices: Notices,
    status: String,
}

impl WarpApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: Session::new(),
            sample: 0,
            kind: WarpKind::default(),
            options: WarpOptions::default(),
            prompt: None,
            files: FileHandler::new(),
            preview: Preview::new("warplab_view"),
            notices: Notices::default(),
            status: "Pick a sample and press Load.".to_string(),
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        match self.session.current() {
            Some(img) => {
                let size = fit_within(img.width(), img.height(), VIEW_MAX.0, VIEW_MAX.1);
                self.preview.set(ctx, color_image(img, Some(size)));
            }
            None => self.preview.clear(),
        }
    }

    fn load(&mut self, ctx: &egui::Context) {
        let Some(name) = SAMPLE_IMAGES.get(self.sample) else {
            return;
        };
        match self.session.load_with(Path::new(name), io::load_rgb) {
            Ok(img) => {
                self.status = format!("{} ({}x{})", name, img.width(), img.height());
                self.refresh_preview(ctx);
                self.notices.push(loaded_notice(name));
            }
            Err(e) => self.notices.push_error(&e),
        }
    }

    fn open_prompt(&mut self) {
        if self.session.stage() == Stage::Idle {
            self.notices.push_error(&crate::Error::NoImage);
            return;
        }
        self.prompt = Some(NumericPrompt::new(self.kind));
    }

    fn run(&mut self, warp: Warp, ctx: &egui::Context) {
        let opts = self.options;
        match self.session.apply(&warp.describe(), |img| warp.apply(img, &opts)) {
            Ok(img) => {
                self.status = format!("{} -> {}x{}", warp.describe(), img.width(), img.height());
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

    fn controls(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        egui::Grid::new("warp_controls")
            .num_columns(3)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Image");
                egui::ComboBox::from_id_source("warp_sample")
                    .selected_text(SAMPLE_IMAGES.get(self.sample).copied().unwrap_or(""))
                    .show_ui(ui, |ui| {
                        for (i, name) in SAMPLE_IMAGES.iter().enumerate() {
                            ui.selectable_value(&mut self.sample, i, *name);
                        }
                    });
                if ui.button("Load").clicked() {
                    action = Some(Action::Load);
                }
                ui.end_row();

                ui.label("Transform");
                egui::ComboBox::from_id_source("warp_kind")
                    .selected_text(self.kind.label())
                    .show_ui(ui, |ui| {
                        for kind in WarpKind::all() {
                            ui.selectable_value(&mut self.kind, *kind, kind.label());
                        }
                    });
                if ui.button("Apply").clicked() {
                    action = Some(Action::OpenPrompt);
                }
                ui.end_row();

                ui.label("Interpolation");
                egui::ComboBox::from_id_source("warp_interp")
                    .selected_text(self.options.interpolation.label())
                    .show_ui(ui, |ui| {
                        for interp in Interpolation::all() {
                            ui.selectable_value(&mut self.options.interpolation, *interp, interp.label());
                        }
                    });
                if ui.button("Save Image").clicked() {
                    action = Some(Action::Save);
                }
                ui.end_row();
            });
        action
    }
}

fn loaded_notice(name: &str) -> Notice {
    Notice::info("Loaded", format!("Loaded: {name}"))
}

impl eframe::App for WarpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let locked = self.prompt.is_some() || self.notices.is_open();
        let mut action = None;

        egui::TopBottomPanel::top("warp_controls_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.add_enabled_ui(!locked, |ui| {
                action = self.controls(ui);
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("warp_status").show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.status).color(muted(ctx)));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let placeholder = egui::vec2(VIEW_MAX.0 as f32 / 2.0, VIEW_MAX.1 as f32 / 2.0);
                self.preview.show(ui, placeholder);
            });
        });

        match action {
            Some(Action::Load) => self.load(ctx),
            Some(Action::OpenPrompt) => self.open_prompt(),
            Some(Action::Save) => self.save(),
            None => {}
        }

        if let Some(prompt) = &mut self.prompt {
            match prompt.show(ctx) {
                DialogResult::Open => {}
                DialogResult::Ok(warp) => {
                    self.prompt = None;
                    self.run(warp, ctx);
                }
                DialogResult::Cancel => {
                    crate::log_info!("{} cancelled", prompt.kind().label());
                    self.prompt = None;
                }
            }
        }

        self.notices.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::dialogs::NoticeLevel;

    #[test]
    fn successful_load_is_announced() {
        let n = loaded_notice("kiwi.jpg");
        assert_eq!(n.level, NoticeLevel::Info);
        assert_eq!(n.title, "Loaded");
        assert_eq!(n.message, "Loaded: kiwi.jpg");
    }
}
