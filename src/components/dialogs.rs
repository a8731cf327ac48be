// ============================================================================
// DIALOGS: numeric prompt and notice windows shared by both programs
// ============================================================================

use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Vec2};

use crate::commands::{Warp, WarpKind};
use crate::error::Error;

/// Result returned by each dialog's `show()` method every frame.
pub enum DialogResult<T> {
    /// Dialog is still open, no action needed this frame.
    Open,
    /// User clicked OK and the input parsed - contains the final values.
    Ok(T),
    /// User clicked Cancel.
    Cancel,
}

// ============================================================================
// SHARED DIALOG STYLING HELPERS
// ============================================================================

/// Colors extracted from the current egui visuals for dialog rendering.
pub(crate) struct DialogColors {
    pub accent: Color32,
    pub accent_faint: Color32,
    pub text_muted: Color32,
    pub error: Color32,
    pub warning: Color32,
}

impl DialogColors {
    pub(crate) fn from_ctx(ctx: &egui::Context) -> Self {
        let v = ctx.style().visuals.clone();
        let accent = v.selection.stroke.color;
        let alpha = if v.dark_mode { 35 } else { 25 };
        let text_muted = if v.dark_mode {
            Color32::from_gray(160)
        } else {
            v.weak_text_color()
        };
        Self {
            accent,
            accent_faint: Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), alpha),
            text_muted,
            error: v.error_fg_color,
            warning: v.warn_fg_color,
        }
    }
}

/// Paint the accent header bar with a title.
pub(crate) fn paint_dialog_header(ui: &mut egui::Ui, colors: &DialogColors, accent: Color32, title: &str) {
    let available_width = ui.available_width();
    let header_height = 28.0;
    let (rect, _) = ui.allocate_exact_size(Vec2::new(available_width, header_height), Sense::hover());

    let painter = ui.painter();
    painter.rect_filled(rect, Rounding::ZERO, colors.accent_faint);
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(3.0, header_height)),
        Rounding::ZERO,
        accent,
    );
    painter.text(
        Pos2::new(rect.min.x + 12.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        title,
        egui::FontId::proportional(14.0),
        accent,
    );
}

/// Thin separator line using the faint accent color.
pub(crate) fn accent_separator(ui: &mut egui::Ui, colors: &DialogColors) {
    let available_width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(available_width, 1.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, colors.accent_faint);
}

/// Styled OK / Cancel footer. Returns (ok, cancel).
pub(crate) fn dialog_footer(ui: &mut egui::Ui, colors: &DialogColors) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.add_space(4.0);
    accent_separator(ui, colors);
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Cancel").clicked() {
                cancel = true;
            }
            let ok_btn = egui::Button::new(egui::RichText::new("  OK  ").color(Color32::WHITE).strong())
                .fill(colors.accent);
            if ui.add(ok_btn).clicked() {
                ok = true;
            }
        });
    });
    (ok, cancel)
}

fn centered_window(id: &str) -> egui::Window<'static> {
    egui::Window::new(id.to_string())
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

// ============================================================================
// NUMERIC PROMPT
// ============================================================================

pub struct NumericPrompt {
    kind: WarpKind,
    inputs: Vec<String>,
    expand: bool,
    error: Option<String>,
}

impl NumericPrompt {
    pub fn new(kind: WarpKind) -> Self {
        Self {
            kind,
            inputs: kind.fields().iter().map(|f| f.default.to_string()).collect(),
            expand: false,
            error: None,
        }
    }

    pub fn kind(&self) -> WarpKind {
        self.kind
    }

    /// Parse the current text. On failure the message is kept for display
    /// and the prompt stays open.
    fn submit(&mut self) -> Option<Warp> {
        let texts: Vec<&str> = self.inputs.iter().map(String::as_str).collect();
        match self.kind.build(&texts, self.expand) {
            Ok(warp) => {
                self.error = None;
                Some(warp)
            }
            Err(e) => {
                crate::log_warn!("{} prompt rejected: {}", self.kind.label(), e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<Warp> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);

        centered_window("dialog_numeric_prompt").show(ctx, |ui| {
            ui.set_min_width(300.0);
            paint_dialog_header(ui, &colors, colors.accent, self.kind.label());
            ui.add_space(6.0);

            let mut enter = false;
            egui::Grid::new("prompt_fields")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    for (field, text) in self.kind.fields().iter().zip(self.inputs.iter_mut()) {
                        ui.label(field.prompt);
                        let r = ui.add(egui::TextEdit::singleline(text).desired_width(120.0));
                        if r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            enter = true;
                        }
                        ui.end_row();
                    }
                    if self.kind.asks_expand() {
                        ui.label("");
                        ui.checkbox(&mut self.expand, "Expand canvas");
                        ui.end_row();
                    }
                });

            if let Some(err) = &self.error {
                ui.add_space(4.0);
                ui.colored_label(colors.error, err);
            }

            let (ok, cancel) = dialog_footer(ui, &colors);
            if (ok || enter)
                && let Some(warp) = self.submit()
            {
                result = DialogResult::Ok(warp);
            }
            if cancel || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                result = DialogResult::Cancel;
            }
        });

        result
    }
}

// ============================================================================
// NOTICES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Missing image/result are warnings; everything else is an error.
    pub fn from_error(err: &Error) -> Self {
        let level = match err {
            Error::NoImage | Error::NoResult => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        };
        Self {
            level,
            title: err.title().to_string(),
            message: err.to_string(),
        }
    }

    /// Draw the notice. Returns `true` once the user dismisses it.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let colors = DialogColors::from_ctx(ctx);
        let accent = match self.level {
            NoticeLevel::Info => colors.accent,
            NoticeLevel::Warning => colors.warning,
            NoticeLevel::Error => colors.error,
        };
        let mut dismissed = false;

        centered_window("dialog_notice").show(ctx, |ui| {
            ui.set_min_width(280.0);
            paint_dialog_header(ui, &colors, accent, &self.title);
            ui.add_space(6.0);
            ui.label(&self.message);
            ui.add_space(4.0);
            accent_separator(ui, &colors);
            ui.add_space(6.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("  OK  ").clicked() {
                    dismissed = true;
                }
            });
            if ui.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
                dismissed = true;
            }
        });

        dismissed
    }
}

/// Label color for status lines.
pub(crate) fn muted(ctx: &egui::Context) -> Color32 {
    DialogColors::from_ctx(ctx).text_muted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_starts_with_defaults() {
        let p = NumericPrompt::new(WarpKind::Translate);
        assert_eq!(p.inputs, vec!["30".to_string(), "30".to_string()]);
        assert_eq!(p.kind(), WarpKind::Translate);
    }

    #[test]
    fn bad_input_keeps_prompt_open_with_message() {
        let mut p = NumericPrompt::new(WarpKind::Zoom);
        p.inputs[0] = "big".to_string();
        assert!(p.submit().is_none());
        assert!(p.error.as_deref().is_some_and(|m| m.contains("factor")));

        p.inputs[0] = "2".to_string();
        assert_eq!(p.submit(), Some(Warp::Zoom { factor: 2.0 }));
        assert!(p.error.is_none());
    }

    #[test]
    fn rotate_prompt_carries_expand() {
        let mut p = NumericPrompt::new(WarpKind::Rotate);
        p.expand = true;
        assert_eq!(p.submit(), Some(Warp::Rotate { angle: 45.0, expand: true }));
    }

    #[test]
    fn notice_levels_follow_error_kind() {
        assert_eq!(Notice::from_error(&Error::NoImage).level, NoticeLevel::Warning);
        let n = Notice::from_error(&Error::UnsupportedFormat("xyz".into()));
        assert_eq!(n.level, NoticeLevel::Error);
        assert_eq!(n.title, "Save failed");
        assert!(n.message.contains("xyz"));
    }
}
