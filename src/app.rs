//! Window front ends. Each program is one `eframe::App` wrapping a
//! [`Session`](crate::session::Session); every button runs synchronously on
//! the UI thread and reports failures through a notice window.

pub mod tone;
pub mod warp;

use eframe::egui;
use egui::{ColorImage, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;
use image::imageops::FilterType;

pub use tone::ToneApp;
pub use warp::WarpApp;

use crate::components::dialogs::Notice;
use crate::error::Error;

/// Side of the square tonelab preview.
pub const PREVIEW_SIZE: u32 = 256;

/// Largest area warplab uses to show an image.
pub const VIEW_MAX: (u32, u32) = (720, 540);

/// Largest `(w, h)` with the aspect of `width x height` that fits in the box.
/// Images already inside the box keep their size.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_w && height <= max_h) {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Convert for display, optionally resampled to `size`.
pub fn color_image<I>(image: &I, size: Option<(u32, u32)>) -> ColorImage
where
    I: Clone + Into<DynamicImage>,
{
    let mut rgba = image.clone().into().to_rgba8();
    if let Some((w, h)) = size
        && (w, h) != rgba.dimensions()
        && w > 0
        && h > 0
    {
        rgba = image::imageops::resize(&rgba, w, h, FilterType::Triangle);
    }
    let dims = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(dims, rgba.as_raw())
}

/// Cached texture of whatever the window currently shows.
pub struct Preview {
    name: &'static str,
    texture: Option<TextureHandle>,
}

impl Preview {
    pub fn new(name: &'static str) -> Self {
        Self { name, texture: None }
    }

    pub fn set(&mut self, ctx: &egui::Context, image: ColorImage) {
        self.texture = Some(ctx.load_texture(self.name, image, TextureOptions::LINEAR));
    }

    pub fn clear(&mut self) {
        self.texture = None;
    }

    /// Draw at the texture's own size, or an empty frame of `placeholder` size.
    pub fn show(&self, ui: &mut egui::Ui, placeholder: Vec2) {
        match &self.texture {
            Some(texture) => {
                let sized = egui::load::SizedTexture::from_handle(texture);
                ui.add(egui::Image::from_texture(sized));
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(placeholder, egui::Sense::hover());
                ui.painter()
                    .rect_stroke(rect, 4.0, ui.visuals().widgets.noninteractive.bg_stroke);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image",
                    egui::FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
            }
        }
    }
}

/// Pending notice plus the UI lock it implies.
#[derive(Default)]
pub struct Notices {
    current: Option<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    pub fn push_error(&mut self, err: &Error) {
        self.push(Notice::from_error(err));
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if let Some(notice) = &self.current
            && notice.show(ctx)
        {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn fit_keeps_aspect() {
        assert_eq!(fit_within(1440, 1080, 720, 540), (720, 540));
        assert_eq!(fit_within(2000, 500, 720, 540), (720, 180));
        assert_eq!(fit_within(300, 200, 720, 540), (300, 200));
        assert_eq!(fit_within(0, 10, 720, 540), (0, 10));
    }

    #[test]
    fn preview_is_resampled_to_the_requested_square() {
        let img = GrayImage::from_pixel(40, 30, Luma([90]));
        let c = color_image(&img, Some((PREVIEW_SIZE, PREVIEW_SIZE)));
        assert_eq!(c.size, [256, 256]);
        assert!(c.pixels.iter().all(|p| p.r() == 90 && p.g() == 90 && p.a() == 255));
    }

    #[test]
    fn colour_images_keep_their_channels() {
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let c = color_image(&img, None);
        assert_eq!(c.size, [3, 2]);
        assert_eq!((c.pixels[0].r(), c.pixels[0].g(), c.pixels[0].b()), (10, 20, 30));
    }
}
