use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tga::TgaEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ColorType, DynamicImage, GrayImage, ImageEncoder, ImageError, RgbImage};
use rfd::FileDialog;

use crate::error::{Error, Result};

/// Extensions offered by the Open dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tga", "tif", "tiff", "webp", "ico",
];

/// Sample images warplab offers in its picker, resolved against the working directory.
pub const SAMPLE_IMAGES: &[&str] = &["kiwi.jpg", "papaya.jpg", "mountain.jpg"];

/// Extension appended when a save path has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

pub const DEFAULT_QUALITY: u8 = 90;

// ============================================================================
// LOADING
// ============================================================================

pub fn load_dynamic(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode any supported file into one 8-bit luminance channel.
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    load_dynamic(path).map(|img| img.to_luma8())
}

/// Decode any supported file into three 8-bit colour channels.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    load_dynamic(path).map(|img| img.to_rgb8())
}

// ============================================================================
// SAVE FORMATS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum SaveFormat {
    Png,
    #[default]
    #[value(alias = "jpg")]
    Jpeg,
    Bmp,
    Tga,
    #[value(alias = "tif")]
    Tiff,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Bmp => "bmp",
            SaveFormat::Tga => "tga",
            SaveFormat::Tiff => "tiff",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaveFormat::Png => "PNG",
            SaveFormat::Jpeg => "JPEG",
            SaveFormat::Bmp => "BMP",
            SaveFormat::Tga => "TGA",
            SaveFormat::Tiff => "TIFF",
        }
    }

    pub fn all() -> &'static [SaveFormat] {
        &[
            SaveFormat::Jpeg,
            SaveFormat::Png,
            SaveFormat::Bmp,
            SaveFormat::Tga,
            SaveFormat::Tiff,
        ]
    }

    /// Infer the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<SaveFormat> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(SaveFormat::Png),
            "jpg" | "jpeg" => Ok(SaveFormat::Jpeg),
            "bmp" => Ok(SaveFormat::Bmp),
            "tga" => Ok(SaveFormat::Tga),
            "tif" | "tiff" => Ok(SaveFormat::Tiff),
            "" => Err(Error::UnsupportedFormat("(no extension)".to_string())),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `path` unchanged, or with `.jpg` appended when it has no extension.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

// ============================================================================
// SAVING
// ============================================================================

/// Raw samples handed to an encoder: grayscale stays one channel, anything
/// else is written as RGB.
fn encoder_samples(image: &DynamicImage) -> (Cow<'_, [u8]>, ColorType) {
    match image {
        DynamicImage::ImageLuma8(gray) => (Cow::Borrowed(gray.as_raw().as_slice()), ColorType::L8),
        DynamicImage::ImageRgb8(rgb) => (Cow::Borrowed(rgb.as_raw().as_slice()), ColorType::Rgb8),
        other => (Cow::Owned(other.to_rgb8().into_raw()), ColorType::Rgb8),
    }
}

/// Encode and write an image to a file in the given format.
pub fn encode_and_write(
    image: &DynamicImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> Result<()> {
    write_encoded(image, path, format, quality).map_err(|source| Error::Save {
        path: path.to_path_buf(),
        source,
    })
}

fn write_encoded(
    image: &DynamicImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> std::result::Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let (samples, color) = encoder_samples(image);
    let (w, h) = (image.width(), image.height());

    match format {
        SaveFormat::Png => {
            PngEncoder::new(&mut writer).write_image(&samples, w, h, color)?;
        }
        SaveFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
            encoder.encode(&samples, w, h, color)?;
        }
        SaveFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut writer);
            encoder.encode(&samples, w, h, color)?;
        }
        SaveFormat::Tga => {
            TgaEncoder::new(&mut writer).encode(&samples, w, h, color)?;
        }
        SaveFormat::Tiff => {
            TiffEncoder::new(&mut writer).encode(&samples, w, h, color)?;
        }
    }

    writer.flush()?;
    Ok(())
}

// ============================================================================
// FILE HANDLER
// ============================================================================

/// Native Open/Save dialogs, remembering the last directory used.
pub struct FileHandler {
    pub last_dir: Option<PathBuf>,
    pub quality: u8,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            last_dir: None,
            quality: DEFAULT_QUALITY,
        }
    }

    fn remember(&mut self, path: &Path) {
        self.last_dir = path.parent().map(Path::to_path_buf);
    }

    fn dialog(&self) -> FileDialog {
        let dialog = FileDialog::new();
        match &self.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    /// Show the Open dialog for an image file.
    pub fn pick_image(&mut self) -> Option<PathBuf> {
        let path = self
            .dialog()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()?;
        self.remember(&path);
        Some(path)
    }

    /// Show the Save dialog; a name without extension gets `.jpg`.
    pub fn pick_save_path(&mut self, default_name: &str) -> Option<PathBuf> {
        let mut dialog = self.dialog().set_file_name(default_name);
        for format in SaveFormat::all() {
            dialog = dialog.add_filter(format.label(), &[format.extension()]);
        }
        let path = with_default_extension(dialog.save_file()?);
        self.remember(&path);
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SaveFormat::from_path(Path::new("a.PNG")).unwrap(), SaveFormat::Png);
        assert_eq!(SaveFormat::from_path(Path::new("a.jpeg")).unwrap(), SaveFormat::Jpeg);
        assert_eq!(SaveFormat::from_path(Path::new("dir/a.tif")).unwrap(), SaveFormat::Tiff);
        assert!(matches!(
            SaveFormat::from_path(Path::new("a.xyz")),
            Err(Error::UnsupportedFormat(ext)) if ext == "xyz"
        ));
        assert!(SaveFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn missing_extension_becomes_jpg() {
        assert_eq!(with_default_extension(PathBuf::from("out")), PathBuf::from("out.jpg"));
        assert_eq!(with_default_extension(PathBuf::from("out.png")), PathBuf::from("out.png"));
    }

    #[test]
    fn grayscale_stays_single_channel() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([7])));
        let (samples, color) = encoder_samples(&gray);
        assert_eq!(color, ColorType::L8);
        assert_eq!(samples.len(), 4);

        let rgba = DynamicImage::new_rgba8(2, 2);
        let (samples, color) = encoder_samples(&rgba);
        assert_eq!(color, ColorType::Rgb8);
        assert_eq!(samples.len(), 12);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_gray(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
