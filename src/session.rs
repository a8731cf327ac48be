// ============================================================================
// SESSION
// ============================================================================
//
// Idle -> (load) -> Loaded -> (apply) -> Result -> (apply | load | save) ...
//
// Every operation reads the loaded source, never the previous result, so
// results do not compound. A failed load or operation leaves the session as
// it was.
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::DynamicImage;

use crate::error::{Error, Result};
use crate::io::{self, SaveFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loaded,
    Result,
}

pub struct Session<I> {
    source: Option<I>,
    result: Option<I>,
    origin: Option<PathBuf>,
    last_op: Option<String>,
}

impl<I> Default for Session<I> {
    fn default() -> Self {
        Self {
            source: None,
            result: None,
            origin: None,
            last_op: None,
        }
    }
}

impl<I> Session<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        match (&self.source, &self.result) {
            (None, _) => Stage::Idle,
            (Some(_), None) => Stage::Loaded,
            (Some(_), Some(_)) => Stage::Result,
        }
    }

    pub fn source(&self) -> Option<&I> {
        self.source.as_ref()
    }

    pub fn result(&self) -> Option<&I> {
        self.result.as_ref()
    }

    /// What the window shows: the latest result, else the source.
    pub fn current(&self) -> Option<&I> {
        self.result.as_ref().or(self.source.as_ref())
    }

    /// File the source was loaded from.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Name of the operation that produced the current result.
    pub fn last_op(&self) -> Option<&str> {
        self.last_op.as_deref()
    }

    /// Install a new source, dropping any previous result.
    pub fn set_source(&mut self, image: I, origin: Option<PathBuf>) {
        self.source = Some(image);
        self.result = None;
        self.last_op = None;
        self.origin = origin;
    }

    /// Load through `loader`; on failure the session is unchanged.
    pub fn load_with<F>(&mut self, path: &Path, loader: F) -> Result<&I>
    where
        F: FnOnce(&Path) -> Result<I>,
    {
        match loader(path) {
            Ok(image) => {
                crate::log_info!("Loaded {}", path.display());
                self.set_source(image, Some(path.to_path_buf()));
                self.source.as_ref().ok_or(Error::NoImage)
            }
            Err(e) => {
                crate::log_err!("{}", e);
                Err(e)
            }
        }
    }

    /// Run `op` on the source and keep its output as the result.
    pub fn apply<F>(&mut self, name: &str, op: F) -> Result<&I>
    where
        F: FnOnce(&I) -> Result<I>,
    {
        let Some(source) = self.source.as_ref() else {
            crate::log_warn!("{} requested with no image loaded", name);
            return Err(Error::NoImage);
        };
        let start = Instant::now();
        match op(source) {
            Ok(out) => {
                crate::log_info!("{} done in {:.1?}", name, start.elapsed());
                self.last_op = Some(name.to_string());
                Ok(&*self.result.insert(out))
            }
            Err(e) => {
                crate::log_err!("{} failed: {}", name, e);
                Err(e)
            }
        }
    }
}

impl<I> Session<I>
where
    I: Clone + Into<DynamicImage>,
{
    /// Write the result to `path`, format from its extension. The result is
    /// kept whether or not the write succeeds.
    pub fn save(&self, path: &Path, quality: u8) -> Result<SaveFormat> {
        if self.result.is_none() {
            crate::log_warn!("Save requested with no result");
            return Err(Error::NoResult);
        }
        let format = SaveFormat::from_path(path).inspect_err(|e| {
            crate::log_err!("{}", e);
        })?;
        self.save_as(path, format, quality)
    }

    /// Write the result to `path` in an explicit format.
    pub fn save_as(&self, path: &Path, format: SaveFormat, quality: u8) -> Result<SaveFormat> {
        let Some(result) = self.result.as_ref() else {
            crate::log_warn!("Save requested with no result");
            return Err(Error::NoResult);
        };
        match io::encode_and_write(&result.clone().into(), path, format, quality) {
            Ok(()) => {
                crate::log_info!("Saved {} as {}", path.display(), format.label());
                Ok(format)
            }
            Err(e) => {
                crate::log_err!("{}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gray(v: u8) -> GrayImage {
        GrayImage::from_pixel(3, 2, Luma([v]))
    }

    #[test]
    fn stages_follow_load_and_apply() {
        let mut s: Session<GrayImage> = Session::new();
        assert_eq!(s.stage(), Stage::Idle);
        assert!(s.current().is_none());

        s.set_source(gray(10), None);
        assert_eq!(s.stage(), Stage::Loaded);
        assert_eq!(s.current(), Some(&gray(10)));

        s.apply("inc", |img| Ok(GrayImage::from_fn(img.width(), img.height(), |x, y| {
            Luma([img.get_pixel(x, y)[0] + 1])
        })))
        .unwrap();
        assert_eq!(s.stage(), Stage::Result);
        assert_eq!(s.current(), Some(&gray(11)));
        assert_eq!(s.last_op(), Some("inc"));
    }

    #[test]
    fn operations_never_compound() {
        let mut s = Session::new();
        s.set_source(gray(10), None);
        let add = |img: &GrayImage| -> Result<GrayImage> {
            Ok(GrayImage::from_pixel(img.width(), img.height(), Luma([img.get_pixel(0, 0)[0] + 5])))
        };
        s.apply("add", add).unwrap();
        s.apply("add", add).unwrap();
        assert_eq!(s.result(), Some(&gray(15)));
        assert_eq!(s.source(), Some(&gray(10)));
    }

    #[test]
    fn apply_without_source_fails() {
        let mut s: Session<GrayImage> = Session::new();
        assert!(matches!(s.apply("noop", |i| Ok(i.clone())), Err(Error::NoImage)));
        assert_eq!(s.stage(), Stage::Idle);
    }

    #[test]
    fn failed_operation_keeps_previous_result() {
        let mut s = Session::new();
        s.set_source(gray(1), None);
        s.apply("first", |_| Ok(gray(2))).unwrap();
        let err = s.apply("bad", |_| Err(Error::invalid("gamma", "must be positive")));
        assert!(err.is_err());
        assert_eq!(s.result(), Some(&gray(2)));
        assert_eq!(s.last_op(), Some("first"));
    }

    #[test]
    fn failed_load_leaves_state_unchanged() {
        let mut s = Session::new();
        s.set_source(gray(1), Some(PathBuf::from("a.png")));
        s.apply("x", |_| Ok(gray(9))).unwrap();
        let err = s.load_with(Path::new("missing.png"), |_| Err(Error::NoImage));
        assert!(err.is_err());
        assert_eq!(s.stage(), Stage::Result);
        assert_eq!(s.origin(), Some(Path::new("a.png")));
    }

    #[test]
    fn new_load_clears_result() {
        let mut s = Session::new();
        s.set_source(gray(1), None);
        s.apply("x", |_| Ok(gray(9))).unwrap();
        s.load_with(Path::new("b.png"), |_| Ok(gray(4))).unwrap();
        assert_eq!(s.stage(), Stage::Loaded);
        assert!(s.result().is_none());
    }

    #[test]
    fn save_without_result_fails() {
        let mut s = Session::new();
        s.set_source(gray(1), None);
        assert!(matches!(s.save(Path::new("out.png"), 90), Err(Error::NoResult)));
    }

    #[test]
    fn unknown_extension_keeps_result() {
        let mut s = Session::new();
        s.set_source(gray(1), None);
        s.apply("x", |_| Ok(gray(3))).unwrap();
        assert!(matches!(
            s.save(Path::new("out.xyz"), 90),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(s.result(), Some(&gray(3)));
    }
}
