//! Image and icon sources injected into the deck builder.
//!
//! The builder never fetches anything itself. Image elements ask an
//! [`ImageProvider`] for a resource by keyword, icon elements ask an
//! [`IconProvider`] for SVG markup. Closures implement both traits, which is
//! convenient for tests and small tools:
//!
//! ```rust
//! use deckweave::deck::provider::{ImageProvider, ResourceHandle};
//!
//! let provider = |keyword: &str, _opacity: f64| {
//!     (keyword == "logo").then(|| ResourceHandle::Path("assets/logo.png".into()))
//! };
//! assert!(provider.fetch("logo", 1.0).is_some());
//! assert!(provider.fetch("sky", 1.0).is_none());
//! ```

use super::error::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// A fetched raster resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceHandle {
    /// Local file
    Path(PathBuf),
    /// Encoded image bytes
    Bytes(Vec<u8>),
}

impl ResourceHandle {
    /// Encoded image bytes of the resource.
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            ResourceHandle::Path(path) => Ok(std::fs::read(path)?),
            ResourceHandle::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Resolves an image keyword to a raster resource.
pub trait ImageProvider {
    /// `opacity` is the element's requested opacity (`1.0` when none); a
    /// provider may bake it into the raster.
    fn fetch(&self, keyword: &str, opacity: f64) -> Option<ResourceHandle>;
}

impl<F> ImageProvider for F
where
    F: Fn(&str, f64) -> Option<ResourceHandle>,
{
    fn fetch(&self, keyword: &str, opacity: f64) -> Option<ResourceHandle> {
        self(keyword, opacity)
    }
}

/// Resolves an icon keyword to SVG markup.
pub trait IconProvider {
    fn fetch_svg(&self, keyword: &str) -> Option<String>;
}

impl<F> IconProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn fetch_svg(&self, keyword: &str) -> Option<String> {
        self(keyword)
    }
}

/// Provider with no resources; every image and icon element is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ImageProvider for NoResources {
    fn fetch(&self, _keyword: &str, _opacity: f64) -> Option<ResourceHandle> {
        None
    }
}

impl IconProvider for NoResources {
    fn fetch_svg(&self, _keyword: &str) -> Option<String> {
        None
    }
}

/// Lowercase keyword with runs of other characters collapsed to `-`.
///
/// `"Robot Hand / Human"` becomes `robot-hand-human`.
pub fn keyword_slug(keyword: &str) -> String {
    let mut slug = String::with_capacity(keyword.len());
    for c in keyword.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Images stored as `<root>/<slug>.<png|jpg|jpeg|gif|bmp>`.
#[derive(Debug, Clone)]
pub struct DirectoryImageProvider {
    root: PathBuf,
}

impl DirectoryImageProvider {
    const EXTENSIONS: [&'static str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ImageProvider for DirectoryImageProvider {
    fn fetch(&self, keyword: &str, _opacity: f64) -> Option<ResourceHandle> {
        let slug = keyword_slug(keyword);
        if slug.is_empty() {
            return None;
        }
        let found = Self::EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file());
        if found.is_none() {
            debug!("No image for '{}' under {}", keyword, self.root.display());
        }
        found.map(ResourceHandle::Path)
    }
}

/// Icons stored as `<root>/<slug>.svg`.
#[derive(Debug, Clone)]
pub struct FsIconLibrary {
    root: PathBuf,
}

impl FsIconLibrary {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl IconProvider for FsIconLibrary {
    fn fetch_svg(&self, keyword: &str) -> Option<String> {
        let slug = keyword_slug(keyword);
        if slug.is_empty() {
            return None;
        }
        let path = self.root.join(format!("{}.svg", slug));
        match std::fs::read_to_string(&path) {
            Ok(svg) => Some(svg),
            Err(e) => {
                debug!("No icon for '{}' at {}: {}", keyword, path.display(), e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_slug() {
        assert_eq!(keyword_slug("Robot Hand / Human"), "robot-hand-human");
        assert_eq!(keyword_slug("  --  "), "");
        assert_eq!(keyword_slug("rocket"), "rocket");
    }

    #[test]
    fn test_directory_providers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("city-skyline.jpg"), b"\xFF\xD8\xFF").unwrap();
        std::fs::write(dir.path().join("rocket.svg"), "<svg/>").unwrap();

        let images = DirectoryImageProvider::new(dir.path());
        let handle = images.fetch("City Skyline", 1.0).unwrap();
        assert_eq!(handle.load().unwrap(), b"\xFF\xD8\xFF");
        assert!(images.fetch("ocean", 1.0).is_none());

        let icons = FsIconLibrary::new(dir.path());
        assert_eq!(icons.fetch_svg("Rocket").as_deref(), Some("<svg/>"));
        assert!(icons.fetch_svg("anchor").is_none());
        assert!(NoResources.fetch_svg("rocket").is_none());
    }
}
