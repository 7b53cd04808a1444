//! Resolution of illustration files.
//!
//! Images are looked up by their path relative to the book's image directory
//! and read into memory so the compiler can embed them. A missing image never
//! stops a build: the resolver logs a warning and the figure that wanted it is
//! simply left out of the chapter.

use std::path::{Path, PathBuf};

/// Directory inside the EPUB that embedded images are stored under.
pub const IMAGE_DIR: &str = "images";

/// An image that exists on disk and has been read successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Where the image was read from
    pub path: PathBuf,
    /// Location of the image inside the book, relative to the content documents
    pub href: String,
    pub media_type: &'static str,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    dir: PathBuf,
}

impl ImageResolver {
    pub fn new<P: Into<PathBuf>>(dir: P) -> ImageResolver {
        ImageResolver { dir: dir.into() }
    }

    /// Look up `key` in the image directory.
    ///
    /// Returns `None` (after logging a warning naming the key) when the file is
    /// missing, is not a regular file, or can't be read.
    pub fn resolve(&self, key: &str) -> Option<ImageRef> {
        let path = self.dir.join(key);
        if !path.is_file() {
            log::warn!("Image not found: {key} (looked in {})", self.dir.display());
            return None;
        }

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Image could not be read: {key} ({e})");
                return None;
            }
        };

        log::debug!("Resolved image {key} ({} bytes)", data.len());
        Some(ImageRef {
            href: href_for(key),
            media_type: mime_from_path(&path),
            path,
            data,
        })
    }
}

/// `maps/route.png` and `maps\route.png` both live at `images/maps/route.png`.
fn href_for(key: &str) -> String {
    let parts = key
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect::<Vec<_>>();
    format!("{IMAGE_DIR}/{}", parts.join("/"))
}

/// Determine MIME type from file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolving_an_existing_image_twice_gives_the_same_reference() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(dir.path().join("lab.jpg"), b"jpeg bytes").unwrap();

        let resolver = ImageResolver::new(dir.path());
        let first = resolver.resolve("lab.jpg").expect("image exists");
        let second = resolver.resolve("lab.jpg").expect("image exists");

        assert_eq!(first, second);
        assert_eq!(first.href, "images/lab.jpg");
        assert_eq!(first.media_type, "image/jpeg");
        assert_eq!(first.data, b"jpeg bytes");
    }

    #[test]
    fn missing_images_resolve_to_nothing_with_a_warning() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let resolver = ImageResolver::new(dir.path());

        let warnings = capture::warnings(|| {
            assert!(resolver.resolve("nope.png").is_none());
            assert!(resolver.resolve("nope.png").is_none());
        });
        assert_eq!(
            warnings.iter().filter(|w| w.contains("nope.png")).count(),
            2,
            "warnings: {warnings:?}"
        );
    }

    #[test]
    fn directories_are_not_images() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let resolver = ImageResolver::new(dir.path());
        assert!(resolver.resolve("sub").is_none());
    }

    #[test]
    fn nested_keys_keep_their_folders_in_the_href() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(dir.path().join("maps").join("route.PNG"), b"png").unwrap();

        let image = ImageResolver::new(dir.path())
            .resolve("maps/route.PNG")
            .expect("image exists");
        assert_eq!(image.href, "images/maps/route.PNG");
        assert_eq!(image.media_type, "image/png");
    }

    #[test]
    fn same_file_names_in_different_folders_stay_apart() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        for (folder, data) in [("maps", "map bytes"), ("photos", "photo data")] {
            std::fs::create_dir(dir.path().join(folder)).unwrap();
            std::fs::write(dir.path().join(folder).join("a.png"), data).unwrap();
        }

        let resolver = ImageResolver::new(dir.path());
        let map = resolver.resolve("maps/a.png").expect("map exists");
        let photo = resolver.resolve("photos/a.png").expect("photo exists");
        assert_eq!(map.href, "images/maps/a.png");
        assert_eq!(photo.href, "images/photos/a.png");
        assert_eq!(photo.data, b"photo data");
    }

    #[test]
    fn hrefs_are_normalised() {
        assert_eq!(href_for("./maps//a.png"), "images/maps/a.png");
        assert_eq!(href_for("maps\\a.png"), "images/maps/a.png");
        assert_eq!(href_for("../a.png"), "images/a.png");
    }

    /// Collects `warn` records logged on the current thread while `f` runs.
    mod capture {
        use log::{Level, LevelFilter, Log, Metadata, Record};
        use std::cell::RefCell;
        use std::sync::Once;

        thread_local! {
            static WARNINGS: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
        }

        struct Capture;

        impl Log for Capture {
            fn enabled(&self, metadata: &Metadata) -> bool {
                metadata.level() <= Level::Warn
            }

            fn log(&self, record: &Record) {
                if self.enabled(record.metadata()) {
                    WARNINGS.with(|w| {
                        if let Some(warnings) = w.borrow_mut().as_mut() {
                            warnings.push(record.args().to_string());
                        }
                    });
                }
            }

            fn flush(&self) {}
        }

        static CAPTURE: Capture = Capture;
        static INSTALL: Once = Once::new();

        pub fn warnings<F: FnOnce()>(f: F) -> Vec<String> {
            INSTALL.call_once(|| {
                log::set_logger(&CAPTURE).expect("no other logger is installed in tests");
                log::set_max_level(LevelFilter::Warn);
            });
            WARNINGS.with(|w| *w.borrow_mut() = Some(Vec::new()));
            f();
            WARNINGS.with(|w| w.borrow_mut().take().unwrap_or_default())
        }
    }
}
