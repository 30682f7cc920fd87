use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use spdlog::{debug, warn};

use crate::export::ImageFormat;

/// Extensions written as-is, everything else becomes `.eps`.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".png", ".svg", ".pdf", ".eps"];
pub const DEFAULT_EXTENSION: &str = ".eps";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputPath {
    pub dir: PathBuf,
    pub stem: OsString,
    /// with the leading dot
    pub extension: String,
}

impl ResolvedOutputPath {
    pub fn to_path_buf(&self) -> PathBuf {
        let mut name = self.stem.clone();
        name.push(&self.extension);
        self.dir.join(name)
    }

    /// Image format named by the extension, `None` if it is not allow-listed.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_extension(&self.extension)
    }
}

pub fn is_allowed(extension: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension)
}

/// Replaces a leading `~` with the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let Some(rest) = raw.strip_prefix('~') else {
        return PathBuf::from(raw);
    };

    match dirs::home_dir() {
        Some(home) => {
            let mut path = home.into_os_string();
            path.push(rest);
            PathBuf::from(path)
        }
        None => {
            warn!("home directory unknown, keeping {raw}");
            PathBuf::from(raw)
        }
    }
}

/// Normalizes the output destination for `url`.
///
/// The extension is kept when allow-listed and otherwise replaced with
/// `.eps`, so the result always names one of the exportable formats.
pub fn resolve_output_path(raw: &str, _url: &str) -> ResolvedOutputPath {
    let path = expand_home(raw);

    let (dir, stem, extension) = match path.file_name() {
        Some(_) => (
            path.parent().unwrap_or(Path::new("")).to_path_buf(),
            path.file_stem().unwrap_or_default().to_os_string(),
            path.extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
        ),
        // `/`, `..` and friends: nothing to name, the file goes inside
        None => (path.clone(), OsString::new(), String::new()),
    };

    let extension = if is_allowed(&extension) {
        extension
    } else {
        debug!(
            "extension {:?} not allowed, using {DEFAULT_EXTENSION}",
            extension
        );
        DEFAULT_EXTENSION.to_owned()
    };

    ResolvedOutputPath {
        dir,
        stem,
        extension,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> PathBuf {
        resolve_output_path(raw, "http://example.com").to_path_buf()
    }

    #[test]
    fn home_is_expanded_and_default_appended() {
        let home = dirs::home_dir().expect("home directory");
        assert_eq!(resolve("~/qr"), home.join("qr.eps"));
    }

    #[test]
    fn unknown_extension_falls_back() {
        let resolved = resolve_output_path("out.jpg", "");
        assert_eq!(resolved.extension, ".eps");
        assert_eq!(resolved.to_path_buf(), PathBuf::from("out.eps"));
    }

    #[test]
    fn allowed_extension_is_kept() {
        assert_eq!(resolve("out.svg"), PathBuf::from("out.svg"));
        assert_eq!(resolve("dir/sub/code.pdf"), PathBuf::from("dir/sub/code.pdf"));
    }

    #[test]
    fn extension_check_is_case_sensitive() {
        assert_eq!(resolve("out.PNG"), PathBuf::from("out.eps"));
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(resolve("a.tar.png"), PathBuf::from("a.tar.png"));
        assert_eq!(resolve("a.png.gz"), PathBuf::from("a.png.eps"));
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(resolve(".png"), PathBuf::from(".png.eps"));
    }

    #[test]
    fn resolving_is_a_fixed_point() {
        let once = resolve("out.png");
        assert_eq!(once, PathBuf::from("out.png"));
        let twice = resolve(once.to_str().unwrap());
        assert_eq!(once, twice);

        let once = resolve("nested/out.jpg");
        let twice = resolve(once.to_str().unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn resolved_format() {
        let resolved = resolve_output_path("out.svg", "");
        assert_eq!(resolved.format(), Some(ImageFormat::Svg));
        assert!(is_allowed(&resolved.extension));
    }

    #[test]
    fn tilde_without_slash() {
        assert_eq!(expand_home("plain"), PathBuf::from("plain"));
        let home = dirs::home_dir().expect("home directory");
        let mut joined = home.into_os_string();
        joined.push("x");
        assert_eq!(expand_home("~x"), PathBuf::from(joined));
    }
}
