use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Optional narrative documents and images
// ---------------------------------------------------------------------------

pub const EMISSION_DOC: &str = "emission.md";
pub const GLOSSARY_DOC: &str = "glossary.md";
pub const LOGO_FILE: &str = "logo.png";
/// Both spellings occur in the wild; the first one found wins.
pub const EMISSION_IMAGES: [&str; 2] = ["licensed-image.jpeg", "licenced-image.jpeg"];

/// An optional resource, or the informational text shown in its place.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset<T> {
    Ready(T),
    Missing(String),
}

impl<T> Asset<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Asset::Ready(v) => Some(v),
            Asset::Missing(_) => None,
        }
    }
}

/// The emission article with its header image pulled out.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub text: String,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assets {
    pub emission: Asset<Narrative>,
    pub glossary: Asset<String>,
    pub logo: Asset<PathBuf>,
}

impl Assets {
    /// Look up every asset in `dir`. Never fails: anything absent or
    /// unreadable becomes [`Asset::Missing`].
    pub fn load(dir: &Path) -> Self {
        let emission = match read_optional(&dir.join(EMISSION_DOC)) {
            Some(text) => Asset::Ready(Narrative {
                text: strip_image_lines(&text),
                image: EMISSION_IMAGES
                    .iter()
                    .map(|name| dir.join(name))
                    .find(|p| p.is_file()),
            }),
            None => Asset::Missing(format!("{EMISSION_DOC} not found.")),
        };

        let glossary = match read_optional(&dir.join(GLOSSARY_DOC)) {
            Some(text) => Asset::Ready(text),
            None => Asset::Missing(format!("{GLOSSARY_DOC} not found.")),
        };

        let logo_path = dir.join(LOGO_FILE);
        let logo = if logo_path.is_file() {
            Asset::Ready(logo_path)
        } else {
            log::warn!("{} not found", logo_path.display());
            Asset::Missing(format!(
                "{LOGO_FILE} not found; place it alongside the data file to show the logo."
            ))
        };

        Assets {
            emission,
            glossary,
            logo,
        }
    }
}

/// Drop lines that embed the header image; it is drawn separately.
pub fn strip_image_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !EMISSION_IMAGES.iter().any(|img| line.contains(img)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.is_file() {
        log::warn!("{} not found", path.display());
        return None;
    }
    match read_text(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("{e:#}");
            None
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_lines_are_removed() {
        let text = "# Methane\n![img](licensed-image.jpeg)\nBody\n<img src=\"licenced-image.jpeg\">\nEnd";
        assert_eq!(strip_image_lines(text), "# Methane\nBody\nEnd");
    }

    #[test]
    fn empty_directory_degrades_to_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::load(dir.path());
        assert_eq!(
            assets.emission,
            Asset::Missing("emission.md not found.".into())
        );
        assert_eq!(
            assets.glossary,
            Asset::Missing("glossary.md not found.".into())
        );
        assert!(assets.logo.ready().is_none());
    }

    #[test]
    fn present_assets_are_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EMISSION_DOC), "Intro\n![x](licensed-image.jpeg)\n").unwrap();
        std::fs::write(dir.path().join(GLOSSARY_DOC), "**CH4**: methane").unwrap();
        std::fs::write(dir.path().join("licenced-image.jpeg"), b"jpeg").unwrap();
        std::fs::write(dir.path().join(LOGO_FILE), b"png").unwrap();

        let assets = Assets::load(dir.path());
        let narrative = assets.emission.ready().unwrap();
        assert_eq!(narrative.text, "Intro");
        assert_eq!(
            narrative.image.as_deref(),
            Some(dir.path().join("licenced-image.jpeg").as_path())
        );
        assert_eq!(assets.glossary.ready().map(String::as_str), Some("**CH4**: methane"));
        assert_eq!(assets.logo, Asset::Ready(dir.path().join(LOGO_FILE)));
    }
}
