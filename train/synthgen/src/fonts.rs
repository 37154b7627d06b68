use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use anyhow::Context;
use rand::{Rng, rngs::SmallRng};
use tracing::{debug, warn};

use crate::io::list_files;

fn read_font(path: &Path) -> anyhow::Result<FontArc> {
    let bytes = std::fs::read(path)?;
    Ok(FontArc::try_from_vec(bytes)?)
}

/// Font files of one directory. Files are read on every pick; the first
/// loadable one is kept as the default for files that fail to load.
pub struct FontCache {
    files: Vec<PathBuf>,
    fallback: FontArc,
}

impl FontCache {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let files = list_files(dir)?;
        anyhow::ensure!(!files.is_empty(), "no fonts found in {}", dir.display());

        let (path, fallback) = files
            .iter()
            .find_map(|p| read_font(p).ok().map(|f| (p, f)))
            .with_context(|| format!("no loadable font in {}", dir.display()))?;
        debug!("default font: {}", path.display());

        Ok(FontCache { files, fallback })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn get_random(&self, rng: &mut SmallRng) -> FontArc {
        let path = &self.files[rng.random_range(0..self.files.len())];
        match read_font(path) {
            Ok(font) => font,
            Err(err) => {
                warn!("font {} unusable ({err}), using default", path.display());
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;

    const SYSTEM_FONTS: [&str; 5] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial Unicode.ttf",
    ];

    /// `SYNTHGEN_TEST_FONT` wins over the well-known host paths.
    fn find_font(env_path: Option<PathBuf>, candidates: &[&str]) -> Option<PathBuf> {
        env_path.or_else(|| candidates.iter().map(PathBuf::from).find(|p| p.is_file()))
    }

    /// A real font for rendering tests. Without one the caller skips with a
    /// note on stderr; under `CI` a missing font fails the test instead.
    pub(crate) fn system_font() -> Option<PathBuf> {
        let font = find_font(std::env::var_os("SYNTHGEN_TEST_FONT").map(PathBuf::from), &SYSTEM_FONTS);
        if font.is_none() {
            assert!(
                std::env::var_os("CI").is_none(),
                "no test font found, set SYNTHGEN_TEST_FONT"
            );
            eprintln!("skipped: no test font found, set SYNTHGEN_TEST_FONT to run");
        }
        font
    }

    #[test]
    fn test_font_lookup_prefers_env_path() {
        let dir = tempfile::tempdir().unwrap();
        let listed = dir.path().join("listed.ttf");
        std::fs::write(&listed, b"").unwrap();
        let listed_str = listed.to_str().unwrap();
        let missing = dir.path().join("missing.ttf");
        let missing_str = missing.to_str().unwrap();

        let chosen = find_font(Some(PathBuf::from("/from/env.ttf")), &[listed_str]);
        assert_eq!(chosen, Some(PathBuf::from("/from/env.ttf")));
        assert_eq!(find_font(None, &[missing_str, listed_str]), Some(listed.clone()));
        assert_eq!(find_font(None, &[missing_str]), None);
    }

    #[test]
    fn empty_or_missing_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FontCache::load(dir.path()).is_err());
        assert!(FontCache::load(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn dir_without_a_parseable_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.ttf"), b"not a font").unwrap();
        let err = FontCache::load(dir.path()).err().unwrap();
        assert!(err.to_string().contains("no loadable font"));
    }

    #[test]
    fn broken_font_falls_back_to_default() {
        let Some(font) = system_font() else { return };
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(&font, dir.path().join("a.ttf")).unwrap();
        std::fs::write(dir.path().join("b.ttf"), b"garbage").unwrap();

        let cache = FontCache::load(dir.path()).unwrap();
        assert_eq!(cache.len(), 2);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..8 {
            // every pick, broken or not, yields a usable font
            let f = cache.get_random(&mut rng);
            assert!(ab_glyph::Font::glyph_id(&f, 'A').0 != 0);
        }
    }
}
