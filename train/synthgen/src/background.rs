use std::{
    f32::consts::FRAC_PI_2,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{DynamicImage, Rgb, RgbImage, imageops, imageops::FilterType};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use rand::{Rng, rngs::SmallRng};
use tracing::debug;

use crate::{io::list_files, render::ComposeConfig};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Counter-clockwise rotation of the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn random(rng: &mut SmallRng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Keeps the canvas size; a non-square canvas turned by a quarter is
    /// rotated about its center and the uncovered corners are black.
    pub fn apply(self, img: RgbImage) -> RgbImage {
        let square = img.width() == img.height();
        match self {
            Rotation::R0 => img,
            Rotation::R180 => imageops::rotate180(&img),
            Rotation::R90 if square => imageops::rotate270(&img),
            Rotation::R270 if square => imageops::rotate90(&img),
            // imageproc turns clockwise for positive angles
            Rotation::R90 => rotate_about_center(&img, -FRAC_PI_2, Interpolation::Nearest, BLACK),
            Rotation::R270 => rotate_about_center(&img, FRAC_PI_2, Interpolation::Nearest, BLACK),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFilter {
    Blur,
    Detail,
    EdgeEnhance,
    GaussianBlur,
}

impl TextureFilter {
    const ALL: [TextureFilter; 4] = [
        TextureFilter::Blur,
        TextureFilter::Detail,
        TextureFilter::EdgeEnhance,
        TextureFilter::GaussianBlur,
    ];

    pub fn random(rng: &mut SmallRng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn apply(self, img: RgbImage) -> RgbImage {
        let img = DynamicImage::ImageRgb8(img);
        // filter3x3 divides by the kernel sum
        let out = match self {
            TextureFilter::Blur => img.filter3x3(&[1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0]),
            TextureFilter::Detail => {
                img.filter3x3(&[0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0])
            }
            TextureFilter::EdgeEnhance => {
                img.filter3x3(&[-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0])
            }
            TextureFilter::GaussianBlur => img.blur(2.0),
        };
        out.to_rgb8()
    }
}

/// Crops a random `width x height` window out of textures that are larger
/// than the canvas plus margin, resizes everything else.
pub fn fit_to_canvas(img: DynamicImage, cfg: &ComposeConfig, rng: &mut SmallRng) -> RgbImage {
    let (w, h) = (cfg.width, cfg.height);
    if img.width() > w + cfg.margin && img.height() > h + cfg.margin {
        let x = rng.random_range(0..img.width() - w);
        let y = rng.random_range(0..img.height() - h);
        img.crop_imm(x, y, w, h).to_rgb8()
    } else {
        img.resize_exact(w, h, FilterType::CatmullRom).to_rgb8()
    }
}

pub struct TextureSet {
    files: Vec<PathBuf>,
}

impl TextureSet {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let files = list_files(dir)?;
        anyhow::ensure!(!files.is_empty(), "no textures found in {}", dir.display());
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn sample(&self, cfg: &ComposeConfig, rng: &mut SmallRng) -> anyhow::Result<RgbImage> {
        let path = &self.files[rng.random_range(0..self.files.len())];
        let texture =
            image::open(path).with_context(|| format!("cannot open texture {}", path.display()))?;

        let canvas = fit_to_canvas(texture, cfg, rng);
        let rotation = Rotation::random(rng);
        let mut canvas = rotation.apply(canvas);
        if rng.random_bool(cfg.filter_chance) {
            let filter = TextureFilter::random(rng);
            debug!("background {}: {rotation:?}, {filter:?}", path.display());
            canvas = filter.apply(canvas);
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn texture(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn cfg(width: u32, height: u32) -> ComposeConfig {
        ComposeConfig { width, height, ..ComposeConfig::default() }
    }

    #[test]
    fn large_texture_is_cropped_to_canvas() {
        let mut rng = SmallRng::seed_from_u64(1);
        let src = texture(300, 250);
        let out = fit_to_canvas(DynamicImage::ImageRgb8(src.clone()), &cfg(240, 160), &mut rng);
        assert_eq!(out.dimensions(), (240, 160));

        // a crop copies pixels verbatim
        let p = out.get_pixel(0, 0);
        let (x0, y0) = (p[0] as u32, p[1] as u32);
        assert_eq!(out.get_pixel(5, 7), src.get_pixel(x0 + 5, y0 + 7));
    }

    #[test]
    fn small_or_thin_texture_is_resized() {
        let mut rng = SmallRng::seed_from_u64(2);
        for (w, h) in [(64, 64), (1000, 250), (260, 900)] {
            let src = DynamicImage::ImageRgb8(texture(w, h));
            assert_eq!(fit_to_canvas(src, &cfg(240, 240), &mut rng).dimensions(), (240, 240));
        }
    }

    #[test]
    fn rotation_and_filters_keep_canvas_size() {
        for rotation in Rotation::ALL {
            assert_eq!(rotation.apply(texture(30, 20)).dimensions(), (30, 20));
            assert_eq!(rotation.apply(texture(25, 25)).dimensions(), (25, 25));
        }
        for filter in TextureFilter::ALL {
            assert_eq!(filter.apply(texture(30, 20)).dimensions(), (30, 20));
        }
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(2, 0, Rgb([255, 0, 0]));
        let out = Rotation::R90.apply(img);
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn sampled_background_always_matches_canvas() {
        let dir = tempfile::tempdir().unwrap();
        texture(500, 420).save(dir.path().join("big.png")).unwrap();
        texture(80, 50).save(dir.path().join("small.png")).unwrap();
        let set = TextureSet::load(dir.path()).unwrap();
        assert_eq!(set.len(), 2);

        let cfg = cfg(200, 120);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..12 {
            assert_eq!(set.sample(&cfg, &mut rng).unwrap().dimensions(), (200, 120));
        }
    }

    #[test]
    fn empty_texture_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TextureSet::load(dir.path()).is_err());
        assert!(TextureSet::load(&dir.path().join("missing")).is_err());
    }
}
