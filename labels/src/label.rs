use std::{fmt, fs, path::Path};

use crate::error::LabelError;

/// Options applied when a box is normalized.
#[derive(Clone, Copy, Debug, Default)]
pub struct LabelOptions {
    /// Clamp every normalized value into `[0, 1]`. Off by default: boxes that
    /// leave the image keep their raw values.
    pub clamp: bool,
}

/// One YOLO label line: class id plus center and size relative to the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Normalizes a box given by its 0-based top-left corner and pixel size.
    ///
    /// Only the image dimensions are ever divided by, so an empty box is fine.
    pub fn from_corner(
        class_id: usize,
        (x_min, y_min): (f64, f64),
        (width, height): (f64, f64),
        (image_width, image_height): (u32, u32),
        opts: LabelOptions,
    ) -> Self {
        let iw = image_width as f64;
        let ih = image_height as f64;
        let b = Self {
            class_id,
            x_center: (x_min + width / 2.0) / iw,
            y_center: (y_min + height / 2.0) / ih,
            width: width / iw,
            height: height / ih,
        };
        if opts.clamp { b.clamped() } else { b }
    }

    pub fn clamped(self) -> Self {
        Self {
            x_center: self.x_center.clamp(0.0, 1.0),
            y_center: self.y_center.clamp(0.0, 1.0),
            width: self.width.clamp(0.0, 1.0),
            height: self.height.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl fmt::Display for NormalizedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

pub fn render_lines(boxes: &[NormalizedBox]) -> String {
    boxes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the label file, replacing any previous one in a single rename.
pub fn write_label_file(path: &Path, boxes: &[NormalizedBox]) -> Result<(), LabelError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, render_lines(boxes))?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}
