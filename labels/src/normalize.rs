use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    annotation::{AnnotationBox, AnnotationRecord},
    error::LabelError,
    label::{LabelOptions, NormalizedBox, write_label_file},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Written(PathBuf),
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub written: usize,
    pub skipped: usize,
}

impl AnnotationBox {
    /// SVHN stores digit `0` as class 10 and counts pixels from 1.
    pub fn normalize(&self, image_size: (u32, u32), opts: LabelOptions) -> NormalizedBox {
        NormalizedBox::from_corner(
            self.label.rem_euclid(10) as usize,
            ((self.left - 1) as f64, (self.top - 1) as f64),
            (self.width as f64, self.height as f64),
            image_size,
            opts,
        )
    }
}

/// Writes `<labels_dir>/<stem>.txt` for one record.
///
/// Images that are missing, or whose header cannot be read, are skipped.
pub fn normalize_record(
    record: &AnnotationRecord,
    images_dir: &Path,
    labels_dir: &Path,
    opts: LabelOptions,
) -> Result<Outcome, LabelError> {
    let image_path = images_dir.join(&record.filename);
    if !image_path.is_file() {
        debug!("skip {}: image not found", record.filename);
        return Ok(Outcome::Skipped);
    }

    let image_size = match image::image_dimensions(&image_path) {
        Ok(dims) => dims,
        Err(err) => {
            warn!("skip {}: {err}", image_path.display());
            return Ok(Outcome::Skipped);
        }
    };

    let boxes: Vec<NormalizedBox> = record
        .boxes
        .iter()
        .map(|b| b.normalize(image_size, opts))
        .collect();

    let label_path = labels_dir.join(Path::new(&record.filename).with_extension("txt"));
    write_label_file(&label_path, &boxes)?;
    Ok(Outcome::Written(label_path))
}

pub fn convert_all(
    records: &[AnnotationRecord],
    images_dir: &Path,
    labels_dir: &Path,
    opts: LabelOptions,
) -> Result<ConvertSummary, LabelError> {
    fs::create_dir_all(labels_dir)?;

    let mut summary = ConvertSummary::default();
    for (i, record) in records.iter().enumerate() {
        match normalize_record(record, images_dir, labels_dir, opts)? {
            Outcome::Written(_) => summary.written += 1,
            Outcome::Skipped => summary.skipped += 1,
        }
        if (i + 1) % 1000 == 0 {
            info!("{}/{} records converted", i + 1, records.len());
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn bx(label: i64, left: i64, top: i64, width: i64, height: i64) -> AnnotationBox {
        AnnotationBox { label, left, top, width, height }
    }

    fn record(filename: &str, boxes: Vec<AnnotationBox>) -> AnnotationRecord {
        AnnotationRecord { filename: filename.to_string(), boxes }
    }

    #[test]
    fn class_ten_maps_to_zero() {
        let opts = LabelOptions::default();
        assert_eq!(bx(10, 1, 1, 4, 4).normalize((8, 8), opts).class_id, 0);
        assert_eq!(bx(3, 1, 1, 4, 4).normalize((8, 8), opts).class_id, 3);
    }

    #[test]
    fn one_based_box_to_center() {
        let b = bx(5, 11, 6, 20, 10).normalize((100, 50), LabelOptions::default());
        assert_eq!(b.to_string(), "5 0.200000 0.200000 0.200000 0.200000");
    }

    #[test]
    fn zero_sized_box() {
        let b = bx(1, 1, 1, 0, 0).normalize((100, 50), LabelOptions::default());
        assert_eq!(b.width, 0.0);
        assert_eq!(b.height, 0.0);
    }

    #[test]
    fn missing_image_is_skipped() {
        let images = tempfile::tempdir().unwrap();
        let labels = tempfile::tempdir().unwrap();
        let rec = record("404.png", vec![bx(1, 1, 1, 2, 2)]);

        let out = normalize_record(&rec, images.path(), labels.path(), LabelOptions::default())
            .unwrap();
        assert_eq!(out, Outcome::Skipped);
        assert_eq!(fs::read_dir(labels.path()).unwrap().count(), 0);
    }

    #[test]
    fn undecodable_image_is_skipped() {
        let images = tempfile::tempdir().unwrap();
        let labels = tempfile::tempdir().unwrap();
        fs::write(images.path().join("1.png"), b"not a png").unwrap();
        let rec = record("1.png", vec![bx(1, 1, 1, 2, 2)]);

        let out = normalize_record(&rec, images.path(), labels.path(), LabelOptions::default())
            .unwrap();
        assert_eq!(out, Outcome::Skipped);
    }

    #[test]
    fn writes_label_next_to_stem_and_is_idempotent() {
        let images = tempfile::tempdir().unwrap();
        let labels = tempfile::tempdir().unwrap();
        RgbImage::new(100, 50).save(images.path().join("7.png")).unwrap();
        let rec = record("7.png", vec![bx(5, 11, 6, 20, 10), bx(10, 1, 1, 100, 50)]);

        let first = normalize_record(&rec, images.path(), labels.path(), LabelOptions::default())
            .unwrap();
        let path = labels.path().join("7.txt");
        assert_eq!(first, Outcome::Written(path.clone()));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "5 0.200000 0.200000 0.200000 0.200000\n0 0.500000 0.500000 1.000000 1.000000"
        );

        normalize_record(&rec, images.path(), labels.path(), LabelOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn convert_all_counts_outcomes() {
        let images = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let labels = root.path().join("labels");
        RgbImage::new(10, 10).save(images.path().join("1.png")).unwrap();
        let records = vec![
            record("1.png", vec![bx(1, 1, 1, 2, 2)]),
            record("2.png", vec![bx(2, 1, 1, 2, 2)]),
        ];

        let summary =
            convert_all(&records, images.path(), &labels, LabelOptions::default()).unwrap();
        assert_eq!(summary, ConvertSummary { written: 1, skipped: 1 });
        assert!(labels.join("1.txt").is_file());
    }
}
