use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use labels::{NormalizedBox, write_label_file};
use time::{OffsetDateTime, macros::format_description};
use tracing::debug;

use crate::{generator::Scene, record::JsonRecord};

/// Regular, non-hidden files of `dir`, sorted by path.
pub fn list_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot read {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn timestamp() -> anyhow::Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format =
        format_description!("[year][month][day]_[hour][minute][second]_[subsecond digits:6]");
    Ok(now.format(format)?)
}

/// Writes `image/<stem>.jpg` and `label/<stem>.txt` under the save path,
/// plus one `manifest.jsonl` line per image when the manifest is enabled.
pub struct OutputSink {
    image_dir: PathBuf,
    label_dir: PathBuf,
    manifest: PathBuf,
    write_manifest: bool,
    ready: bool,
    writer: Option<BufWriter<File>>,
}

impl OutputSink {
    pub fn new(save_path: &Path) -> Self {
        Self {
            image_dir: save_path.join("image"),
            label_dir: save_path.join("label"),
            manifest: save_path.join("manifest.jsonl"),
            write_manifest: false,
            ready: false,
            writer: None,
        }
    }

    pub fn with_manifest(mut self, enabled: bool) -> Self {
        self.write_manifest = enabled;
        self
    }

    fn init_output(&mut self) -> std::io::Result<()> {
        if self.ready {
            return Ok(());
        }
        fs::create_dir_all(&self.image_dir)?;
        fs::create_dir_all(&self.label_dir)?;
        if self.write_manifest {
            let file = OpenOptions::new().create(true).append(true).open(&self.manifest)?;
            self.writer = Some(BufWriter::new(file));
        }
        self.ready = true;
        Ok(())
    }

    fn image_path(&self, stem: &str) -> PathBuf {
        self.image_dir.join(format!("{stem}.jpg"))
    }

    fn label_path(&self, stem: &str) -> PathBuf {
        self.label_dir.join(format!("{stem}.txt"))
    }

    /// `number_<timestamp>`, suffixed with `_<n>` while either file exists.
    pub fn unique_stem(&self) -> anyhow::Result<String> {
        let base = format!("number_{}", timestamp()?);
        let mut stem = base.clone();
        let mut n = 1;
        while self.image_path(&stem).exists() || self.label_path(&stem).exists() {
            stem = format!("{base}_{n}");
            n += 1;
        }
        Ok(stem)
    }

    pub fn save(
        &mut self,
        scene: &Scene,
        labels: &[NormalizedBox],
        seed: u64,
    ) -> anyhow::Result<String> {
        self.init_output()
            .with_context(|| format!("cannot prepare {}", self.image_dir.display()))?;

        let stem = self.unique_stem()?;
        let image_path = self.image_path(&stem);
        let label_path = self.label_path(&stem);

        scene
            .image
            .save(&image_path)
            .with_context(|| format!("cannot write {}", image_path.display()))?;
        write_label_file(&label_path, labels)
            .with_context(|| format!("cannot write {}", label_path.display()))?;

        if let Some(ref mut writer) = self.writer {
            let rec = JsonRecord {
                schema: "v1",
                image: format!("image/{stem}.jpg"),
                label: format!("label/{stem}.txt"),
                text: &scene.text,
                glyphs: labels.len(),
                size: scene.image.dimensions(),
                seed,
            };
            writeln!(writer, "{}", serde_json::to_string(&rec)?)?;
        }

        debug!("saved {stem} ({} glyphs)", labels.len());
        Ok(stem)
    }

    pub fn finalize_output(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        let _ = self.finalize_output();
    }
}
