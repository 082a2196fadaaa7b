use std::path::PathBuf;

use image::RgbImage;
use time::{macros::format_description, OffsetDateTime};

use crate::{render::PixelSnapshot, KaleidoError, Result};

/// Writes cropped PNG snapshots of the rendered pattern into a directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    directory: PathBuf,
}

impl SnapshotWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Saves the centred square of `snapshot` as `<timestamp>.png`.
    pub fn save(&self, snapshot: &PixelSnapshot) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;

        let square = crop_square(snapshot);
        let image = RgbImage::from_raw(
            square.width as u32,
            square.height as u32,
            square.to_rgb_bytes(),
        )
        .ok_or_else(|| KaleidoError::Snapshot("pixel buffer has the wrong size".into()))?;

        let path = self.next_path()?;
        image.save(&path)?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(path)
    }

    fn next_path(&self) -> Result<PathBuf> {
        let stamp = local_now()
            .format(format_description!(
                "[year]-[month]-[day] [hour].[minute].[second]"
            ))
            .map_err(|err| KaleidoError::Snapshot(err.to_string()))?;

        let mut path = self.directory.join(format!("{stamp}.png"));
        let mut suffix = 1;
        while path.exists() {
            path = self.directory.join(format!("{stamp} ({suffix}).png"));
            suffix += 1;
        }
        Ok(path)
    }
}

/// Wall-clock time in the local zone, or UTC when the offset can't be
/// determined (the `time` crate refuses on some multi-threaded platforms).
fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Cuts the largest centred square out of the snapshot, which is exactly the
/// area the pattern's circle is inscribed in.
pub fn crop_square(snapshot: &PixelSnapshot) -> PixelSnapshot {
    let side = snapshot.width.min(snapshot.height);
    let left = (snapshot.width - side) / 2;
    let top = (snapshot.height - side) / 2;

    let mut pixels = Vec::with_capacity(side * side);
    for row in top..top + side {
        let start = row * snapshot.width + left;
        pixels.extend_from_slice(&snapshot.pixels[start..start + side]);
    }

    PixelSnapshot {
        width: side,
        height: side,
        pixels,
    }
}
