use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{KaleidoError, Result};

/// What to draw: how many points sit on the circle and whether the pattern
/// keeps rotating. Immutable once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeConfig {
    point_count: usize,
    animate: bool,
}

impl ShapeConfig {
    pub fn new(point_count: usize, animate: bool) -> Result<Self> {
        if point_count == 0 {
            return Err(KaleidoError::invalid_config(
                "Points must be a positive integer",
            ));
        }
        Ok(Self {
            point_count,
            animate,
        })
    }

    /// Validates raw command line arguments. A missing `animate` argument
    /// means a single static frame.
    pub fn parse(points: &str, animate: Option<&str>) -> Result<Self> {
        let point_count = points
            .trim()
            .parse::<usize>()
            .map_err(|_| KaleidoError::invalid_config("Points must be an integer"))?;

        let animate = match animate.map(str::trim) {
            None => false,
            Some("true") => true,
            Some("false") => false,
            Some(_) => {
                return Err(KaleidoError::invalid_config(
                    "Animate should either be true or false",
                ))
            }
        };

        Self::new(point_count, animate)
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn animate(&self) -> bool {
        self.animate
    }
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub playback: PlaybackConfig,
    pub pool: PoolConfig,
    pub snapshot: SnapshotConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections fall back to their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            return Err(KaleidoError::invalid_config(
                "surface dimensions must be non-zero",
            ));
        }
        if self.render.line_width == 0 {
            return Err(KaleidoError::invalid_config("line width must be non-zero"));
        }
        if self.pool.workers == Some(0) {
            return Err(KaleidoError::invalid_config(
                "worker count must be at least one",
            ));
        }
        Ok(())
    }
}

/// Configuration for the drawing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub line_width: u32,
    /// Background as 0RGB.
    pub background: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            line_width: 1,
            background: 0x00_00_00_00,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub poll_interval_ms: u64,
}

impl PlaybackConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
        }
    }
}

/// Sizing of the segment worker pool. `None` lets the pool pick one worker
/// per available core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub workers: Option<usize>,
}

impl PoolConfig {
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub directory: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        let base = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            directory: format!("{base}/Pictures/Kaleidoscope"),
        }
    }
}
