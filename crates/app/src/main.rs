use std::path::PathBuf;

use clap::Parser;
use kaleidoscope_core::{
    AppConfig, DispatchOutcome, HostEvent, KaleidoError, KeyCode, PixelSnapshot, PixelSurface,
    Pipeline, ShapeConfig,
};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing_subscriber::EnvFilter;

fn main() -> kaleidoscope_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let shape = ShapeConfig::parse(&cli.points, cli.animate.as_deref())?;
    let config = cli.app_config()?;

    run(shape, &config)
}

fn run(shape: ShapeConfig, config: &AppConfig) -> kaleidoscope_core::Result<()> {
    let mut host = WindowHost::open(config.render.width, config.render.height)?;
    let surface = PixelSurface::new(
        config.render.width,
        config.render.height,
        config.render.line_width,
        config.render.background,
    );
    let mut pipeline = Pipeline::start(shape, config, surface)?;

    'host: while host.is_open() {
        for event in host.poll_events() {
            match pipeline.dispatcher().handle(event) {
                Ok(DispatchOutcome::Quit) => break 'host,
                Ok(DispatchOutcome::Ignored) => {}
                Ok(outcome) => tracing::debug!(?outcome, "signal handled"),
                Err(err) => tracing::warn!(%err, "signal failed"),
            }
        }

        if let Some(exit) = pipeline.poll_scheduler()? {
            tracing::info!(?exit, "scheduler finished; waiting for input");
        }

        let frame = pipeline.renderer().snapshot()?;
        host.present(&frame)?;
    }

    tracing::info!("shutting down");
    pipeline.shutdown()?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Window that shows the renderer's pixels and turns raw input into
/// [`HostEvent`]s.
struct WindowHost {
    window: Window,
    height: usize,
    mouse_was_down: bool,
}

impl WindowHost {
    fn open(width: usize, height: usize) -> kaleidoscope_core::Result<Self> {
        let mut window = Window::new("Kaleidoscope", width, height, WindowOptions::default())
            .map_err(|err| KaleidoError::Surface(err.to_string()))?;
        window.set_target_fps(60);
        Ok(Self {
            window,
            height,
            mouse_was_down: false,
        })
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        let mut events: Vec<HostEvent> = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .map(|key| HostEvent::Key(key_code(key)))
            .collect();

        let mouse_down = self.window.get_mouse_down(MouseButton::Left);
        if mouse_down && !self.mouse_was_down {
            if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Discard) {
                // Window rows grow downwards; surface y grows upwards.
                events.push(HostEvent::Click {
                    x: f64::from(x),
                    y: self.height as f64 - f64::from(y),
                });
            }
        }
        self.mouse_was_down = mouse_down;
        events
    }

    fn present(&mut self, frame: &PixelSnapshot) -> kaleidoscope_core::Result<()> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|err| KaleidoError::Surface(err.to_string()))
    }
}

fn key_code(key: Key) -> KeyCode {
    match key {
        Key::P => KeyCode::P,
        Key::Space => KeyCode::Space,
        Key::S => KeyCode::S,
        Key::Q => KeyCode::Q,
        _ => KeyCode::Other,
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Rotating kaleidoscope of connected points", long_about = None)]
struct Cli {
    /// Number of points on the circle.
    points: String,
    /// Keep rotating the pattern (`true` or `false`).
    animate: Option<String>,
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Size of the segment worker pool.
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    line_width: Option<u32>,
    /// Pause poll interval in milliseconds.
    #[arg(long)]
    poll_ms: Option<u64>,
    /// Directory snapshots are written to.
    #[arg(long)]
    snapshot_dir: Option<String>,
}

impl Cli {
    fn app_config(&self) -> kaleidoscope_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.pool.workers = Some(workers);
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(line_width) = self.line_width {
            config.render.line_width = line_width;
        }
        if let Some(poll_ms) = self.poll_ms {
            config.playback.poll_interval_ms = poll_ms;
        }
        if let Some(dir) = &self.snapshot_dir {
            config.snapshot.directory = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "kaleidoscope",
            "100",
            "true",
            "--workers",
            "3",
            "--width",
            "640",
            "--poll-ms",
            "100",
        ]);
        let config = cli.app_config().unwrap();
        assert_eq!(config.pool.workers, Some(3));
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 800);
        assert_eq!(config.playback.poll_interval_ms, 100);

        let shape = ShapeConfig::parse(&cli.points, cli.animate.as_deref()).unwrap();
        assert_eq!(shape.point_count(), 100);
        assert!(shape.animate());
    }

    #[test]
    fn rejects_zero_workers() {
        let cli = Cli::parse_from(["kaleidoscope", "5", "--workers", "0"]);
        assert!(cli.app_config().is_err());
    }

    #[test]
    fn maps_control_keys() {
        assert_eq!(key_code(Key::Space), KeyCode::Space);
        assert_eq!(key_code(Key::Q), KeyCode::Q);
        assert_eq!(key_code(Key::A), KeyCode::Other);
    }
}
