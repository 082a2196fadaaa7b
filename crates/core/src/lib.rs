//! Core library for the Kaleidoscope application.
//!
//! Points evenly spaced on a circle are joined pairwise and the whole pattern
//! is rotated frame by frame. Each frame is computed by a bounded worker pool,
//! joined, and handed whole to a render thread that exclusively owns the
//! drawing surface. A shared playback control suspends stepping between
//! frames.

pub mod assets;
pub mod commit;
pub mod compute;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod pipeline;
pub mod playback;
pub mod record;
pub mod render;
pub mod scheduler;

pub use assets::{Icon, IconKind, IconSet};
pub use commit::{FrameCommit, FrameStats};
pub use compute::{FrameBatch, SegmentPool};
pub use config::{AppConfig, PlaybackConfig, PoolConfig, RenderConfig, ShapeConfig, SnapshotConfig};
pub use error::{KaleidoError, Result};
pub use events::{route, DispatchOutcome, HostEvent, KeyCode, Signal, SignalDispatcher, CONTROL_REGION};
pub use geometry::{Circle, Point, Segment};
pub use pipeline::Pipeline;
pub use playback::{IconSink, OverlayIcons, PlaybackControl, PlaybackState};
pub use record::SnapshotWriter;
pub use render::{Color, PixelSnapshot, PixelSurface, Rect, RenderHandle, Renderer, Surface};
pub use scheduler::{RotationScheduler, SchedulerExit, SweepPhase};
