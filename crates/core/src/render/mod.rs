use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, Receiver, Sender};
use rand::Rng;

use crate::{assets::Icon, compute::FrameBatch, geometry::Segment, KaleidoError, Result};

mod surface;

pub use surface::PixelSurface;

/// Commands queued ahead of the one being executed. Draws still block on
/// their own acknowledgement, so this only buffers overlay requests.
const COMMAND_QUEUE: usize = 16;

/// Opaque stroke colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }

    /// Packs the colour as 0RGB, the layout window buffers expect.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Axis-aligned rectangle in surface space; `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Copy of the pixels currently on a surface, rows ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSnapshot {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl PixelSnapshot {
    pub fn pixel(&self, column: usize, row: usize) -> Option<u32> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels.get(row * self.width + column).copied()
    }

    /// Expands the 0RGB pixels into packed RGB bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.push((pixel >> 16) as u8);
            bytes.push((pixel >> 8) as u8);
            bytes.push(*pixel as u8);
        }
        bytes
    }
}

/// Anything the renderer can draw onto. Only the render thread ever holds
/// the surface, so implementations need no internal locking.
pub trait Surface: Send {
    fn size(&self) -> (usize, usize);

    /// Strokes every segment with `color` in a single call.
    fn stroke_segments(&mut self, segments: &[Segment], color: Color);

    fn draw_image(&mut self, icon: &Icon, region: Rect);

    fn pixels(&self) -> PixelSnapshot;
}

enum RenderCommand {
    Draw {
        batch: FrameBatch,
        color: Color,
        ack: Sender<()>,
    },
    Overlay {
        icon: Arc<Icon>,
        region: Rect,
    },
    Snapshot {
        reply: Sender<PixelSnapshot>,
    },
    Shutdown,
}

/// Owner of the render thread. Dropping it without [`Renderer::shutdown`]
/// leaves the thread running until every [`RenderHandle`] is gone.
#[derive(Debug)]
pub struct Renderer<S> {
    handle: RenderHandle,
    thread: JoinHandle<S>,
}

impl<S: Surface + 'static> Renderer<S> {
    /// Moves `surface` onto a dedicated thread.
    pub fn spawn(surface: S) -> Result<Self> {
        let (commands, inbox) = bounded(COMMAND_QUEUE);
        let (width, height) = surface.size();
        let thread = thread::Builder::new()
            .name("renderer".into())
            .spawn(move || run(surface, inbox))
            .map_err(|err| KaleidoError::Surface(err.to_string()))?;

        tracing::debug!(width, height, "renderer thread started");
        Ok(Self {
            handle: RenderHandle { commands },
            thread,
        })
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle.clone()
    }

    /// Stops the render thread after pending commands and hands the surface
    /// back.
    pub fn shutdown(self) -> Result<S> {
        // The thread may already have exited if every handle was dropped.
        let _ = self.handle.commands.send(RenderCommand::Shutdown);
        self.thread
            .join()
            .map_err(|_| KaleidoError::msg("render thread panicked"))
    }
}

fn run<S: Surface>(mut surface: S, inbox: Receiver<RenderCommand>) -> S {
    for command in inbox.iter() {
        match command {
            RenderCommand::Draw { batch, color, ack } => {
                surface.stroke_segments(batch.segments(), color);
                let _ = ack.send(());
            }
            RenderCommand::Overlay { icon, region } => surface.draw_image(&icon, region),
            RenderCommand::Snapshot { reply } => {
                let _ = reply.send(surface.pixels());
            }
            RenderCommand::Shutdown => break,
        }
    }
    tracing::debug!("renderer thread stopped");
    surface
}

/// Cloneable, thread-safe way into the render thread.
#[derive(Clone)]
pub struct RenderHandle {
    commands: Sender<RenderCommand>,
}

impl RenderHandle {
    /// Draws a complete batch and blocks until the draw call has returned.
    pub fn render(&self, batch: FrameBatch, color: Color) -> Result<()> {
        let (ack, done) = bounded(1);
        self.commands
            .send(RenderCommand::Draw { batch, color, ack })
            .map_err(|_| KaleidoError::RendererDisconnected)?;
        done.recv().map_err(|_| KaleidoError::RendererDisconnected)
    }

    /// Queues an overlay image; it is drawn in order with frames.
    pub fn show_overlay(&self, icon: Arc<Icon>, region: Rect) -> Result<()> {
        self.commands
            .send(RenderCommand::Overlay { icon, region })
            .map_err(|_| KaleidoError::RendererDisconnected)
    }

    /// Copies the pixels currently on the surface.
    pub fn snapshot(&self) -> Result<PixelSnapshot> {
        let (reply, response) = bounded(1);
        self.commands
            .send(RenderCommand::Snapshot { reply })
            .map_err(|_| KaleidoError::RendererDisconnected)?;
        response
            .recv()
            .map_err(|_| KaleidoError::RendererDisconnected)
    }
}

impl std::fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHandle")
            .field("queued", &self.commands.len())
            .finish()
    }
}
