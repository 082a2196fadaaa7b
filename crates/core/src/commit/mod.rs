use crate::{
    compute::SegmentPool,
    geometry::Circle,
    render::{Color, RenderHandle},
    Result, ShapeConfig,
};

/// Outcome of one committed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub rotation: f64,
    pub segments: usize,
}

/// Joins the compute pool and the renderer so every frame reaches the
/// surface whole, and only after the previous one has been drawn.
#[derive(Debug)]
pub struct FrameCommit {
    pool: SegmentPool,
    renderer: RenderHandle,
}

impl FrameCommit {
    pub fn new(pool: SegmentPool, renderer: RenderHandle) -> Self {
        Self { pool, renderer }
    }

    /// Computes and draws the frame for `rotation`, blocking until the
    /// renderer's draw call has returned.
    pub fn commit(
        &self,
        shape: &ShapeConfig,
        circle: &Circle,
        rotation: f64,
        color: Color,
    ) -> Result<FrameStats> {
        // compute_frame only returns after every partition has joined.
        let batch = self.pool.compute_frame(shape, circle, rotation);
        let stats = FrameStats {
            rotation,
            segments: batch.len(),
        };

        self.renderer.render(batch, color)?;
        tracing::trace!(rotation, segments = stats.segments, "frame committed");
        Ok(stats)
    }
}
