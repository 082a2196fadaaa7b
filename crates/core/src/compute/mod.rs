use std::fmt;

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::{
    geometry::{segment_count, Circle, Segment},
    KaleidoError, Result, ShapeConfig,
};

/// Every segment of one frame, collected for a single rotation angle.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBatch {
    rotation: f64,
    segments: Vec<Segment>,
}

impl FrameBatch {
    pub fn new(rotation: f64, segments: Vec<Segment>) -> Self {
        Self { rotation, segments }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Bounded pool of workers computing segment endpoints in parallel.
///
/// The pool size is fixed at construction and does not grow with the point
/// count; each frame is split into one task per outer point index.
pub struct SegmentPool {
    pool: ThreadPool,
}

impl SegmentPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(KaleidoError::WorkerPool(
                "worker count must be at least one".into(),
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("segment-worker-{index}"))
            .build()
            .map_err(|err| KaleidoError::WorkerPool(err.to_string()))?;

        tracing::debug!(workers, "segment pool ready");
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Computes every segment for `rotation`. Returns once all partitions
    /// have finished; each partition fills its own list and the lists are
    /// concatenated in index order after the join.
    pub fn compute_frame(&self, shape: &ShapeConfig, circle: &Circle, rotation: f64) -> FrameBatch {
        let point_count = shape.point_count();
        let partitions: Vec<Vec<Segment>> = self.pool.install(|| {
            (0..point_count)
                .into_par_iter()
                .map(|i| partition(circle, point_count, rotation, i))
                .collect()
        });

        let mut segments = Vec::with_capacity(segment_count(point_count));
        for part in partitions {
            segments.extend(part);
        }
        FrameBatch::new(rotation, segments)
    }
}

/// All segments whose first endpoint is point `i`.
fn partition(circle: &Circle, point_count: usize, rotation: f64, i: usize) -> Vec<Segment> {
    let start = circle.point(i, point_count, rotation);
    (i + 1..point_count)
        .map(|j| Segment::new(start, circle.point(j, point_count, rotation)))
        .collect()
}

impl fmt::Debug for SegmentPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentPool")
            .field("workers", &self.workers())
            .finish()
    }
}
