use std::thread::{self, JoinHandle};

use rand::Rng;

use crate::{
    commit::FrameCommit,
    geometry::{sweep_rotations, Circle},
    playback::PlaybackControl,
    render::Color,
    KaleidoError, Result, ShapeConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    SweepStart,
    Stepping,
    SweepEnd,
}

/// Why [`RotationScheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerExit {
    /// A static shape was drawn once.
    Completed,
    /// Quit was requested; the loop stopped at a step boundary.
    Quit,
}

/// Drives the rotation: one compute/commit/draw cycle per increment, with a
/// fresh stroke colour at the start of every sweep.
pub struct RotationScheduler<R> {
    shape: ShapeConfig,
    circle: Circle,
    commit: FrameCommit,
    playback: PlaybackControl,
    rng: R,
    phase: SweepPhase,
    sweeps: u64,
    frames: u64,
}

impl<R: Rng> RotationScheduler<R> {
    pub fn new(
        shape: ShapeConfig,
        circle: Circle,
        commit: FrameCommit,
        playback: PlaybackControl,
        rng: R,
    ) -> Self {
        Self {
            shape,
            circle,
            commit,
            playback,
            rng,
            phase: SweepPhase::SweepStart,
            sweeps: 0,
            frames: 0,
        }
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Runs sweeps until the shape is complete or quit is requested. Commit
    /// failures end the loop; there is no partial-frame recovery.
    pub fn run(&mut self) -> Result<SchedulerExit> {
        let point_count = self.shape.point_count();
        let animate = self.shape.animate();

        loop {
            self.phase = SweepPhase::SweepStart;
            let color = Color::random(&mut self.rng);
            self.sweeps += 1;
            tracing::debug!(sweep = self.sweeps, ?color, "sweep started");

            self.phase = SweepPhase::Stepping;
            for rotation in sweep_rotations(point_count, animate) {
                if !self.playback.wait_while_paused()? {
                    tracing::info!(frames = self.frames, "scheduler stopped on quit");
                    return Ok(SchedulerExit::Quit);
                }
                self.commit
                    .commit(&self.shape, &self.circle, rotation, color)?;
                self.frames += 1;
            }

            self.phase = SweepPhase::SweepEnd;
            if !animate {
                tracing::info!(frames = self.frames, "static shape drawn");
                return Ok(SchedulerExit::Completed);
            }
        }
    }
}

impl<R: Rng + Send + 'static> RotationScheduler<R> {
    /// Runs the scheduler on its own thread.
    pub fn spawn(mut self) -> Result<JoinHandle<Result<SchedulerExit>>> {
        thread::Builder::new()
            .name("scheduler".into())
            .spawn(move || self.run())
            .map_err(|err| KaleidoError::msg(format!("could not start scheduler: {err}")))
    }
}

impl<R> std::fmt::Debug for RotationScheduler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationScheduler")
            .field("shape", &self.shape)
            .field("phase", &self.phase)
            .field("sweeps", &self.sweeps)
            .field("frames", &self.frames)
            .finish()
    }
}
