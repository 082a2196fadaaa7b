use std::{sync::Arc, thread::JoinHandle};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    assets::{IconKind, IconSet},
    commit::FrameCommit,
    compute::SegmentPool,
    events::{SignalDispatcher, CONTROL_REGION},
    geometry::Circle,
    playback::{IconSink, OverlayIcons, PlaybackControl},
    record::SnapshotWriter,
    render::{RenderHandle, Renderer, Surface},
    scheduler::{RotationScheduler, SchedulerExit},
    AppConfig, KaleidoError, Result, ShapeConfig,
};

/// Fully wired pipeline: renderer thread, worker pool and scheduler thread.
#[derive(Debug)]
pub struct Pipeline<S> {
    renderer: Renderer<S>,
    playback: PlaybackControl,
    dispatcher: SignalDispatcher,
    scheduler: Option<JoinHandle<Result<SchedulerExit>>>,
}

impl<S: Surface + 'static> Pipeline<S> {
    /// Takes ownership of the surface and starts animating.
    pub fn start(shape: ShapeConfig, config: &AppConfig, surface: S) -> Result<Self> {
        config.validate()?;
        let (width, height) = surface.size();
        let circle = Circle::inscribed(width, height);

        let renderer = Renderer::spawn(surface)?;
        let handle = renderer.handle();

        let icons: Arc<dyn IconSink> = Arc::new(OverlayIcons::new(
            handle.clone(),
            IconSet::generate(CONTROL_REGION.width as usize),
            CONTROL_REGION,
        ));
        icons.show_icon(IconKind::Pause)?;

        let playback =
            PlaybackControl::new(config.playback.poll_interval()).with_icons(icons);
        let pool = SegmentPool::new(config.pool.resolved_workers())?;
        tracing::info!(
            points = shape.point_count(),
            animate = shape.animate(),
            workers = pool.workers(),
            width,
            height,
            "pipeline starting"
        );

        let scheduler = RotationScheduler::new(
            shape,
            circle,
            FrameCommit::new(pool, handle.clone()),
            playback.clone(),
            StdRng::from_entropy(),
        )
        .spawn()?;

        let dispatcher = SignalDispatcher::new(
            playback.clone(),
            handle,
            SnapshotWriter::new(&config.snapshot.directory),
        );

        Ok(Self {
            renderer,
            playback,
            dispatcher,
            scheduler: Some(scheduler),
        })
    }

    pub fn dispatcher(&self) -> &SignalDispatcher {
        &self.dispatcher
    }

    pub fn renderer(&self) -> RenderHandle {
        self.renderer.handle()
    }

    /// Collects the scheduler result if its thread has finished. A static
    /// shape finishes after one frame while the host keeps serving input.
    pub fn poll_scheduler(&mut self) -> Result<Option<SchedulerExit>> {
        match self.scheduler.take() {
            Some(thread) if thread.is_finished() => join_scheduler(thread).map(Some),
            other => {
                self.scheduler = other;
                Ok(None)
            }
        }
    }

    /// Requests quit, waits for the scheduler and hands the surface back.
    pub fn shutdown(mut self) -> Result<S> {
        self.playback.request_quit()?;
        if let Some(thread) = self.scheduler.take() {
            join_scheduler(thread)?;
        }
        self.renderer.shutdown()
    }
}

fn join_scheduler(thread: JoinHandle<Result<SchedulerExit>>) -> Result<SchedulerExit> {
    thread
        .join()
        .map_err(|_| KaleidoError::msg("scheduler thread panicked"))?
}
