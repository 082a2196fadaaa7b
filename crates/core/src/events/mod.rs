use std::path::PathBuf;

use crate::{
    playback::{PlaybackControl, PlaybackState},
    record::SnapshotWriter,
    render::{Rect, RenderHandle},
    Result,
};

/// Where the play/pause glyph sits, in surface space.
pub const CONTROL_REGION: Rect = Rect::new(20.0, 20.0, 100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    P,
    Space,
    S,
    Q,
    Other,
}

/// Raw input delivered by the host. Click coordinates are in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Key(KeyCode),
    Click { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    TogglePlayPause,
    SaveSnapshot,
    Quit,
}

pub fn route(event: HostEvent, region: &Rect) -> Option<Signal> {
    match event {
        HostEvent::Key(KeyCode::P | KeyCode::Space) => Some(Signal::TogglePlayPause),
        HostEvent::Key(KeyCode::S) => Some(Signal::SaveSnapshot),
        HostEvent::Key(KeyCode::Q) => Some(Signal::Quit),
        HostEvent::Key(KeyCode::Other) => None,
        HostEvent::Click { x, y } if region.contains(x, y) => Some(Signal::TogglePlayPause),
        HostEvent::Click { .. } => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Toggled(PlaybackState),
    Saved(PathBuf),
    Quit,
    Ignored,
}

/// Applies host signals to the running pipeline. Safe to use from the host
/// thread while the scheduler runs elsewhere.
#[derive(Debug, Clone)]
pub struct SignalDispatcher {
    playback: PlaybackControl,
    renderer: RenderHandle,
    snapshots: SnapshotWriter,
    region: Rect,
}

impl SignalDispatcher {
    pub fn new(playback: PlaybackControl, renderer: RenderHandle, snapshots: SnapshotWriter) -> Self {
        Self {
            playback,
            renderer,
            snapshots,
            region: CONTROL_REGION,
        }
    }

    pub fn handle(&self, event: HostEvent) -> Result<DispatchOutcome> {
        match route(event, &self.region) {
            Some(signal) => self.dispatch(signal),
            None => Ok(DispatchOutcome::Ignored),
        }
    }

    pub fn dispatch(&self, signal: Signal) -> Result<DispatchOutcome> {
        match signal {
            Signal::TogglePlayPause => Ok(DispatchOutcome::Toggled(self.playback.toggle()?)),
            Signal::SaveSnapshot => {
                let pixels = self.renderer.snapshot()?;
                Ok(DispatchOutcome::Saved(self.snapshots.save(&pixels)?))
            }
            Signal::Quit => {
                self.playback.request_quit()?;
                Ok(DispatchOutcome::Quit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::render::{PixelSurface, Renderer};

    #[test]
    fn routes_keys() {
        let region = CONTROL_REGION;
        assert_eq!(
            route(HostEvent::Key(KeyCode::P), &region),
            Some(Signal::TogglePlayPause)
        );
        assert_eq!(
            route(HostEvent::Key(KeyCode::Space), &region),
            Some(Signal::TogglePlayPause)
        );
        assert_eq!(
            route(HostEvent::Key(KeyCode::S), &region),
            Some(Signal::SaveSnapshot)
        );
        assert_eq!(route(HostEvent::Key(KeyCode::Q), &region), Some(Signal::Quit));
        assert_eq!(route(HostEvent::Key(KeyCode::Other), &region), None);
    }

    #[test]
    fn only_clicks_on_the_control_toggle() {
        let region = CONTROL_REGION;
        assert_eq!(
            route(HostEvent::Click { x: 60.0, y: 60.0 }, &region),
            Some(Signal::TogglePlayPause)
        );
        assert_eq!(route(HostEvent::Click { x: 500.0, y: 60.0 }, &region), None);
    }

    #[test]
    fn dispatches_into_the_pipeline() {
        let renderer = Renderer::spawn(PixelSurface::new(40, 20, 1, 0)).unwrap();
        let playback = PlaybackControl::new(Duration::from_millis(10));
        let dir = std::env::temp_dir().join(format!(
            "kaleidoscope-dispatch-{}",
            std::process::id()
        ));
        let dispatcher =
            SignalDispatcher::new(playback.clone(), renderer.handle(), SnapshotWriter::new(&dir));

        assert_eq!(
            dispatcher.handle(HostEvent::Key(KeyCode::Space)).unwrap(),
            DispatchOutcome::Toggled(PlaybackState::Paused)
        );
        assert_eq!(
            dispatcher.handle(HostEvent::Click { x: 0.0, y: 0.0 }).unwrap(),
            DispatchOutcome::Ignored
        );

        match dispatcher.handle(HostEvent::Key(KeyCode::S)).unwrap() {
            DispatchOutcome::Saved(path) => assert!(path.exists()),
            other => panic!("unexpected outcome {other:?}"),
        }

        assert_eq!(
            dispatcher.handle(HostEvent::Key(KeyCode::Q)).unwrap(),
            DispatchOutcome::Quit
        );
        assert!(playback.quit_requested().unwrap());

        renderer.shutdown().unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
