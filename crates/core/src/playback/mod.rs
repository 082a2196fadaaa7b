use std::{
    fmt,
    sync::{Arc, Condvar, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    assets::{IconKind, IconSet},
    render::{Rect, RenderHandle},
    KaleidoError, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
}

impl PlaybackState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }

    /// Glyph offered to the user: play while paused, pause while running.
    pub fn icon(self) -> IconKind {
        match self {
            Self::Running => IconKind::Pause,
            Self::Paused => IconKind::Play,
        }
    }
}

/// Receives the glyph to show after every toggle.
pub trait IconSink: Send + Sync {
    fn show_icon(&self, kind: IconKind) -> Result<()>;
}

/// Draws the playback glyph through the renderer at a fixed region.
#[derive(Debug, Clone)]
pub struct OverlayIcons {
    renderer: RenderHandle,
    icons: IconSet,
    region: Rect,
}

impl OverlayIcons {
    pub fn new(renderer: RenderHandle, icons: IconSet, region: Rect) -> Self {
        Self {
            renderer,
            icons,
            region,
        }
    }
}

impl IconSink for OverlayIcons {
    fn show_icon(&self, kind: IconKind) -> Result<()> {
        self.renderer.show_overlay(self.icons.get(kind), self.region)
    }
}

#[derive(Debug)]
struct Shared {
    state: PlaybackState,
    quit: bool,
}

/// Shared play/pause and quit flags.
///
/// Any thread may toggle or request quit; the scheduler parks in
/// [`PlaybackControl::wait_while_paused`] between steps.
#[derive(Clone)]
pub struct PlaybackControl {
    inner: Arc<(Mutex<Shared>, Condvar)>,
    poll_interval: Duration,
    icons: Option<Arc<dyn IconSink>>,
}

impl PlaybackControl {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new((
                Mutex::new(Shared {
                    state: PlaybackState::Running,
                    quit: false,
                }),
                Condvar::new(),
            )),
            poll_interval,
            icons: None,
        }
    }

    pub fn with_icons(mut self, icons: Arc<dyn IconSink>) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn state(&self) -> Result<PlaybackState> {
        Ok(self.lock()?.state)
    }

    /// Flips between running and paused and asks for the matching glyph.
    ///
    /// The glyph is requested under the lock so concurrent toggles reach the
    /// sink in the same order as their state changes. The render thread never
    /// takes this lock.
    pub fn toggle(&self) -> Result<PlaybackState> {
        let mut shared = self.lock()?;
        shared.state = shared.state.toggled();
        let state = shared.state;
        self.inner.1.notify_all();

        if let Some(icons) = &self.icons {
            icons.show_icon(state.icon())?;
        }
        drop(shared);

        tracing::info!(?state, "playback toggled");
        Ok(state)
    }

    pub fn request_quit(&self) -> Result<()> {
        self.lock()?.quit = true;
        self.inner.1.notify_all();
        Ok(())
    }

    pub fn quit_requested(&self) -> Result<bool> {
        Ok(self.lock()?.quit)
    }

    /// Blocks while paused, waking on toggles and at every poll interval.
    /// Returns `false` when quit has been requested.
    pub fn wait_while_paused(&self) -> Result<bool> {
        let (_, resumed) = &*self.inner;
        let mut shared = self.lock()?;
        if shared.state == PlaybackState::Paused && !shared.quit {
            tracing::debug!("stepping suspended");
        }
        while shared.state == PlaybackState::Paused && !shared.quit {
            let (guard, _) = resumed
                .wait_timeout(shared, self.poll_interval)
                .map_err(|_| KaleidoError::msg("playback state has been poisoned"))?;
            shared = guard;
        }
        Ok(!shared.quit)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shared>> {
        self.inner
            .0
            .lock()
            .map_err(|_| KaleidoError::msg("playback state has been poisoned"))
    }
}

impl fmt::Debug for PlaybackControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackControl")
            .field("poll_interval", &self.poll_interval)
            .field("icons", &self.icons.is_some())
            .finish()
    }
}
