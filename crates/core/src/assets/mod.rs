use std::sync::Arc;

const BACKDROP: u32 = 0xFF_20_20_20;
const GLYPH: u32 = 0xFF_F0_F0_F0;

/// Small ARGB bitmap drawn over the pattern. Alpha is either fully opaque or
/// fully transparent; rows run top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Icon {
    pub fn solid(width: usize, height: usize, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; width * height],
        }
    }

    fn from_fn(size: usize, mut paint: impl FnMut(f32, f32) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for row in 0..size {
            for column in 0..size {
                // Sample at pixel centres, normalised to [0, 1].
                let x = (column as f32 + 0.5) / size as f32;
                let y = (row as f32 + 0.5) / size as f32;
                pixels.push(paint(x, y));
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Play,
    Pause,
}

/// The two playback glyphs, generated once and shared with the renderer.
#[derive(Debug, Clone)]
pub struct IconSet {
    play: Arc<Icon>,
    pause: Arc<Icon>,
}

impl IconSet {
    pub fn generate(size: usize) -> Self {
        Self {
            play: Arc::new(Icon::from_fn(size, |x, y| {
                glyph_or_backdrop(x, y, in_play_triangle(x, y))
            })),
            pause: Arc::new(Icon::from_fn(size, |x, y| {
                glyph_or_backdrop(x, y, in_pause_bars(x, y))
            })),
        }
    }

    pub fn get(&self, kind: IconKind) -> Arc<Icon> {
        match kind {
            IconKind::Play => self.play.clone(),
            IconKind::Pause => self.pause.clone(),
        }
    }
}

fn glyph_or_backdrop(x: f32, y: f32, on_glyph: bool) -> u32 {
    let (dx, dy) = (x - 0.5, y - 0.5);
    if dx * dx + dy * dy > 0.25 {
        0
    } else if on_glyph {
        GLYPH
    } else {
        BACKDROP
    }
}

fn in_play_triangle(x: f32, y: f32) -> bool {
    let (left, tip) = (0.35, 0.75);
    if !(left..=tip).contains(&x) {
        return false;
    }
    let half_height = 0.25 * (tip - x) / (tip - left);
    (y - 0.5).abs() <= half_height
}

fn in_pause_bars(x: f32, y: f32) -> bool {
    let in_column = (0.32..=0.44).contains(&x) || (0.56..=0.68).contains(&x);
    in_column && (0.28..=0.72).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(icon: &Icon, column: usize, row: usize) -> u32 {
        icon.pixels[row * icon.width + column]
    }

    #[test]
    fn generates_square_icons() {
        let icons = IconSet::generate(100);
        for kind in [IconKind::Play, IconKind::Pause] {
            let icon = icons.get(kind);
            assert_eq!((icon.width, icon.height), (100, 100));
            assert_eq!(icon.pixels.len(), 10_000);
        }
    }

    #[test]
    fn corners_are_transparent() {
        let icon = IconSet::generate(100).get(IconKind::Play);
        assert_eq!(at(&icon, 0, 0), 0);
        assert_eq!(at(&icon, 99, 99), 0);
    }

    #[test]
    fn glyphs_differ_in_the_middle() {
        let icons = IconSet::generate(100);
        let play = icons.get(IconKind::Play);
        let pause = icons.get(IconKind::Pause);

        // Centre of the triangle, but the gap between the pause bars.
        assert_eq!(at(&play, 50, 50), GLYPH);
        assert_eq!(at(&pause, 50, 50), BACKDROP);
        assert_eq!(at(&pause, 38, 50), GLYPH);
    }
}
