use crate::{assets::Icon, geometry::Segment};

use super::{Color, PixelSnapshot, Rect, Surface};

/// Software surface backed by a 0RGB pixel buffer.
///
/// Drawing happens in surface space (y up); rows are flipped when pixels are
/// written so row 0 of the buffer is the top of the screen.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    line_width: u32,
    pixels: Vec<u32>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize, line_width: u32, background: u32) -> Self {
        Self {
            width,
            height,
            line_width: line_width.max(1),
            pixels: vec![background; width * height],
        }
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let row = self.height - 1 - y;
        self.pixels[row * self.width + x] = color;
    }

    fn put_pen(&mut self, x: i64, y: i64, color: u32) {
        let width = i64::from(self.line_width);
        let lo = -(width - 1) / 2;
        let hi = width / 2;
        for dy in lo..=hi {
            for dx in lo..=hi {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }

    // Bresenham, stamping the pen at every step.
    fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: u32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pen(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn stroke_segments(&mut self, segments: &[Segment], color: Color) {
        let color = color.to_u32();
        for segment in segments {
            self.draw_line(
                segment.start.x.round() as i64,
                segment.start.y.round() as i64,
                segment.end.x.round() as i64,
                segment.end.y.round() as i64,
                color,
            );
        }
    }

    /// Nearest-neighbour blit; fully transparent icon pixels are skipped.
    fn draw_image(&mut self, icon: &Icon, region: Rect) {
        let columns = region.width.max(0.0) as usize;
        let rows = region.height.max(0.0) as usize;
        if columns == 0 || rows == 0 || icon.width == 0 || icon.height == 0 {
            return;
        }

        let left = region.x.round() as i64;
        let top = (region.y + region.height).round() as i64 - 1;
        for row in 0..rows {
            let src_row = row * icon.height / rows;
            for column in 0..columns {
                let src_column = column * icon.width / columns;
                let argb = icon.pixels[src_row * icon.width + src_column];
                if argb >> 24 == 0 {
                    continue;
                }
                self.put_pixel(left + column as i64, top - row as i64, argb & 0x00_FF_FF_FF);
            }
        }
    }

    fn pixels(&self) -> PixelSnapshot {
        PixelSnapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    #[test]
    fn strokes_a_horizontal_segment() {
        let mut surface = PixelSurface::new(10, 10, 1, 0);
        let segment = Segment::new(Point::new(1.0, 2.0), Point::new(8.0, 2.0));
        surface.stroke_segments(&[segment], WHITE);

        let snapshot = surface.pixels();
        // y = 2 in surface space is row 7 counted from the top.
        for column in 1..=8 {
            assert_eq!(snapshot.pixel(column, 7), Some(0x00_FF_FF_FF));
        }
        assert_eq!(snapshot.pixel(0, 7), Some(0));
        assert_eq!(snapshot.pixel(1, 2), Some(0));
    }

    #[test]
    fn wide_pen_covers_neighbouring_rows() {
        let mut surface = PixelSurface::new(10, 10, 3, 0);
        let segment = Segment::new(Point::new(2.0, 5.0), Point::new(7.0, 5.0));
        surface.stroke_segments(&[segment], WHITE);

        let snapshot = surface.pixels();
        for row in 3..=5 {
            assert_eq!(snapshot.pixel(4, row), Some(0x00_FF_FF_FF));
        }
        assert_eq!(snapshot.pixel(4, 7), Some(0));
    }

    #[test]
    fn clips_segments_outside_the_surface() {
        let mut surface = PixelSurface::new(4, 4, 2, 0);
        let segment = Segment::new(Point::new(-10.0, -10.0), Point::new(20.0, 20.0));
        surface.stroke_segments(&[segment], WHITE);
        assert_eq!(surface.pixels().pixels.len(), 16);
    }

    #[test]
    fn blits_icons_with_transparency() {
        let mut surface = PixelSurface::new(8, 8, 1, 0x00_11_11_11);
        let mut icon = Icon::solid(2, 2, 0xFF_00_00_FF);
        icon.pixels[0] = 0;
        surface.draw_image(&icon, Rect::new(0.0, 0.0, 4.0, 4.0));

        let snapshot = surface.pixels();
        // Region bottom-left is the surface origin, so its top row is row 4.
        assert_eq!(snapshot.pixel(0, 4), Some(0x00_11_11_11));
        assert_eq!(snapshot.pixel(3, 4), Some(0x00_00_00_FF));
        assert_eq!(snapshot.pixel(0, 7), Some(0x00_00_00_FF));
        assert_eq!(snapshot.pixel(0, 3), Some(0x00_11_11_11));
    }
}
