// Rasterizer for the sky layers.
//
// Renderers work in virtual pixels: one terminal cell is 8 × 16 px. Solid
// fills land on a half-cell grid (drawn with the upper-half-block glyph,
// foreground = top half, background = bottom half). Point lights use braille
// dots (2 × 4 per cell). Single glyphs are alpha-blended against whatever the
// fills left in that cell.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, style::Style};

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;
const HALF_CELL_PX: f64 = CELL_HEIGHT_PX / 2.0;
const DOT_WIDTH_PX: f64 = CELL_WIDTH_PX / 2.0;
const DOT_HEIGHT_PX: f64 = CELL_HEIGHT_PX / 4.0;

const UPPER_HALF_BLOCK: char = '▀';

// Braille bit for dot (column, row) inside a cell.
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Linear interpolation in RGB space, `t` clamped to 0..=1.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.0, c.1, c.2)
    }
}

#[derive(Debug, Clone)]
enum Glyph {
    Dots { bits: u8, color: Rgb, level: f64 },
    Char { ch: char, fg: Rgb },
    Wide(&'static str),
}

/// Off-screen surface covering a `cols × rows` cell area.
pub struct SkyCanvas {
    cols: usize,
    rows: usize,
    pixels: Vec<Rgb>,
    glyphs: Vec<Option<Glyph>>,
}

impl SkyCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            pixels: vec![Rgb::default(); cols * rows * 2],
            glyphs: vec![None; cols * rows],
        }
    }

    pub fn width_px(&self) -> f64 {
        self.cols as f64 * CELL_WIDTH_PX
    }

    pub fn height_px(&self) -> f64 {
        self.rows as f64 * CELL_HEIGHT_PX
    }

    fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / CELL_WIDTH_PX) as usize;
        let row = (y / CELL_HEIGHT_PX) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// Paint every half-row with a vertical gradient. `stops` are
    /// `(offset, color)` pairs with offsets ascending in 0..=1.
    pub fn fill_vertical_gradient(&mut self, stops: &[(f64, Rgb)]) {
        let half_rows = self.rows * 2;
        for hr in 0..half_rows {
            let t = (hr as f64 + 0.5) / half_rows.max(1) as f64;
            let color = gradient_at(stops, t);
            let start = hr * self.cols;
            self.pixels[start..start + self.cols].fill(color);
        }
    }

    /// Blend `shade(x, y)` into every half-cell whose centre lies in the box.
    /// `shade` returns the color and its coverage alpha, or `None` to skip.
    pub fn fill_region<F>(&mut self, left: f64, top: f64, right: f64, bottom: f64, shade: F)
    where
        F: Fn(f64, f64) -> Option<(Rgb, f64)>,
    {
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        let first_col = (left / CELL_WIDTH_PX).floor().max(0.0) as usize;
        let last_col = ((right / CELL_WIDTH_PX).ceil().max(0.0) as usize).min(self.cols);
        let first_hr = (top / HALF_CELL_PX).floor().max(0.0) as usize;
        let last_hr = ((bottom / HALF_CELL_PX).ceil().max(0.0) as usize).min(self.rows * 2);

        for hr in first_hr..last_hr {
            let cy = (hr as f64 + 0.5) * HALF_CELL_PX;
            for col in first_col..last_col {
                let cx = (col as f64 + 0.5) * CELL_WIDTH_PX;
                if let Some((color, alpha)) = shade(cx, cy) {
                    let px = &mut self.pixels[hr * self.cols + col];
                    *px = px.lerp(color, alpha);
                }
            }
        }
    }

    /// Mean of the two half-cell colors under the cell containing (x, y).
    pub fn background_at(&self, x: f64, y: f64) -> Option<Rgb> {
        let (col, row) = self.cell_at(x, y)?;
        Some(self.cell_background(col, row))
    }

    fn cell_background(&self, col: usize, row: usize) -> Rgb {
        let top = self.pixels[row * 2 * self.cols + col];
        let bottom = self.pixels[(row * 2 + 1) * self.cols + col];
        top.lerp(bottom, 0.5)
    }

    /// Light one braille dot. Several dots in a cell share the brightest level.
    pub fn plot_dot(&mut self, x: f64, y: f64, color: Rgb, level: f64) {
        let Some((col, row)) = self.cell_at(x, y) else {
            return;
        };
        let dx = ((x - col as f64 * CELL_WIDTH_PX) / DOT_WIDTH_PX) as usize;
        let dy = ((y - row as f64 * CELL_HEIGHT_PX) / DOT_HEIGHT_PX) as usize;
        let bit = DOT_BITS[dx.min(1)][dy.min(3)];
        let slot = &mut self.glyphs[row * self.cols + col];
        match slot {
            Some(Glyph::Dots {
                bits,
                color: c,
                level: l,
            }) => {
                *bits |= bit;
                if level > *l {
                    *l = level;
                    *c = color;
                }
            }
            _ => {
                *slot = Some(Glyph::Dots {
                    bits: bit,
                    color,
                    level,
                })
            }
        }
    }

    /// Place a glyph at (x, y), blended at `alpha` over the cell background.
    /// Later calls win, so callers draw back to front.
    pub fn put_char(&mut self, x: f64, y: f64, ch: char, color: Rgb, alpha: f64) {
        let Some((col, row)) = self.cell_at(x, y) else {
            return;
        };
        let fg = self.cell_background(col, row).lerp(color, alpha);
        self.glyphs[row * self.cols + col] = Some(Glyph::Char { ch, fg });
    }

    /// Place a double-width glyph (emoji) at (x, y).
    pub fn put_wide(&mut self, x: f64, y: f64, text: &'static str) {
        let Some((col, row)) = self.cell_at(x, y) else {
            return;
        };
        if col + 1 < self.cols {
            self.glyphs[row * self.cols + col] = Some(Glyph::Wide(text));
            self.glyphs[row * self.cols + col + 1] = None;
        }
    }

    /// Copy the surface onto `buf` at `area`'s origin.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width as usize);
        let rows = self.rows.min(area.height as usize);
        let mut wide = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                let x = area.x + col as u16;
                let y = area.y + row as u16;
                let Some(cell) = buf.cell_mut((x, y)) else {
                    continue;
                };
                let bg = self.cell_background(col, row);
                match &self.glyphs[row * self.cols + col] {
                    None => {
                        cell.set_char(UPPER_HALF_BLOCK);
                        cell.set_fg(self.pixels[row * 2 * self.cols + col].into());
                        cell.set_bg(self.pixels[(row * 2 + 1) * self.cols + col].into());
                    }
                    Some(Glyph::Dots { bits, color, level }) => {
                        let ch = char::from_u32(0x2800 + *bits as u32).unwrap_or(' ');
                        cell.set_char(ch);
                        cell.set_fg(bg.lerp(*color, *level).into());
                        cell.set_bg(bg.into());
                    }
                    Some(Glyph::Char { ch, fg }) => {
                        cell.set_char(*ch);
                        cell.set_fg((*fg).into());
                        cell.set_bg(bg.into());
                    }
                    Some(Glyph::Wide(text)) => {
                        cell.set_char(' ');
                        cell.set_bg(bg.into());
                        wide.push((x, y, *text, bg));
                    }
                }
            }
        }

        // Wide glyphs span two cells, so they go on after the grid is filled.
        for (x, y, text, bg) in wide {
            buf.set_string(x, y, text, Style::default().bg(bg.into()));
        }
    }
}

/// Sample a multi-stop gradient at `t`.
pub fn gradient_at(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    let Some(&(first_at, first)) = stops.first() else {
        return Rgb::default();
    };
    if t <= first_at {
        return first;
    }
    for pair in stops.windows(2) {
        let (a_at, a) = pair[0];
        let (b_at, b) = pair[1];
        if t <= b_at {
            let span = (b_at - a_at).max(f64::EPSILON);
            return a.lerp(b, (t - a_at) / span);
        }
    }
    stops[stops.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_between_stops() {
        let stops = [(0.0, Rgb(0, 0, 0)), (1.0, Rgb(200, 100, 50))];
        assert_eq!(gradient_at(&stops, 0.0), Rgb(0, 0, 0));
        assert_eq!(gradient_at(&stops, 0.5), Rgb(100, 50, 25));
        assert_eq!(gradient_at(&stops, 2.0), Rgb(200, 100, 50));
    }

    #[test]
    fn dots_in_one_cell_merge() {
        let mut canvas = SkyCanvas::new(4, 2);
        canvas.plot_dot(1.0, 1.0, Rgb::WHITE, 0.3);
        canvas.plot_dot(5.0, 13.0, Rgb::WHITE, 0.9);

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        canvas.render(area, &mut buf);
        let expected = char::from_u32(0x2800 + 0x01 + 0x80).unwrap();
        assert_eq!(buf[(0, 0)].symbol(), expected.to_string());
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut canvas = SkyCanvas::new(2, 2);
        canvas.put_char(-3.0, 4.0, '|', Rgb::WHITE, 1.0);
        canvas.put_char(400.0, 4.0, '|', Rgb::WHITE, 1.0);
        canvas.plot_dot(4.0, 999.0, Rgb::WHITE, 1.0);
        assert!(canvas.glyphs.iter().all(Option::is_none));
    }

    #[test]
    fn empty_cells_render_as_half_blocks() {
        let mut canvas = SkyCanvas::new(1, 1);
        canvas.fill_vertical_gradient(&[(0.0, Rgb(0, 0, 0)), (1.0, Rgb(0, 0, 0))]);
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        canvas.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▀");
    }
}
