// Diagonal streaks shared by the night sky's shooting stars and the
// precipitation layer's meteors.

use std::time::Instant;

use super::canvas::{Rgb, SkyCanvas};

// Spacing of trail samples along the streak, in virtual pixels.
const TRAIL_STEP: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct Streak {
    pub x: f64,
    pub y: f64,
    pub len: f64,
    pub speed: f64,
    pub size: f64,
    pub wait_until: Instant,
    pub active: bool,
    pub opacity: f64,
}

/// Draw a fading trail from the head at (x, y) up and to the right.
pub fn draw_streak(canvas: &mut SkyCanvas, streak: &Streak, tail_dx: f64, color: Rgb, layer_alpha: f64) {
    let steps = (streak.len / TRAIL_STEP).ceil().max(1.0) as usize;
    let glyph = if streak.size >= 1.2 { '╱' } else { '/' };

    // Tail first so the bright head wins its cell.
    for i in (0..=steps).rev() {
        let t = i as f64 / steps as f64;
        let alpha = streak.opacity.max(0.0) * (1.0 - t) * layer_alpha;
        if alpha <= 0.02 {
            continue;
        }
        let px = streak.x + streak.len * tail_dx * t;
        let py = streak.y - streak.len * t;
        canvas.put_char(px, py, glyph, color, alpha);
    }
}
