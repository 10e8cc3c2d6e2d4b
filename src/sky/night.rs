// Night sky: drifting, twinkling stars, a handful of shooting stars, and a
// static moon. Self-contained; never touches the SkyStore.

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::Rng;

use super::canvas::{Rgb, SkyCanvas};
use super::streak::{draw_streak, Streak};
use super::Viewport;

pub const BRIGHTNESS_FLOOR: f64 = 0.2;
pub const BRIGHTNESS_CEILING: f64 = 1.0;
const MAX_STARS: usize = 1000;
const STAR_BOUNCE: f64 = 2.0;
const SHOOTING_STARS: usize = 5;

const NIGHT_BACKGROUND: Rgb = Rgb(0x0d, 0x0d, 0x0d);
const MOON_COLOR: Rgb = Rgb(0xe1, 0xe5, 0xeb);
const MOON_GLOW: Rgb = Rgb(210, 220, 230);
const CRATER_COLOR: Rgb = Rgb(200, 200, 210);
const MIN_MOON_RADIUS: f64 = 16.0;
// (dx, dy, r) relative to the moon radius.
const CRATERS: [(f64, f64, f64); 3] = [(-0.3, -0.2, 0.15), (0.4, 0.3, 0.1), (0.1, -0.4, 0.12)];

/// Star count for a viewport: one per two pixels of height, capped.
pub fn star_count(viewport: Viewport) -> usize {
    ((viewport.height / 2.0).floor() as usize).min(MAX_STARS)
}

#[derive(Debug, Clone)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    origin_y: f64,
    pub size: f64,
    pub speed: f64,
    pub brightness: f64,
    twinkle_speed: f64,
    twinkle_dir: f64,
    y_offset: f64,
    y_speed: f64,
}

impl Star {
    fn spawn(rng: &mut impl Rng, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            origin_y: y,
            size: rng.gen_range(0.0..1.5),
            speed: rng.gen_range(0.02..0.07),
            brightness: rng.gen_range(0.5..1.0),
            twinkle_speed: rng.gen_range(0.005..0.025),
            twinkle_dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            y_offset: 0.0,
            y_speed: rng.gen_range(-0.01..0.01),
        }
    }

    fn recycle(&mut self, rng: &mut impl Rng, viewport: Viewport) {
        self.size = rng.gen_range(0.0..1.5);
        self.speed = rng.gen_range(0.02..0.07);
        self.x = viewport.width;
        self.y = rng.gen_range(0.0..viewport.height.max(1.0));
        self.origin_y = self.y;
        self.brightness = rng.gen_range(0.5..1.0);
    }

    fn step(&mut self, rng: &mut impl Rng, viewport: Viewport) {
        self.x -= self.speed;

        self.y_offset += self.y_speed;
        if self.y_offset.abs() > STAR_BOUNCE {
            self.y_offset = self.y_offset.clamp(-STAR_BOUNCE, STAR_BOUNCE);
            self.y_speed = -self.y_speed;
        }
        self.y = self.origin_y + self.y_offset;

        self.brightness += self.twinkle_speed * self.twinkle_dir;
        if self.brightness > BRIGHTNESS_CEILING {
            self.brightness = BRIGHTNESS_CEILING;
            self.twinkle_dir = -1.0;
        } else if self.brightness < BRIGHTNESS_FLOOR {
            self.brightness = BRIGHTNESS_FLOOR;
            self.twinkle_dir = 1.0;
        }

        if self.x < 0.0 {
            self.recycle(rng, viewport);
        }
    }
}

/// Ranges for a streak pool. Shooting stars and meteors share the cycle
/// (wait, streak, fade, reset) but not the numbers.
#[derive(Debug, Clone)]
pub struct StreakProfile {
    pub x: Range<f64>,
    pub start_y: f64,
    pub len: Range<f64>,
    pub speed: Range<f64>,
    pub size: Range<f64>,
    pub wait_ms: Range<f64>,
    /// Horizontal speed as a fraction of the vertical speed.
    pub drift: f64,
    pub fade_per_frame: f64,
    /// Trail direction: x offset of the tail per unit of length.
    pub tail_dx: f64,
}

impl StreakProfile {
    pub fn shooting_star(viewport: Viewport) -> Self {
        Self {
            x: 0.0..viewport.width.max(1.0),
            start_y: 0.0,
            len: 20.0..100.0,
            speed: 8.0..23.0,
            size: 0.5..2.0,
            wait_ms: 500.0..2500.0,
            drift: 0.8,
            fade_per_frame: 0.02,
            tail_dx: 1.0,
        }
    }

    pub fn meteor(viewport: Viewport) -> Self {
        Self {
            x: 100.0..viewport.width.max(1.0) + 100.0,
            start_y: -50.0,
            len: 30.0..90.0,
            speed: 4.0..12.0,
            size: 0.8..2.0,
            wait_ms: 1000.0..4000.0,
            drift: 0.7,
            fade_per_frame: 0.015,
            tail_dx: 0.7,
        }
    }

    pub fn spawn(&self, rng: &mut impl Rng, now: Instant) -> Streak {
        let wait = Duration::from_secs_f64(rng.gen_range(self.wait_ms.clone()) / 1000.0);
        Streak {
            x: rng.gen_range(self.x.clone()),
            y: self.start_y,
            len: rng.gen_range(self.len.clone()),
            speed: rng.gen_range(self.speed.clone()),
            size: rng.gen_range(self.size.clone()),
            wait_until: now + wait,
            active: false,
            opacity: 1.0,
        }
    }

    /// Advance one streak, resetting it in place once it has run its course.
    pub fn step(&self, streak: &mut Streak, rng: &mut impl Rng, now: Instant, viewport: Viewport) {
        if !streak.active {
            if streak.wait_until <= now {
                streak.active = true;
            }
            return;
        }
        streak.x -= streak.speed * self.drift;
        streak.y += streak.speed;
        streak.opacity -= self.fade_per_frame;

        if streak.x < -streak.len || streak.y >= viewport.height || streak.opacity <= 0.0 {
            *streak = self.spawn(rng, now);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Moon {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Moon {
    pub fn place(viewport: Viewport) -> Self {
        Self {
            x: viewport.width * 0.8,
            y: viewport.height * 0.2,
            radius: (viewport.width.min(viewport.height) * 0.05).max(MIN_MOON_RADIUS),
        }
    }

    fn draw(&self, canvas: &mut SkyCanvas) {
        let Moon { x, y, radius: r } = *self;
        let glow = r * 3.0;
        canvas.fill_region(x - glow, y - glow, x + glow, y + glow, |px, py| {
            let d = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
            if d <= r {
                let on_crater = CRATERS.iter().any(|&(cx, cy, cr)| {
                    ((px - (x + cx * r)).powi(2) + (py - (y + cy * r)).powi(2)).sqrt() <= cr * r
                });
                let body = if on_crater {
                    MOON_COLOR.lerp(CRATER_COLOR, 0.4)
                } else {
                    MOON_COLOR
                };
                Some((body, 1.0))
            } else if d <= glow {
                // Radial glow: 0.3 at half radius, 0.1 midway, 0 at the rim.
                let t = ((d - r * 0.5) / (glow - r * 0.5)).clamp(0.0, 1.0);
                let alpha = if t < 0.5 {
                    0.3 - 0.4 * t
                } else {
                    0.1 - 0.2 * (t - 0.5)
                };
                Some((MOON_GLOW, alpha.max(0.0)))
            } else {
                None
            }
        });
    }
}

pub struct NightSky {
    viewport: Viewport,
    stars: Vec<Star>,
    shooting_stars: Vec<Streak>,
    profile: StreakProfile,
    moon: Moon,
}

impl NightSky {
    pub fn new(viewport: Viewport, rng: &mut impl Rng, now: Instant) -> Self {
        let profile = StreakProfile::shooting_star(viewport);
        let mut sky = Self {
            viewport,
            stars: Vec::new(),
            shooting_stars: Vec::new(),
            profile,
            moon: Moon::place(viewport),
        };
        sky.populate(rng, now);
        sky
    }

    fn populate(&mut self, rng: &mut impl Rng, now: Instant) {
        let w = self.viewport.width.max(1.0);
        let h = self.viewport.height.max(1.0);
        self.stars = (0..star_count(self.viewport))
            .map(|_| {
                let x = rng.gen_range(0.0..w);
                let y = rng.gen_range(0.0..h);
                Star::spawn(rng, x, y)
            })
            .collect();
        self.profile = StreakProfile::shooting_star(self.viewport);
        self.shooting_stars = (0..SHOOTING_STARS)
            .map(|_| self.profile.spawn(rng, now))
            .collect();
        self.moon = Moon::place(self.viewport);
    }

    pub fn resize(&mut self, viewport: Viewport, rng: &mut impl Rng, now: Instant) {
        self.viewport = viewport;
        self.populate(rng, now);
    }

    pub fn tick(&mut self, rng: &mut impl Rng, now: Instant) {
        for star in &mut self.stars {
            star.step(rng, self.viewport);
        }
        for streak in &mut self.shooting_stars {
            self.profile.step(streak, rng, now, self.viewport);
        }
    }

    pub fn draw(&self, canvas: &mut SkyCanvas) {
        canvas.fill_vertical_gradient(&[(0.0, NIGHT_BACKGROUND), (1.0, NIGHT_BACKGROUND)]);
        self.moon.draw(canvas);

        for star in &self.stars {
            // Sub-pixel stars still show, just dimmer.
            let level = star.brightness * (0.4 + star.size / 2.5);
            canvas.plot_dot(star.x, star.y, Rgb::WHITE, level.min(1.0));
        }
        for streak in self.shooting_stars.iter().filter(|s| s.active) {
            draw_streak(canvas, streak, self.profile.tail_dx, Rgb::WHITE, 1.0);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shooting_stars(&self) -> &[Streak] {
        &self.shooting_stars
    }

    pub fn moon(&self) -> Moon {
        self.moon
    }
}
