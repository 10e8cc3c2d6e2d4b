// Day sky: a field of procedural clouds drifting right-to-left.
//
// The renderer owns the cloud records and is the single writer of the
// SkyStore. Every frame each cloud moves, is recycled past the left edge,
// and its snapshot is published to its slot.

use std::ops::Range;

use rand::Rng;

use super::canvas::{Rgb, SkyCanvas};
use super::store::{depth_order, CloudSnapshot, SkyStore};
use super::Viewport;

const CLOUD_HEIGHT_RATIO: f64 = 0.6;
/// Clouds live in the top 70% of the sky.
const CLOUD_BAND: f64 = 0.7;
const CLOUD_SPEED: Range<f64> = 0.1..0.4;
const WIDTH_PER_EXTRA_CLOUD: f64 = 300.0;
const MIN_CLOUDS: usize = 5;
const CLOUD_ALPHA: f64 = 0.95;

const SKY_GRADIENT: [(f64, Rgb); 3] = [
    (0.0, Rgb(0x64, 0xb5, 0xf6)),
    (0.5, Rgb(0x90, 0xca, 0xf9)),
    (1.0, Rgb(0xbb, 0xde, 0xfb)),
];
const CLOUD_TOP: Rgb = Rgb(255, 255, 255);
const CLOUD_BOTTOM: Rgb = Rgb(230, 230, 230);

// Cloud silhouette as ellipses in unit cloud space: (cx, cy, rx, ry).
const CLOUD_LOBES: [(f64, f64, f64, f64); 4] = [
    (0.50, 0.68, 0.40, 0.13),
    (0.30, 0.55, 0.16, 0.20),
    (0.50, 0.42, 0.18, 0.24),
    (0.70, 0.52, 0.17, 0.20),
];

/// Size tier used when the field is first populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudSize {
    Small,
    Medium,
    Large,
}

impl CloudSize {
    /// Round-robin tier for a slot so every field has a mix of sizes.
    pub fn for_slot(slot: usize) -> Self {
        match slot % 3 {
            0 => CloudSize::Small,
            1 => CloudSize::Medium,
            _ => CloudSize::Large,
        }
    }

    pub fn width_range(self) -> Range<f64> {
        match self {
            CloudSize::Small => 60.0..160.0,
            CloudSize::Medium => 100.0..250.0,
            CloudSize::Large => 80.0..280.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub is_visible: bool,
    pub z_index: i32,
}

impl Cloud {
    fn spawn(rng: &mut impl Rng, viewport: Viewport, size: CloudSize) -> Self {
        let width = rng.gen_range(size.width_range());
        let mut cloud = Cloud {
            x: rng.gen_range(0.0..viewport.width.max(1.0)),
            y: 0.0,
            width,
            height: width * CLOUD_HEIGHT_RATIO,
            speed: rng.gen_range(CLOUD_SPEED),
            is_visible: true,
            z_index: 0,
        };
        cloud.y = random_band_y(rng, viewport);
        cloud.refresh_depth();
        cloud
    }

    /// Recompute the depth rank from the current size and position.
    pub fn refresh_depth(&mut self) {
        self.z_index = depth_order(self.width, self.y);
    }

    fn step(&mut self, rng: &mut impl Rng, viewport: Viewport) {
        self.x -= self.speed;
        self.is_visible = self.x > -self.width && self.x < viewport.width + self.width;

        if self.x < -self.width {
            self.x = viewport.width + self.width;
            self.y = random_band_y(rng, viewport);
            self.speed = rng.gen_range(CLOUD_SPEED);
            self.is_visible = true;
        }
        self.refresh_depth();
    }

    pub fn snapshot(&self) -> CloudSnapshot {
        CloudSnapshot {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            speed: self.speed,
            is_visible: self.is_visible,
            z_index: self.z_index,
        }
    }

    fn draw(&self, canvas: &mut SkyCanvas) {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        canvas.fill_region(x, y, x + w, y + h, |px, py| {
            let u = (px - x) / w;
            let v = (py - y) / h;
            let inside = CLOUD_LOBES.iter().any(|&(cx, cy, rx, ry)| {
                let dx = (u - cx) / rx;
                let dy = (v - cy) / ry;
                dx * dx + dy * dy <= 1.0
            });
            inside.then(|| (CLOUD_TOP.lerp(CLOUD_BOTTOM, (v - 0.2) / 0.6), CLOUD_ALPHA))
        });
    }
}

fn random_band_y(rng: &mut impl Rng, viewport: Viewport) -> f64 {
    rng.gen_range(0.0..(viewport.height * CLOUD_BAND).max(1.0))
}

/// Number of clouds for a viewport: one per 300 px of width plus a floor.
pub fn cloud_count(viewport: Viewport) -> usize {
    (viewport.width / WIDTH_PER_EXTRA_CLOUD).floor() as usize + MIN_CLOUDS
}

pub struct DaySky {
    viewport: Viewport,
    clouds: Vec<Cloud>,
}

impl DaySky {
    /// Build a fresh cloud field and publish it to the store.
    pub fn new(viewport: Viewport, store: &mut SkyStore, rng: &mut impl Rng) -> Self {
        let mut sky = Self {
            viewport,
            clouds: Vec::new(),
        };
        sky.populate(store, rng);
        sky
    }

    fn populate(&mut self, store: &mut SkyStore, rng: &mut impl Rng) {
        self.clouds = (0..cloud_count(self.viewport))
            .map(|slot| Cloud::spawn(rng, self.viewport, CloudSize::for_slot(slot)))
            .collect();
        self.publish_all(store);
    }

    fn publish_all(&self, store: &mut SkyStore) {
        store.reset(self.clouds.iter().map(Cloud::snapshot).collect());
    }

    /// Remount: discard the field and start over.
    pub fn reset(&mut self, store: &mut SkyStore, rng: &mut impl Rng) {
        self.populate(store, rng);
    }

    /// Adapt to a new viewport. Surviving clouds keep their relative
    /// placement, new slots are filled randomly, and the store is rebuilt.
    pub fn resize(&mut self, viewport: Viewport, store: &mut SkyStore, rng: &mut impl Rng) {
        let old = self.viewport;
        self.viewport = viewport;

        let scale_x = viewport.width / old.width.max(1.0);
        let scale_y = viewport.height / old.height.max(1.0);
        let count = cloud_count(viewport);

        self.clouds.truncate(count);
        for cloud in &mut self.clouds {
            cloud.x = (cloud.x * scale_x)
                .clamp(-cloud.width * 0.5, viewport.width + cloud.width * 0.5);
            cloud.y = (cloud.y * scale_y).clamp(0.0, viewport.height * CLOUD_BAND);
            cloud.is_visible = true;
            cloud.refresh_depth();
        }
        for slot in self.clouds.len()..count {
            self.clouds
                .push(Cloud::spawn(rng, viewport, CloudSize::for_slot(slot)));
        }
        self.publish_all(store);
    }

    /// Advance one frame and publish every cloud to its slot.
    pub fn tick(&mut self, store: &mut SkyStore, rng: &mut impl Rng) {
        if store.len() != self.clouds.len() {
            self.publish_all(store);
        }
        for (slot, cloud) in self.clouds.iter_mut().enumerate() {
            cloud.step(rng, self.viewport);
            store.publish(slot, cloud.snapshot());
        }
    }

    /// Sky gradient, then clouds back to front.
    pub fn draw(&self, canvas: &mut SkyCanvas) {
        canvas.fill_vertical_gradient(&SKY_GRADIENT);

        let mut order: Vec<&Cloud> = self.clouds.iter().collect();
        order.sort_by_key(|c| c.z_index);
        for cloud in order {
            cloud.draw(canvas);
        }
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
