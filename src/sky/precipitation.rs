// Precipitation layer, active only while audio plays.
//
// Keyed on (is_playing, is_night): Off has no effects, Night runs a meteor
// pool, Day binds a fixed number of raindrops to every cloud in the
// SkyStore. Any key change or resize tears the pool down at once and
// rebuilds it after a short delay, giving the day renderer time to
// repopulate the store.

use std::time::{Duration, Instant};

use rand::Rng;

use super::canvas::{Rgb, SkyCanvas};
use super::night::StreakProfile;
use super::store::SkyStore;
use super::streak::{draw_streak, Streak};
use super::Viewport;

pub const INIT_DELAY: Duration = Duration::from_millis(100);

const RAIN_COLOR: Rgb = Rgb(100, 150, 255);
const RAIN_INTENSITY: f64 = 1.2;
pub const MIN_DEPTH_OPACITY: f64 = 0.5;
const DEPTH_FADE_FACTOR: f64 = 0.08;
const REFERENCE_CLOUD_WIDTH: f64 = 150.0;
const MIN_SIZE_RATIO: f64 = 0.3;
const DAY_LAYER_ALPHA: f64 = 0.8;
const NIGHT_LAYER_ALPHA: f64 = 0.6;
// Spacing of samples along a drop's length.
const DROP_STEP: f64 = 8.0;

/// Which effect set the playback state calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    Off,
    Night,
    Day,
}

impl EffectState {
    pub fn for_playback(is_playing: bool, is_night: bool) -> Self {
        match (is_playing, is_night) {
            (false, _) => EffectState::Off,
            (true, true) => EffectState::Night,
            (true, false) => EffectState::Day,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Raindrop {
    pub cloud_index: usize,
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
    pub speed: f64,
    pub opacity: f64,
    pub wind: f64,
    /// Copied from the parent cloud at spawn time.
    pub z_index: i32,
    pub active: bool,
}

impl Raindrop {
    fn new(cloud_index: usize, store: &SkyStore, rng: &mut impl Rng) -> Self {
        let mut drop = Raindrop {
            cloud_index,
            x: 0.0,
            y: 0.0,
            length: 0.0,
            width: 0.0,
            speed: 0.0,
            opacity: 0.0,
            wind: 0.0,
            z_index: 0,
            active: false,
        };
        drop.respawn(store, rng);
        drop
    }

    /// Re-emit from the parent cloud's current bottom edge, or go inactive
    /// when the parent is hidden.
    fn respawn(&mut self, store: &SkyStore, rng: &mut impl Rng) {
        let Some(cloud) = store.get(self.cloud_index).filter(|c| c.is_visible) else {
            self.active = false;
            return;
        };

        let ratio = (cloud.width / REFERENCE_CLOUD_WIDTH).max(MIN_SIZE_RATIO);
        self.length = rng.gen_range(8.0..23.0) * ratio;
        self.width = rng.gen_range(0.8..2.3) * ratio;
        self.speed = rng.gen_range(3.0..9.0) * ratio.sqrt();
        self.opacity = rng.gen_range(0.4..1.0);
        self.wind = rng.gen_range(-0.5..0.5) * ratio;
        self.z_index = cloud.z_index;

        let margin = cloud.height * 0.05;
        self.x = cloud.x + rng.gen_range(0.0..1.0) * cloud.width * 0.85 + cloud.width * 0.075;
        self.y = cloud.bottom() - margin + rng.gen_range(0.0..1.0) * margin * 2.0;
        self.active = true;
    }

    fn step(&mut self, store: &SkyStore, rng: &mut impl Rng, viewport: Viewport) {
        let Some(cloud) = store.get(self.cloud_index).filter(|c| c.is_visible) else {
            self.active = false;
            return;
        };
        if !self.active {
            self.respawn(store, rng);
            return;
        }

        // Risen above its cloud: the cloud moved or changed size under it.
        if self.y < cloud.bottom() - cloud.height * 0.1 {
            self.respawn(store, rng);
            return;
        }

        self.y += self.speed;
        self.x += self.wind;

        if self.y > viewport.height + self.length {
            self.respawn(store, rng);
        }
    }

    fn glyph(&self) -> char {
        let slope = self.wind / self.speed.max(f64::EPSILON);
        if slope > 0.08 {
            '╲'
        } else if slope < -0.08 {
            '╱'
        } else {
            '│'
        }
    }
}

/// Opacity multiplier for drops `depth` ranks behind the frontmost cloud.
pub fn depth_opacity(depth: i32) -> f64 {
    (1.0 - depth.max(0) as f64 * DEPTH_FADE_FACTOR).max(MIN_DEPTH_OPACITY)
}

#[derive(Debug)]
enum Effects {
    None,
    Meteors(Vec<Streak>),
    Rain(Vec<Raindrop>),
}

pub struct Precipitation {
    viewport: Viewport,
    state: EffectState,
    effects: Effects,
    rebuild_at: Option<Instant>,
    drops_per_cloud: usize,
    meteor_count: usize,
    meteor_profile: StreakProfile,
}

impl Precipitation {
    pub fn new(viewport: Viewport, drops_per_cloud: usize, meteor_count: usize) -> Self {
        Self {
            viewport,
            state: EffectState::Off,
            effects: Effects::None,
            rebuild_at: None,
            drops_per_cloud,
            meteor_count,
            meteor_profile: StreakProfile::meteor(viewport),
        }
    }

    pub fn state(&self) -> EffectState {
        self.state
    }

    /// True while a teardown is waiting for its delayed rebuild.
    pub fn is_pending(&self) -> bool {
        self.rebuild_at.is_some()
    }

    /// Apply the current playback key. A change clears every effect now and
    /// schedules the new set.
    pub fn set_state(&mut self, is_playing: bool, is_night: bool, now: Instant) {
        let next = EffectState::for_playback(is_playing, is_night);
        if next == self.state {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?next, "precipitation state change");
        self.state = next;
        self.teardown(now);
    }

    pub fn resize(&mut self, viewport: Viewport, now: Instant) {
        self.viewport = viewport;
        self.meteor_profile = StreakProfile::meteor(viewport);
        self.teardown(now);
    }

    fn teardown(&mut self, now: Instant) {
        self.effects = Effects::None;
        self.rebuild_at = match self.state {
            EffectState::Off => None,
            _ => Some(now + INIT_DELAY),
        };
    }

    fn rebuild(&mut self, store: &SkyStore, rng: &mut impl Rng, now: Instant) {
        self.effects = match self.state {
            EffectState::Off => Effects::None,
            EffectState::Night => Effects::Meteors(
                (0..self.meteor_count)
                    .map(|_| self.meteor_profile.spawn(rng, now))
                    .collect(),
            ),
            EffectState::Day => {
                let mut drops = Vec::with_capacity(store.len() * self.drops_per_cloud);
                for cloud_index in 0..store.len() {
                    for _ in 0..self.drops_per_cloud {
                        drops.push(Raindrop::new(cloud_index, store, rng));
                    }
                }
                Effects::Rain(drops)
            }
        };
    }

    /// Advance one frame. Reads the store, never writes it.
    pub fn tick(&mut self, store: &SkyStore, rng: &mut impl Rng, now: Instant) {
        if let Some(at) = self.rebuild_at {
            if now < at {
                return;
            }
            self.rebuild_at = None;
            self.rebuild(store, rng, now);
        }

        // Built while the store was still empty: retry once clouds exist.
        if matches!(&self.effects, Effects::Rain(drops) if drops.is_empty()) && !store.is_empty() {
            self.rebuild(store, rng, now);
        }

        let viewport = self.viewport;
        match &mut self.effects {
            Effects::None => {}
            Effects::Meteors(meteors) => {
                for meteor in meteors.iter_mut() {
                    self.meteor_profile.step(meteor, rng, now, viewport);
                }
            }
            Effects::Rain(drops) => {
                for drop in drops.iter_mut() {
                    drop.step(store, rng, viewport);
                }
            }
        }
    }

    pub fn raindrops(&self) -> &[Raindrop] {
        match &self.effects {
            Effects::Rain(drops) => drops,
            _ => &[],
        }
    }

    pub fn meteors(&self) -> &[Streak] {
        match &self.effects {
            Effects::Meteors(meteors) => meteors,
            _ => &[],
        }
    }

    /// Active drops sorted farthest cloud first.
    pub fn drops_back_to_front(&self) -> Vec<&Raindrop> {
        let mut drops: Vec<&Raindrop> = self.raindrops().iter().filter(|d| d.active).collect();
        drops.sort_by_key(|d| d.z_index);
        drops
    }

    pub fn draw(&self, canvas: &mut SkyCanvas) {
        match &self.effects {
            Effects::None => {}
            Effects::Meteors(meteors) => {
                for meteor in meteors.iter().filter(|m| m.active) {
                    draw_streak(
                        canvas,
                        meteor,
                        self.meteor_profile.tail_dx,
                        Rgb::WHITE,
                        NIGHT_LAYER_ALPHA,
                    );
                }
            }
            Effects::Rain(_) => {
                let drops = self.drops_back_to_front();
                let front = drops.last().map_or(0, |d| d.z_index);
                for drop in drops {
                    let depth = depth_opacity(front - drop.z_index);
                    let alpha = (drop.opacity * depth * RAIN_INTENSITY).min(1.0) * DAY_LAYER_ALPHA;
                    draw_drop(canvas, drop, alpha);
                }
            }
        }
    }
}

// Bright at the top, fading towards the tail like a gradient stroke.
fn draw_drop(canvas: &mut SkyCanvas, drop: &Raindrop, alpha: f64) {
    let glyph = drop.glyph();
    let steps = (drop.length / DROP_STEP).ceil().max(1.0) as usize;
    for i in (0..steps).rev() {
        let t = i as f64 / steps as f64;
        let a = alpha * (1.0 - t);
        canvas.put_char(drop.x + drop.wind * t, drop.y + drop.length * t, glyph, RAIN_COLOR, a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::store::{depth_order, CloudSnapshot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cloud(x: f64, y: f64, width: f64) -> CloudSnapshot {
        CloudSnapshot {
            x,
            y,
            width,
            height: width * 0.6,
            speed: 0.2,
            is_visible: true,
            z_index: depth_order(width, y),
        }
    }

    fn store_with(clouds: Vec<CloudSnapshot>) -> SkyStore {
        let mut store = SkyStore::new();
        store.reset(clouds);
        store
    }

    fn started(store: &SkyStore, is_night: bool) -> (Precipitation, StdRng, Instant) {
        let mut rng = StdRng::seed_from_u64(21);
        let now = Instant::now();
        let mut rain = Precipitation::new(Viewport::new(800.0, 600.0), 4, 5);
        rain.set_state(true, is_night, now);
        let later = now + INIT_DELAY;
        rain.tick(store, &mut rng, later);
        (rain, rng, later)
    }

    #[test]
    fn day_binds_drops_to_every_cloud() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0), cloud(400.0, 80.0, 200.0)]);
        let (rain, _, _) = started(&store, false);
        assert_eq!(rain.state(), EffectState::Day);
        assert_eq!(rain.raindrops().len(), 8);
        assert_eq!(rain.raindrops().iter().filter(|d| d.cloud_index == 1).count(), 4);
        assert!(rain.meteors().is_empty());
    }

    #[test]
    fn drops_spawn_under_their_cloud() {
        let parent = cloud(100.0, 50.0, 120.0);
        let store = store_with(vec![parent]);
        let (rain, _, _) = started(&store, false);
        for drop in rain.raindrops() {
            assert!(drop.active);
            assert!(drop.x >= parent.x && drop.x <= parent.x + parent.width);
            assert!((drop.y - parent.bottom()).abs() <= parent.height * 0.05 + 1e-9);
            assert_eq!(drop.z_index, parent.z_index);
        }
    }

    #[test]
    fn invisible_parent_deactivates_within_one_frame() {
        let mut store = store_with(vec![cloud(100.0, 50.0, 120.0)]);
        let (mut rain, mut rng, now) = started(&store, false);

        let mut hidden = *store.get(0).unwrap();
        hidden.is_visible = false;
        store.publish(0, hidden);
        rain.tick(&store, &mut rng, now);

        assert!(rain.raindrops().iter().all(|d| !d.active));
        assert!(rain.drops_back_to_front().is_empty());
    }

    #[test]
    fn drop_recycles_under_same_cloud_after_leaving_viewport() {
        let parent = cloud(100.0, 50.0, 120.0);
        let store = store_with(vec![parent]);
        let (mut rain, mut rng, now) = started(&store, false);

        for _ in 0..400 {
            rain.tick(&store, &mut rng, now);
            for drop in rain.raindrops() {
                assert!(drop.y <= 600.0 + drop.length + drop.speed);
                assert_eq!(drop.cloud_index, 0);
            }
        }
    }

    #[test]
    fn night_runs_meteors_only() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0)]);
        let (rain, _, _) = started(&store, true);
        assert_eq!(rain.state(), EffectState::Night);
        assert_eq!(rain.meteors().len(), 5);
        assert!(rain.raindrops().is_empty());
    }

    #[test]
    fn every_transition_leaves_only_the_new_set() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0), cloud(300.0, 20.0, 90.0)]);
        let keys = [(true, true), (true, false), (false, true), (true, false), (true, true), (false, false)];
        let mut rng = StdRng::seed_from_u64(4);
        let mut now = Instant::now();
        let mut rain = Precipitation::new(Viewport::new(800.0, 600.0), 4, 5);

        for (playing, night) in keys {
            rain.set_state(playing, night, now);
            // Torn down immediately, before any rebuild.
            assert!(rain.raindrops().is_empty() && rain.meteors().is_empty());

            now += INIT_DELAY + Duration::from_millis(1);
            rain.tick(&store, &mut rng, now);
            match EffectState::for_playback(playing, night) {
                EffectState::Off => {
                    assert!(rain.raindrops().is_empty() && rain.meteors().is_empty());
                }
                EffectState::Night => {
                    assert_eq!(rain.meteors().len(), 5);
                    assert!(rain.raindrops().is_empty());
                }
                EffectState::Day => {
                    assert_eq!(rain.raindrops().len(), 8);
                    assert!(rain.meteors().is_empty());
                }
            }
        }
    }

    #[test]
    fn rebuild_waits_for_init_delay() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let now = Instant::now();
        let mut rain = Precipitation::new(Viewport::new(800.0, 600.0), 4, 5);
        rain.set_state(true, false, now);
        rain.tick(&store, &mut rng, now + Duration::from_millis(10));
        assert!(rain.is_pending());
        assert!(rain.raindrops().is_empty());
        rain.tick(&store, &mut rng, now + INIT_DELAY);
        assert!(!rain.is_pending());
        assert_eq!(rain.raindrops().len(), 4);
    }

    #[test]
    fn empty_store_yields_no_drops_until_populated() {
        let empty = SkyStore::new();
        let (mut rain, mut rng, now) = started(&empty, false);
        assert!(rain.raindrops().is_empty());

        let store = store_with(vec![cloud(10.0, 10.0, 100.0)]);
        rain.tick(&store, &mut rng, now);
        assert_eq!(rain.raindrops().len(), 4);
    }

    #[test]
    fn resize_forces_reconstruction() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0)]);
        let (mut rain, mut rng, now) = started(&store, false);
        rain.resize(Viewport::new(400.0, 300.0), now);
        assert!(rain.raindrops().is_empty());
        rain.tick(&store, &mut rng, now + INIT_DELAY);
        assert_eq!(rain.raindrops().len(), 4);
    }

    #[test]
    fn drops_draw_farthest_cloud_first() {
        let store = store_with(vec![
            cloud(100.0, 300.0, 250.0),
            cloud(400.0, 10.0, 70.0),
            cloud(600.0, 150.0, 150.0),
        ]);
        let (rain, _, _) = started(&store, false);
        let order: Vec<i32> = rain.drops_back_to_front().iter().map(|d| d.z_index).collect();
        assert!(order.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(order.first().copied(), Some(store.get(1).unwrap().z_index));
    }

    #[test]
    fn farther_drops_are_fainter_but_never_vanish() {
        assert_eq!(depth_opacity(0), 1.0);
        assert!(depth_opacity(3) < depth_opacity(1));
        assert_eq!(depth_opacity(50), MIN_DEPTH_OPACITY);
    }

    #[test]
    fn stopping_clears_immediately() {
        let store = store_with(vec![cloud(100.0, 50.0, 120.0)]);
        let (mut rain, _, now) = started(&store, false);
        rain.set_state(false, false, now);
        assert_eq!(rain.state(), EffectState::Off);
        assert!(rain.raindrops().is_empty());
        assert!(!rain.is_pending());
    }
}
