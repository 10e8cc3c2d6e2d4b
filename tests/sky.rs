// Multi-frame sky runs: renderer ordering, precipitation lifecycle and the
// emoji trail, driven with a seeded RNG and a synthetic clock.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use skyplayer::config::SkyConfig;
use skyplayer::sky::emoji::EMOJI_LIFETIME;
use skyplayer::sky::precipitation::{EffectState, INIT_DELAY};
use skyplayer::sky::{Sky, Viewport};
use skyplayer::theme::SkyMode;

const FRAME: Duration = Duration::from_millis(33);

// ── Helpers ──────────────────────────────────────────────────────────────────

fn sky(mode: SkyMode, seed: u64) -> (Sky, Instant) {
    let now = Instant::now();
    let sky = Sky::with_rng(
        Viewport::from_cells(120, 40),
        mode,
        &SkyConfig::default(),
        StdRng::seed_from_u64(seed),
        now,
    );
    (sky, now)
}

fn run_frames(sky: &mut Sky, start: Instant, frames: u32) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += FRAME;
        sky.tick(now);
    }
    now
}

// ── Day rain ─────────────────────────────────────────────────────────────────

#[test]
fn test_day_rain_stays_attached_to_clouds() {
    let (mut sky, start) = sky(SkyMode::Day, 1);
    sky.set_playing(true, start);
    let now = run_frames(&mut sky, start, 200);

    assert_eq!(sky.precipitation().state(), EffectState::Day);
    let drops = sky.precipitation().raindrops();
    assert_eq!(drops.len(), sky.store().len() * SkyConfig::default().drops_per_cloud);

    for drop in drops.iter().filter(|d| d.active) {
        let cloud = sky.store().get(drop.cloud_index).unwrap();
        assert!(cloud.is_visible);
        // Never above the cloud body it falls from.
        assert!(drop.y >= cloud.bottom() - cloud.height * 0.1);
    }

    let area = Rect::new(0, 0, 120, 40);
    let mut buf = Buffer::empty(area);
    sky.render(area, &mut buf, now);
}

#[test]
fn test_drops_are_sorted_back_to_front() {
    let (mut sky, start) = sky(SkyMode::Day, 2);
    sky.set_playing(true, start);
    run_frames(&mut sky, start, 30);

    let order: Vec<i32> = sky
        .precipitation()
        .drops_back_to_front()
        .iter()
        .map(|d| d.z_index)
        .collect();
    assert!(order.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_pause_clears_rain_immediately() {
    let (mut sky, start) = sky(SkyMode::Day, 3);
    sky.set_playing(true, start);
    let now = run_frames(&mut sky, start, 10);
    assert!(!sky.precipitation().raindrops().is_empty());

    sky.set_playing(false, now);
    assert_eq!(sky.precipitation().state(), EffectState::Off);
    assert!(sky.precipitation().raindrops().is_empty());
    assert!(!sky.precipitation().is_pending());
}

// ── Night meteors ────────────────────────────────────────────────────────────

#[test]
fn test_meteors_appear_after_init_delay() {
    let (mut sky, start) = sky(SkyMode::Night, 4);
    sky.set_playing(true, start);
    assert!(sky.precipitation().is_pending());

    sky.tick(start + INIT_DELAY / 2);
    assert!(sky.precipitation().meteors().is_empty());

    sky.tick(start + INIT_DELAY);
    assert_eq!(sky.precipitation().meteors().len(), SkyConfig::default().meteor_count);
    assert!(sky.store().is_empty());
}

#[test]
fn test_meteors_keep_running_over_many_frames() {
    let (mut sky, start) = sky(SkyMode::Night, 5);
    sky.set_playing(true, start);
    run_frames(&mut sky, start, 600);
    assert_eq!(sky.precipitation().meteors().len(), SkyConfig::default().meteor_count);
    assert!(sky.precipitation().raindrops().is_empty());
}

#[test]
fn test_theme_switch_while_playing_rebuilds_effects() {
    let (mut sky, start) = sky(SkyMode::Night, 6);
    sky.set_playing(true, start);
    let now = run_frames(&mut sky, start, 10);
    assert!(!sky.precipitation().meteors().is_empty());

    sky.set_mode(SkyMode::Day, now);
    assert!(sky.precipitation().meteors().is_empty());
    assert!(!sky.store().is_empty());

    sky.tick(now + INIT_DELAY);
    assert_eq!(sky.precipitation().state(), EffectState::Day);
    assert!(!sky.precipitation().raindrops().is_empty());
}

// ── Emoji trail ──────────────────────────────────────────────────────────────

#[test]
fn test_emoji_trail_lifecycle() {
    let (mut sky, start) = sky(SkyMode::Day, 7);
    sky.set_playing(true, start);

    sky.pointer_moved(10, 10, start);
    // Inside the cooldown: ignored.
    sky.pointer_moved(11, 10, start + Duration::from_millis(100));
    assert_eq!(sky.emoji().particles().len(), 1);

    sky.pointer_moved(12, 10, start + Duration::from_millis(400));
    assert_eq!(sky.emoji().particles().len(), 2);

    sky.tick(start + EMOJI_LIFETIME + Duration::from_millis(1));
    assert_eq!(sky.emoji().particles().len(), 1);
    sky.tick(start + EMOJI_LIFETIME + Duration::from_millis(401));
    assert!(sky.emoji().particles().is_empty());
}

#[test]
fn test_emoji_disabled_by_config() {
    let now = Instant::now();
    let config = SkyConfig {
        emoji: false,
        ..SkyConfig::default()
    };
    let mut sky = Sky::with_rng(
        Viewport::from_cells(80, 24),
        SkyMode::Night,
        &config,
        StdRng::seed_from_u64(9),
        now,
    );
    sky.set_playing(true, now);
    sky.pointer_moved(5, 5, now);
    assert!(sky.emoji().particles().is_empty());
}

// ── Rendering edges ──────────────────────────────────────────────────────────

#[test]
fn test_render_into_tiny_areas() {
    for mode in [SkyMode::Day, SkyMode::Night] {
        let (mut sky, start) = sky(mode, 10);
        sky.set_playing(true, start);
        let now = run_frames(&mut sky, start, 20);
        sky.pointer_moved(0, 0, now);

        for (w, h) in [(0, 0), (1, 1), (3, 0), (0, 3), (2, 1)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            sky.render(area, &mut buf, now);
        }
    }
}

#[test]
fn test_shrink_then_grow_keeps_store_in_sync() {
    let (mut sky, start) = sky(SkyMode::Day, 11);
    sky.set_playing(true, start);
    let mut now = run_frames(&mut sky, start, 5);

    for (cols, rows) in [(20, 8), (200, 60), (1, 1), (120, 40)] {
        sky.resize(cols, rows, now);
        now = run_frames(&mut sky, now, 10);
        assert_eq!(sky.viewport(), Viewport::from_cells(cols, rows));
        assert_eq!(sky.store().len(), sky.day().clouds().len());
        for drop in sky.precipitation().raindrops() {
            assert!(drop.cloud_index < sky.store().len());
        }
    }
}
