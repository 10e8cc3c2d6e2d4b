// Music emoji left behind by the mouse while audio plays.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use super::canvas::SkyCanvas;

pub const EMOJI_COOLDOWN: Duration = Duration::from_millis(300);
pub const EMOJI_LIFETIME: Duration = Duration::from_millis(5000);
pub const MUSIC_EMOJIS: [&str; 5] = ["🎵", "🎶", "🎸", "🎤", "🎧"];

// How far a particle floats up over its lifetime, in virtual pixels.
const FLOAT_DISTANCE: f64 = 48.0;

#[derive(Debug, Clone)]
pub struct EmojiParticle {
    pub x: f64,
    pub y: f64,
    pub glyph: &'static str,
    pub created_at: Instant,
}

#[derive(Debug, Default)]
pub struct EmojiTrail {
    particles: Vec<EmojiParticle>,
    last_spawn: Option<Instant>,
}

impl EmojiTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn at the pointer unless the cooldown is still running.
    /// Returns whether a particle was added.
    pub fn spawn(&mut self, x: f64, y: f64, rng: &mut impl Rng, now: Instant) -> bool {
        if let Some(last) = self.last_spawn {
            if now.saturating_duration_since(last) < EMOJI_COOLDOWN {
                return false;
            }
        }
        let glyph = MUSIC_EMOJIS.choose(rng).copied().unwrap_or(MUSIC_EMOJIS[0]);
        self.particles.push(EmojiParticle {
            x,
            y,
            glyph,
            created_at: now,
        });
        self.last_spawn = Some(now);
        true
    }

    /// Drop every particle older than its lifetime.
    pub fn tick(&mut self, now: Instant) {
        self.particles
            .retain(|p| now.saturating_duration_since(p.created_at) < EMOJI_LIFETIME);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[EmojiParticle] {
        &self.particles
    }

    pub fn draw(&self, canvas: &mut SkyCanvas, now: Instant) {
        for particle in &self.particles {
            let age = now.saturating_duration_since(particle.created_at).as_secs_f64()
                / EMOJI_LIFETIME.as_secs_f64();
            canvas.put_wide(particle.x, particle.y - age.min(1.0) * FLOAT_DISTANCE, particle.glyph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cooldown_limits_spawn_rate() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut trail = EmojiTrail::new();
        let start = Instant::now();

        assert!(trail.spawn(10.0, 10.0, &mut rng, start));
        assert!(!trail.spawn(12.0, 10.0, &mut rng, start + Duration::from_millis(100)));
        assert!(!trail.spawn(14.0, 10.0, &mut rng, start + Duration::from_millis(299)));
        assert!(trail.spawn(16.0, 10.0, &mut rng, start + EMOJI_COOLDOWN));
        assert_eq!(trail.particles().len(), 2);
    }

    #[test]
    fn particles_expire_after_lifetime() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut trail = EmojiTrail::new();
        let start = Instant::now();
        trail.spawn(0.0, 0.0, &mut rng, start);
        trail.spawn(0.0, 0.0, &mut rng, start + Duration::from_secs(1));

        trail.tick(start + Duration::from_millis(4999));
        assert_eq!(trail.particles().len(), 2);
        trail.tick(start + EMOJI_LIFETIME);
        assert_eq!(trail.particles().len(), 1);
        trail.tick(start + Duration::from_secs(6));
        assert!(trail.particles().is_empty());
    }

    #[test]
    fn glyphs_come_from_the_music_set() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut trail = EmojiTrail::new();
        let start = Instant::now();
        for i in 0..20u64 {
            trail.spawn(0.0, 0.0, &mut rng, start + EMOJI_COOLDOWN * i as u32);
        }
        assert!(trail.particles().iter().all(|p| MUSIC_EMOJIS.contains(&p.glyph)));
    }
}
