use rand::seq::SliceRandom;
use rand::Rng;
use std::time::SystemTime;

/// Congratulatory lines shown when a quotation is fully transcribed.
const MESSAGES: &[&str] = &[
    "🎉 오늘 하루도 정말 수고했어요!",
    "🎉 한 문장을 온전히 옮겨 적었어요!",
    "🎉 참 잘했어요!",
];

/// One confetti particle falling across the results area.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *['✨', '🎉', '⭐', '💫', '🌟', '✓', '🎊']
                .choose(&mut rng)
                .unwrap_or(&'✨'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
        }
    }

    /// Advance by `dt` seconds; returns false once the particle expires.
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 15.0 * dt; // gravity
        self.age += dt;
        self.age < self.max_age
    }
}

/// The completion notification: a short confetti burst plus a message,
/// started exactly once per finished quotation and self-deactivating after
/// `duration` seconds.
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub message: &'static str,
    pub started_at: SystemTime,
    pub duration: f64,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            message: MESSAGES[0],
            started_at: SystemTime::now(),
            duration: 3.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = SystemTime::now();
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;
        self.message = MESSAGES.choose(&mut rng).copied().unwrap_or(MESSAGES[0]);

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        for _ in 0..25 {
            let offset_x = rng.gen_range(-15.0..15.0);
            let offset_y = rng.gen_range(-8.0..8.0);
            self.particles
                .push(Particle::new(center_x + offset_x, center_y + offset_y));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self
            .started_at
            .elapsed()
            .unwrap_or_default()
            .as_secs_f64();
        if elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let dt = 0.1; // fixed timestep
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            let buffer = 5.0;
            let off_screen = p.y > height + buffer || p.x < -buffer || p.x > width + buffer;
            alive && !off_screen
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive_and_empty() {
        let c = Celebration::new();
        assert!(!c.is_active);
        assert!(c.particles.is_empty());
    }

    #[test]
    fn start_spawns_particles_and_picks_a_message() {
        let mut c = Celebration::new();
        c.start(80, 24);
        assert!(c.is_active);
        assert!(!c.particles.is_empty());
        assert!(MESSAGES.contains(&c.message));
    }

    #[test]
    fn particles_fall_under_gravity() {
        let mut p = Particle::new(10.0, 10.0);
        let initial_vel_y = p.vel_y;
        assert!(p.update(0.1));
        assert!(p.vel_y > initial_vel_y);
    }

    #[test]
    fn deactivates_after_its_duration() {
        let mut c = Celebration::new();
        c.start(80, 24);
        // rewind the start instant past the duration instead of sleeping
        c.started_at = SystemTime::now() - std::time::Duration::from_secs(10);
        c.update();
        assert!(!c.is_active);
        assert!(c.particles.is_empty());
    }

    #[test]
    fn update_while_inactive_is_a_no_op() {
        let mut c = Celebration::new();
        c.update();
        assert!(!c.is_active);
    }
}
