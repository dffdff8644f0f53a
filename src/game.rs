use crate::ai;
use crate::config::Config;
use crate::entity::{Ball, Paddle, Side};
use crate::particles::ParticlePool;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Something that happened during one tick, for frontends to react to
/// (sound cues, score flashes). Collision events carry the contact point.
/// Fire-and-forget; the core has already spawned its own particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    WallBounce { x: f64, y: f64 },
    PaddleBounce { x: f64, y: f64, side: Side },
    Score { side: Side },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// The whole mutable game state: paddles, ball, score, particle pool and
/// the AI flag. Owned by whoever drives the loop; everything else borrows.
pub struct Game {
    pub config: Config,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub ball: Ball,
    pub score: Score,
    pub particles: ParticlePool,
    pub ai_enabled: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic game for tests: serves and particle bursts replay
    /// identically for the same seed.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, mut rng: StdRng) -> Self {
        let left_paddle = Paddle::centered(config.field_height, config.paddle_height);
        let right_paddle = Paddle::centered(config.field_height, config.paddle_height);
        let ball = Ball::new(
            config.field_width / 2.0,
            config.field_height / 2.0,
            config.serve_speed_x * random_sign(&mut rng),
            config.serve_speed_y * random_sign(&mut rng),
            config.ball_radius,
        );

        Self {
            config,
            left_paddle,
            right_paddle,
            ball,
            score: Score::default(),
            particles: ParticlePool::new(),
            ai_enabled: false,
            rng,
        }
    }

    /// Set the left paddle's velocity (pixels per tick). Keyboard handlers
    /// call this on key-down with a signed speed and on key-up with zero.
    pub fn set_left_speed(&mut self, speed: f64) {
        self.left_paddle.speed = speed;
    }

    /// Set the right paddle's velocity. Ignored while the AI drives that
    /// paddle.
    pub fn set_right_speed(&mut self, speed: f64) {
        if !self.ai_enabled {
            self.right_paddle.speed = speed;
        }
    }

    /// Flip AI control of the right paddle. The paddle's speed is zeroed
    /// either way so stale input never carries across the mode switch.
    pub fn toggle_ai(&mut self) {
        self.ai_enabled = !self.ai_enabled;
        self.right_paddle.speed = 0.0;
    }

    /// Fresh match: scores zeroed, paddles recentered, ball re-served,
    /// particles cleared. The AI flag survives a reset.
    pub fn reset(&mut self) {
        self.left_paddle = Paddle::centered(self.config.field_height, self.config.paddle_height);
        self.right_paddle = Paddle::centered(self.config.field_height, self.config.paddle_height);
        self.score = Score::default();
        self.particles.clear();
        self.serve();
    }

    fn serve(&mut self) {
        self.ball.x = self.config.field_width / 2.0;
        self.ball.y = self.config.field_height / 2.0;
        self.ball.speed_x = self.config.serve_speed_x * random_sign(&mut self.rng);
        self.ball.speed_y = self.config.serve_speed_y * random_sign(&mut self.rng);
    }

    /// Advance the simulation one tick and return what happened.
    ///
    /// Order: AI, paddle movement (clamped), ball movement, wall bounce,
    /// paddle bounces, scoring, particle decay. A wall bounce and a paddle
    /// bounce may both fire in one tick; scoring never coincides with a
    /// paddle bounce because the bounce pushes the ball back in bounds.
    pub fn update(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if self.ai_enabled {
            self.right_paddle.speed = ai::paddle_speed(
                &self.ball,
                &self.right_paddle,
                self.config.ai_deadzone,
                self.config.ai_paddle_speed,
            );
        }

        self.left_paddle.y = self
            .config
            .clamp_paddle_y(self.left_paddle.y + self.left_paddle.speed);
        self.right_paddle.y = self
            .config
            .clamp_paddle_y(self.right_paddle.y + self.right_paddle.speed);

        self.ball.x += self.ball.speed_x;
        self.ball.y += self.ball.speed_y;

        let r = self.ball.radius;
        let height = self.config.field_height;
        let width = self.config.field_width;

        // Top/bottom wall bounce. The ball's position is left as-is; the
        // event carries the clamped contact point on the wall.
        if self.ball.y - r < 0.0 || self.ball.y + r > height {
            self.ball.speed_y = -self.ball.speed_y;
            let contact_y = if self.ball.y < height / 2.0 {
                r
            } else {
                height - r
            };
            events.push(Event::WallBounce {
                x: self.ball.x,
                y: contact_y,
            });
        }

        // Left paddle: reverse and amplify, then push the ball out so it
        // can't stick inside the paddle.
        if self.ball.x - r < self.config.paddle_width && self.left_paddle.covers(self.ball.y) {
            self.bounce_off_paddle();
            self.ball.x = self.config.paddle_width + r;
            events.push(Event::PaddleBounce {
                x: self.ball.x,
                y: self.ball.y,
                side: Side::Left,
            });
        }

        if self.ball.x + r > self.config.right_paddle_x() && self.right_paddle.covers(self.ball.y) {
            self.bounce_off_paddle();
            self.ball.x = self.config.right_paddle_x() - r;
            events.push(Event::PaddleBounce {
                x: self.ball.x,
                y: self.ball.y,
                side: Side::Right,
            });
        }

        // A ball that just bounced off a paddle is back in bounds, so at
        // most one of these fires per tick.
        if self.ball.x < 0.0 {
            self.score.increment(Side::Right);
            self.serve();
            events.push(Event::Score { side: Side::Right });
        } else if self.ball.x > width {
            self.score.increment(Side::Left);
            self.serve();
            events.push(Event::Score { side: Side::Left });
        }

        for event in &events {
            if let Event::WallBounce { x, y } | Event::PaddleBounce { x, y, .. } = event {
                self.particles.spawn_burst(*x, *y, &mut self.rng);
            }
        }
        self.particles.tick();

        events
    }

    /// Reverse and amplify the ball's horizontal speed, honoring the
    /// optional rally cap.
    fn bounce_off_paddle(&mut self) {
        self.ball.speed_x *= -self.config.paddle_hit_speedup;
        if let Some(cap) = self.config.ball_speed_cap {
            self.ball.speed_x = self.ball.speed_x.clamp(-cap, cap);
        }
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::with_seed(Config::default(), 42)
    }

    #[test]
    fn test_paddles_start_centered() {
        let game = game();
        let expected = game.config.field_height / 2.0 - game.config.paddle_height / 2.0;
        assert_eq!(game.left_paddle.y, expected);
        assert_eq!(game.right_paddle.y, expected);
    }

    #[test]
    fn test_serve_speeds_have_fixed_magnitude() {
        let game = game();
        assert_eq!(game.ball.speed_x.abs(), 5.0);
        assert_eq!(game.ball.speed_y.abs(), 3.0);
    }

    #[test]
    fn test_left_paddle_hit_reverses_and_amplifies() {
        // The spec scenario: paddle spans y in [100, 260], ball one pixel
        // shy of the paddle face moving left at 5.
        let mut game = game();
        game.left_paddle.y = 100.0;
        game.ball.x = game.config.paddle_width - 1.0;
        game.ball.y = 180.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = 0.0;

        let events = game.update();

        assert_eq!(
            game.ball.x,
            game.config.paddle_width + game.config.ball_radius
        );
        assert_eq!(game.ball.speed_x, 5.5);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PaddleBounce { side: Side::Left, .. })));
    }

    #[test]
    fn test_right_paddle_hit_is_symmetric() {
        let mut game = game();
        game.right_paddle.y = 100.0;
        game.ball.x = game.config.right_paddle_x() + 1.0;
        game.ball.y = 180.0;
        game.ball.speed_x = 5.0;
        game.ball.speed_y = 0.0;

        let events = game.update();

        assert_eq!(
            game.ball.x,
            game.config.right_paddle_x() - game.config.ball_radius
        );
        assert_eq!(game.ball.speed_x, -5.5);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PaddleBounce { side: Side::Right, .. })));
    }

    #[test]
    fn test_paddle_miss_lets_ball_through() {
        let mut game = game();
        game.left_paddle.y = 400.0; // Far from the ball's row
        game.ball.x = game.config.paddle_width - 1.0;
        game.ball.y = 180.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = 0.0;

        let events = game.update();

        assert_eq!(game.ball.speed_x, -5.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ball_exit_left_scores_right_and_reserves() {
        // Ball at (0, H/2) moving left scores for the right side next tick
        // and re-serves from center. The left paddle is parked at the top
        // so it can't save it.
        let mut game = game();
        game.left_paddle.y = 0.0;
        game.ball.x = 0.0;
        game.ball.y = game.config.field_height / 2.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = 0.0;

        let events = game.update();

        assert_eq!(game.score.right, 1);
        assert_eq!(game.score.left, 0);
        assert_eq!(game.ball.x, game.config.field_width / 2.0);
        assert_eq!(game.ball.y, game.config.field_height / 2.0);
        assert_eq!(game.ball.speed_x.abs(), 5.0);
        assert_eq!(game.ball.speed_y.abs(), 3.0);
        assert!(events.contains(&Event::Score { side: Side::Right }));
    }

    #[test]
    fn test_ball_exit_right_scores_left() {
        let mut game = game();
        game.right_paddle.y = 0.0;
        game.ball.x = game.config.field_width;
        game.ball.y = game.config.field_height / 2.0;
        game.ball.speed_x = 5.0;
        game.ball.speed_y = 0.0;

        let events = game.update();

        assert_eq!(game.score.left, 1);
        assert_eq!(game.score.right, 0);
        assert!(events.contains(&Event::Score { side: Side::Left }));
    }

    #[test]
    fn test_wall_bounce_inverts_vertical_speed() {
        let mut game = game();
        game.ball.x = 400.0;
        game.ball.y = game.config.ball_radius + 1.0;
        game.ball.speed_x = 0.0;
        game.ball.speed_y = -3.0;

        let events = game.update();

        assert_eq!(game.ball.speed_y, 3.0);
        let contact = events.iter().find_map(|e| match e {
            Event::WallBounce { x, y } => Some((*x, *y)),
            _ => None,
        });
        assert_eq!(contact, Some((400.0, game.config.ball_radius)));
    }

    #[test]
    fn test_bottom_wall_contact_point_is_clamped() {
        let mut game = game();
        game.ball.x = 400.0;
        game.ball.y = game.config.field_height - game.config.ball_radius - 1.0;
        game.ball.speed_x = 0.0;
        game.ball.speed_y = 3.0;

        let events = game.update();

        let contact = events.iter().find_map(|e| match e {
            Event::WallBounce { y, .. } => Some(*y),
            _ => None,
        });
        assert_eq!(
            contact,
            Some(game.config.field_height - game.config.ball_radius)
        );
    }

    #[test]
    fn test_wall_and_paddle_can_bounce_in_same_tick() {
        // Ball clips the top wall while also crossing the left paddle face.
        let mut game = game();
        game.left_paddle.y = 0.0;
        game.ball.x = game.config.paddle_width - 1.0;
        game.ball.y = game.config.ball_radius + 1.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = -3.0;

        let events = game.update();

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::WallBounce { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PaddleBounce { .. })));
    }

    #[test]
    fn test_collisions_spawn_particle_bursts() {
        let mut game = game();
        game.ball.x = 400.0;
        game.ball.y = game.config.ball_radius + 1.0;
        game.ball.speed_x = 0.0;
        game.ball.speed_y = -3.0;

        assert!(game.particles.is_empty());
        game.update();
        assert_eq!(game.particles.len(), 10);
    }

    #[test]
    fn test_scoring_does_not_spawn_particles() {
        let mut game = game();
        game.left_paddle.y = 0.0;
        game.ball.x = 0.0;
        game.ball.y = game.config.field_height / 2.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = 0.0;

        game.update();
        assert!(game.particles.is_empty());
    }

    #[test]
    fn test_speed_cap_limits_rally_growth() {
        let mut config = Config::default();
        config.ball_speed_cap = Some(8.0);
        let mut game = Game::with_seed(config, 42);

        game.left_paddle.y = 100.0;
        game.ball.y = 180.0;
        game.ball.speed_y = 0.0;
        for _ in 0..20 {
            // Re-stage a left paddle hit each time.
            game.ball.x = game.config.paddle_width - 1.0;
            game.ball.speed_x = -game.ball.speed_x.abs();
            game.update();
            assert!(game.ball.speed_x.abs() <= 8.0);
        }
    }

    #[test]
    fn test_uncapped_speed_grows_ten_percent_per_hit() {
        let mut game = game();
        game.left_paddle.y = 100.0;
        game.ball.x = game.config.paddle_width - 1.0;
        game.ball.y = 180.0;
        game.ball.speed_x = -5.0;
        game.ball.speed_y = 0.0;

        game.update();
        assert_eq!(game.ball.speed_x, 5.5);

        game.ball.x = game.config.paddle_width - 1.0;
        game.ball.speed_x = -5.5;
        game.update();
        assert!((game.ball.speed_x - 6.05).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_ai_zeroes_right_paddle_speed() {
        let mut game = game();
        game.set_right_speed(6.0);
        assert_eq!(game.right_paddle.speed, 6.0);

        game.toggle_ai();
        assert!(game.ai_enabled);
        assert_eq!(game.right_paddle.speed, 0.0);

        // Manual input is ignored while the AI drives.
        game.set_right_speed(6.0);
        assert_eq!(game.right_paddle.speed, 0.0);

        // Left paddle input is always honored.
        game.set_left_speed(-6.0);
        assert_eq!(game.left_paddle.speed, -6.0);
    }

    #[test]
    fn test_ai_chases_ball_when_enabled() {
        let mut game = game();
        game.toggle_ai();
        game.ball.x = 400.0;
        game.ball.y = 50.0;
        game.ball.speed_x = 0.0;
        game.ball.speed_y = 0.0;

        let before = game.right_paddle.y;
        game.update();
        assert!(game.right_paddle.y < before, "AI should move toward the ball");
    }

    #[test]
    fn test_reset_clears_match_state() {
        let mut game = game();
        game.score.left = 3;
        game.score.right = 7;
        game.left_paddle.y = 0.0;
        game.particles.spawn_burst(1.0, 1.0, &mut StdRng::seed_from_u64(1));

        game.reset();

        assert_eq!(game.score, Score::default());
        assert!(game.particles.is_empty());
        assert_eq!(game.ball.x, game.config.field_width / 2.0);
        let expected = game.config.field_height / 2.0 - game.config.paddle_height / 2.0;
        assert_eq!(game.left_paddle.y, expected);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Paddle tops never leave the field no matter how hard the input
        /// shoves them.
        #[test]
        fn prop_paddles_stay_clamped(
            left_speed in -200.0f64..200.0,
            right_speed in -200.0f64..200.0,
            ticks in 1usize..100
        ) {
            let mut game = Game::with_seed(Config::default(), 1);
            game.set_left_speed(left_speed);
            game.set_right_speed(right_speed);

            for _ in 0..ticks {
                game.update();
                let max_y = game.config.max_paddle_y();
                prop_assert!(game.left_paddle.y >= 0.0 && game.left_paddle.y <= max_y);
                prop_assert!(game.right_paddle.y >= 0.0 && game.right_paddle.y <= max_y);
            }
        }

        /// Scores never decrease, and each tick raises the total by at most
        /// one.
        #[test]
        fn prop_scores_monotonic(seed in any::<u64>(), ticks in 1usize..300) {
            let mut game = Game::with_seed(Config::default(), seed);
            let mut prev = game.score;

            for _ in 0..ticks {
                game.update();
                prop_assert!(game.score.left >= prev.left);
                prop_assert!(game.score.right >= prev.right);
                let gained =
                    (game.score.left - prev.left) + (game.score.right - prev.right);
                prop_assert!(gained <= 1);
                prev = game.score;
            }
        }

        /// Whenever a score event fires, the ball is back at center with
        /// the fixed serve magnitudes.
        #[test]
        fn prop_score_event_implies_fresh_serve(
            seed in any::<u64>(),
            ticks in 1usize..300
        ) {
            let mut game = Game::with_seed(Config::default(), seed);

            for _ in 0..ticks {
                let events = game.update();
                if events.iter().any(|e| matches!(e, Event::Score { .. })) {
                    prop_assert_eq!(game.ball.x, game.config.field_width / 2.0);
                    prop_assert_eq!(game.ball.y, game.config.field_height / 2.0);
                    prop_assert_eq!(game.ball.speed_x.abs(), game.config.serve_speed_x);
                    prop_assert_eq!(game.ball.speed_y.abs(), game.config.serve_speed_y);
                }
            }
        }

        /// After a paddle bounce the ball never overlaps the paddle face.
        #[test]
        fn prop_paddle_bounce_ends_outside_paddle(
            seed in any::<u64>(),
            ticks in 1usize..300
        ) {
            let mut game = Game::with_seed(Config::default(), seed);
            game.toggle_ai();
            game.set_left_speed(0.0);

            for _ in 0..ticks {
                let events = game.update();
                for event in events {
                    if let Event::PaddleBounce { side, .. } = event {
                        match side {
                            Side::Left => prop_assert!(
                                game.ball.x - game.ball.radius
                                    >= game.config.paddle_width
                            ),
                            Side::Right => prop_assert!(
                                game.ball.x + game.ball.radius
                                    <= game.config.right_paddle_x()
                            ),
                        }
                    }
                }
            }
        }

        /// Identical seeds replay identical matches.
        #[test]
        fn prop_seeded_games_are_deterministic(
            seed in any::<u64>(),
            ticks in 1usize..200
        ) {
            let mut a = Game::with_seed(Config::default(), seed);
            let mut b = Game::with_seed(Config::default(), seed);
            a.toggle_ai();
            b.toggle_ai();

            for _ in 0..ticks {
                let ea = a.update();
                let eb = b.update();
                prop_assert_eq!(ea, eb);
                prop_assert_eq!(a.ball.x, b.ball.x);
                prop_assert_eq!(a.ball.y, b.ball.y);
                prop_assert_eq!(a.score, b.score);
            }
        }
    }
}
