/// Gameplay tuning parameters.
///
/// Everything the simulation needs to know about the playing field and the
/// objects in it lives here, so tests can shrink the field or cap the ball
/// speed without touching the physics code.
#[derive(Debug, Clone)]
pub struct Config {
    pub field_width: f64,
    pub field_height: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    /// Paddle speed applied by keyboard input (pixels per tick).
    pub input_paddle_speed: f64,
    pub ball_radius: f64,
    /// Horizontal serve speed magnitude after a reset.
    pub serve_speed_x: f64,
    /// Vertical serve speed magnitude after a reset.
    pub serve_speed_y: f64,
    /// Horizontal speed multiplier applied on every paddle hit.
    pub paddle_hit_speedup: f64,
    /// Optional ceiling on |speed_x|. `None` reproduces the original
    /// behavior where a long rally grows the speed without bound.
    pub ball_speed_cap: Option<f64>,
    /// AI paddle speed magnitude (pixels per tick).
    pub ai_paddle_speed: f64,
    /// Tolerance band around the AI paddle center where it stays still.
    pub ai_deadzone: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            paddle_width: 32.0,
            paddle_height: 160.0,
            input_paddle_speed: 6.0,
            ball_radius: 12.0,
            serve_speed_x: 5.0,
            serve_speed_y: 3.0,
            paddle_hit_speedup: 1.1,
            ball_speed_cap: None,
            ai_paddle_speed: 5.0,
            ai_deadzone: 10.0,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest y a paddle's top edge may reach.
    pub fn max_paddle_y(&self) -> f64 {
        self.field_height - self.paddle_height
    }

    /// Clamp a paddle's top edge to the field.
    pub fn clamp_paddle_y(&self, y: f64) -> f64 {
        y.clamp(0.0, self.max_paddle_y())
    }

    /// X coordinate of the inner face of the right paddle.
    pub fn right_paddle_x(&self) -> f64 {
        self.field_width - self.paddle_width
    }
}
