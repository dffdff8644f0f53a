/// Which side of the field a paddle (or scoring player) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One paddle. `y` is the top edge; `speed` is a signed velocity in pixels
/// per tick, set by input or the AI and applied during the physics step.
#[derive(Debug, Clone)]
pub struct Paddle {
    pub y: f64,
    pub height: f64,
    pub speed: f64,
}

impl Paddle {
    /// New paddle vertically centered on the field.
    pub fn centered(field_height: f64, height: f64) -> Self {
        Self {
            y: field_height / 2.0 - height / 2.0,
            height,
            speed: 0.0,
        }
    }

    pub fn center(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True if a ball at vertical position `y` is within the paddle's span.
    pub fn covers(&self, y: f64) -> bool {
        y > self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub radius: f64,
}

impl Ball {
    pub fn new(x: f64, y: f64, speed_x: f64, speed_y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            speed_x,
            speed_y,
            radius,
        }
    }
}
