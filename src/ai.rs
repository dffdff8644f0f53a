use crate::entity::{Ball, Paddle};

/// Speed the AI paddle should move at this tick.
///
/// Chases the ball's vertical position with the paddle center, staying
/// still inside a deadzone band so it doesn't jitter when nearly aligned.
/// Pure function of the current ball and paddle; no state between ticks.
pub fn paddle_speed(ball: &Ball, paddle: &Paddle, deadzone: f64, speed: f64) -> f64 {
    let center = paddle.center();
    if ball.y < center - deadzone {
        -speed
    } else if ball.y > center + deadzone {
        speed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(y: f64) -> Ball {
        Ball::new(400.0, y, 5.0, 3.0, 12.0)
    }

    fn paddle() -> Paddle {
        // Center at 300.
        Paddle {
            y: 220.0,
            height: 160.0,
            speed: 0.0,
        }
    }

    #[test]
    fn test_moves_up_when_ball_above_deadzone() {
        let speed = paddle_speed(&ball_at(289.0), &paddle(), 10.0, 5.0);
        assert_eq!(speed, -5.0);
    }

    #[test]
    fn test_moves_down_when_ball_below_deadzone() {
        let speed = paddle_speed(&ball_at(311.0), &paddle(), 10.0, 5.0);
        assert_eq!(speed, 5.0);
    }

    #[test]
    fn test_holds_still_inside_deadzone() {
        assert_eq!(paddle_speed(&ball_at(300.0), &paddle(), 10.0, 5.0), 0.0);
        assert_eq!(paddle_speed(&ball_at(291.0), &paddle(), 10.0, 5.0), 0.0);
        assert_eq!(paddle_speed(&ball_at(309.0), &paddle(), 10.0, 5.0), 0.0);
    }

    #[test]
    fn test_deadzone_boundary_is_inclusive() {
        // Exactly at center ± deadzone counts as aligned.
        assert_eq!(paddle_speed(&ball_at(290.0), &paddle(), 10.0, 5.0), 0.0);
        assert_eq!(paddle_speed(&ball_at(310.0), &paddle(), 10.0, 5.0), 0.0);
    }
}
