use oceanpong::{CliRenderer, Config, Game, Input, Renderer};
use std::io;
use std::time::{Duration, Instant};

// Game logic update rate (controls gameplay speed)
const TICK_RATE: Duration = Duration::from_millis(16); // ~60 ticks/sec

fn main() -> io::Result<()> {
    let config = Config::default();
    let paddle_speed = config.input_paddle_speed;

    let mut game = Game::new(config);
    let mut renderer = CliRenderer::new();

    renderer.init()?;

    let mut last_update = Instant::now();

    loop {
        // Poll for input
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::LeftUp => game.set_left_speed(-paddle_speed),
                Input::LeftDown => game.set_left_speed(paddle_speed),
                Input::LeftStop => game.set_left_speed(0.0),
                Input::RightUp => game.set_right_speed(-paddle_speed),
                Input::RightDown => game.set_right_speed(paddle_speed),
                Input::RightStop => game.set_right_speed(0.0),
                Input::ToggleAi => game.toggle_ai(),
                Input::Restart => game.reset(),
                Input::Quit => break,
            }
        }

        // Update game logic at fixed rate
        if last_update.elapsed() >= TICK_RATE {
            game.update();
            last_update = Instant::now();
        }

        // Let renderer decide when to actually render
        // (it manages its own frame rate internally)
        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    Ok(())
}
