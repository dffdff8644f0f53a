use crate::game::Game;
use std::io;

/// A command from the input layer to the game core. Key-down handlers emit
/// a movement direction; key-up handlers emit the matching stop. The loop
/// turns directions into speeds using `Config::input_paddle_speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    LeftUp,
    LeftDown,
    LeftStop,
    RightUp,
    RightDown,
    RightStop,
    ToggleAi,
    Quit,
    Restart,
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
