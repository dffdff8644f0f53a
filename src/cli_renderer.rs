use crate::game::Game;
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Rows reserved under the field for score and controls.
const STATUS_ROWS: u16 = 2;

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    /// Whether the terminal reports key releases (kitty protocol). Without
    /// it a paddle glides until the opposite key is pressed.
    release_events: bool,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            release_events: false,
        }
    }

    /// Map field coordinates onto the terminal grid.
    fn scale(game: &Game, cols: u16, rows: u16) -> (f64, f64) {
        let sx = game.config.field_width / cols as f64;
        let sy = game.config.field_height / rows as f64;
        (sx, sy)
    }

    fn draw_paddle(
        stdout: &mut io::Stdout,
        col: u16,
        top: f64,
        height: f64,
        sy: f64,
    ) -> io::Result<()> {
        let first = (top / sy).floor() as u16;
        let last = ((top + height) / sy).ceil() as u16;
        for row in first..last {
            queue!(
                stdout,
                cursor::MoveTo(col, row),
                SetForegroundColor(Color::Green),
                Print("█")
            )?;
        }
        Ok(())
    }

    fn draw_status(&self, game: &Game, stdout: &mut io::Stdout, rows: u16) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, rows),
            ResetColor,
            Print(format!(
                "Score: {} - {}   AI: {}",
                game.score.left,
                game.score.right,
                if game.ai_enabled { "on" } else { "off" }
            ))
        )?;
        queue!(
            stdout,
            cursor::MoveTo(0, rows + 1),
            Print("W/S: left paddle | Up/Down: right paddle | A: toggle AI | R: restart | Q: quit")
        )?;
        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }
        self.last_render = Instant::now();

        let (cols, total_rows) = terminal::size()?;
        let rows = total_rows.saturating_sub(STATUS_ROWS).max(10);
        let cols = cols.max(20);
        let (sx, sy) = Self::scale(game, cols, rows);

        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        // Particles behind the ball, dimmer as they fade.
        for p in game.particles.iter() {
            let col = (p.x / sx) as i64;
            let row = (p.y / sy) as i64;
            if col < 0 || row < 0 || col >= cols as i64 || row >= rows as i64 {
                continue;
            }
            let glyph = if p.alpha > 0.5 { "o" } else { "." };
            queue!(
                stdout,
                cursor::MoveTo(col as u16, row as u16),
                SetForegroundColor(Color::Cyan),
                Print(glyph)
            )?;
        }

        Self::draw_paddle(&mut stdout, 0, game.left_paddle.y, game.left_paddle.height, sy)?;
        Self::draw_paddle(
            &mut stdout,
            cols - 1,
            game.right_paddle.y,
            game.right_paddle.height,
            sy,
        )?;

        let ball_col = (game.ball.x / sx).clamp(0.0, (cols - 1) as f64) as u16;
        let ball_row = (game.ball.y / sy).clamp(0.0, (rows - 1) as f64) as u16;
        queue!(
            stdout,
            cursor::MoveTo(ball_col, ball_row),
            SetForegroundColor(Color::White),
            Print("●")
        )?;

        self.draw_status(game, &mut stdout, rows)?;

        queue!(stdout, ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        if self.release_events {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let input = match (code, kind) {
                    (KeyCode::Char('q') | KeyCode::Char('Q'), KeyEventKind::Press) => {
                        Some(Input::Quit)
                    }
                    (KeyCode::Char('r') | KeyCode::Char('R'), KeyEventKind::Press) => {
                        Some(Input::Restart)
                    }
                    (KeyCode::Char('a') | KeyCode::Char('A'), KeyEventKind::Press) => {
                        Some(Input::ToggleAi)
                    }
                    (KeyCode::Char('w') | KeyCode::Char('W'), KeyEventKind::Press) => {
                        Some(Input::LeftUp)
                    }
                    (KeyCode::Char('s') | KeyCode::Char('S'), KeyEventKind::Press) => {
                        Some(Input::LeftDown)
                    }
                    (
                        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('s')
                        | KeyCode::Char('S'),
                        KeyEventKind::Release,
                    ) => Some(Input::LeftStop),
                    (KeyCode::Up, KeyEventKind::Press) => Some(Input::RightUp),
                    (KeyCode::Down, KeyEventKind::Press) => Some(Input::RightDown),
                    (KeyCode::Up | KeyCode::Down, KeyEventKind::Release) => {
                        Some(Input::RightStop)
                    }
                    _ => None,
                };
                return Ok(input);
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
