use crate::{Config, Game, Input, Renderer, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
    paddle_speed: f64,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let config = Config::default();
        let paddle_speed = config.input_paddle_speed;
        let mut renderer =
            WebRenderer::new("pong", config.field_width, config.field_height)?;
        renderer
            .init()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Game::new(config);

        Ok(Self {
            game,
            renderer,
            paddle_speed,
        })
    }

    /// One animation frame: drain queued input commands, advance the
    /// simulation one tick, hand the state to the renderer.
    fn update_frame(&mut self) -> Result<(), JsValue> {
        while let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            match input {
                Input::LeftUp => self.game.set_left_speed(-self.paddle_speed),
                Input::LeftDown => self.game.set_left_speed(self.paddle_speed),
                Input::LeftStop => self.game.set_left_speed(0.0),
                Input::RightUp => self.game.set_right_speed(-self.paddle_speed),
                Input::RightDown => self.game.set_right_speed(self.paddle_speed),
                Input::RightStop => self.game.set_right_speed(0.0),
                Input::ToggleAi => self.game.toggle_ai(),
                Input::Restart => self.game.reset(),
                Input::Quit => {
                    web_sys::console::log_1(&"Game quit".into());
                    // In web, we can't really quit, just log it
                }
            }
        }

        // One simulation tick per display frame. Events drive audio cues on
        // the page side eventually; the core already handled particles.
        let _events = self.game.update();

        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

/// Toggle AI from a page button, mirroring the keyboard shortcut.
#[wasm_bindgen]
pub struct GameHandle {
    inner: Rc<RefCell<GameLoop>>,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn toggle_ai(&self) {
        self.inner.borrow_mut().game.toggle_ai();
    }

    pub fn ai_enabled(&self) -> bool {
        self.inner.borrow().game.ai_enabled
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<GameHandle, JsValue> {
    console_error_panic_hook::set_once();

    web_sys::console::log_1(&"[WASM] Starting Ocean Pong...".into());

    let game_loop = match GameLoop::new() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            web_sys::console::error_1(
                &format!("[WASM] Failed to create game loop: {:?}", e).into(),
            );
            return Err(e);
        }
    };

    // Setup requestAnimationFrame loop
    let window = web_sys::window().ok_or("no window")?;

    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let game_loop_clone = game_loop.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = game_loop_clone.borrow_mut().update_frame() {
            web_sys::console::error_1(&e);
            return; // Stop loop on error
        }

        // Schedule next frame
        let window = web_sys::window().unwrap();
        window
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    window
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        .unwrap();

    web_sys::console::log_1(&"[WASM] Game loop started.".into());

    Ok(GameHandle { inner: game_loop })
}
