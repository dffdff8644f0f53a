use crate::game::Game;
use crate::renderer::{Input, Renderer};
use rand::Rng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};

const BUBBLE_COUNT: usize = 40;
const FISH_COUNT: usize = 7;
const LIGHT_RAY_COUNT: usize = 8;

// Ocean palette
const COLOR_WATER: &str = "#05445e";
const COLOR_BUBBLE: &str = "#b3e6ff";
const COLOR_BALL: &str = "#ffffff";
const COLOR_SEAWEED: &str = "#228B22";
const COLOR_SEAWEED_SHADOW: &str = "#145214";
const COLOR_CORAL_A: &str = "#ffb347";
const COLOR_CORAL_B: &str = "#ff6961";
const COLOR_UI: &str = "#ffffff";

/// A decorative rising bubble. Respawns at the bottom once off-screen.
struct Bubble {
    x: f64,
    y: f64,
    r: f64,
    speed: f64,
    opacity: f64,
}

impl Bubble {
    fn random<R: Rng>(width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..width),
            y: height + rng.gen_range(0.0..height),
            r: rng.gen_range(5.0..20.0),
            speed: rng.gen_range(0.5..2.0),
            opacity: rng.gen_range(0.2..0.6),
        }
    }

    fn respawn<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.x = rng.gen_range(0.0..width);
        self.r = rng.gen_range(5.0..20.0);
        self.y = height + self.r;
        self.speed = rng.gen_range(0.5..2.0);
        self.opacity = rng.gen_range(0.2..0.6);
    }
}

/// A decorative fish drifting across the field, wrapping at the edges.
struct Fish {
    x: f64,
    y: f64,
    speed: f64,
    dir: f64,
    color: String,
    t: f64,
}

impl Fish {
    fn random<R: Rng>(width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..width),
            y: 80.0 + rng.gen_range(0.0..(height - 220.0)),
            speed: rng.gen_range(0.7..1.9),
            dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            color: format!("hsl({},70%,60%)", 180.0 + rng.gen_range(0.0..60.0)),
            t: rng.gen_range(0.0..1000.0),
        }
    }
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    device_pixel_ratio: f64,

    // Ocean scenery state. Purely cosmetic; the game core never sees it.
    bubbles: Vec<Bubble>,
    fish: Vec<Fish>,

    // Input commands queued by the keyboard listeners, drained per frame.
    pending_input: Rc<RefCell<VecDeque<Input>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str, field_width: f64, field_height: f64) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let device_pixel_ratio = window.device_pixel_ratio();

        let mut rng = rand::thread_rng();
        let bubbles = (0..BUBBLE_COUNT)
            .map(|_| Bubble::random(field_width, field_height, &mut rng))
            .collect();
        let fish = (0..FISH_COUNT)
            .map(|_| Fish::random(field_width, field_height, &mut rng))
            .collect();

        Ok(Self {
            canvas,
            context,
            window,
            device_pixel_ratio,
            bubbles,
            fish,
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    fn setup_keyboard_listeners(&self) {
        let pending = self.pending_input.clone();
        let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            // Held keys auto-repeat; the command is idempotent so just
            // swallow the repeats.
            if event.repeat() {
                event.prevent_default();
                return;
            }
            let input = match event.key().as_str() {
                "w" | "W" => Some(Input::LeftUp),
                "s" | "S" => Some(Input::LeftDown),
                "ArrowUp" => Some(Input::RightUp),
                "ArrowDown" => Some(Input::RightDown),
                "a" | "A" => Some(Input::ToggleAi),
                "r" | "R" => Some(Input::Restart),
                _ => None,
            };
            if let Some(input) = input {
                pending.borrow_mut().push_back(input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .unwrap();
        keydown.forget(); // Keep listener alive

        let pending = self.pending_input.clone();
        let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let input = match event.key().as_str() {
                "w" | "W" | "s" | "S" => Some(Input::LeftStop),
                "ArrowUp" | "ArrowDown" => Some(Input::RightStop),
                _ => None,
            };
            if let Some(input) = input {
                pending.borrow_mut().push_back(input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())
            .unwrap();
        keyup.forget();
    }

    fn current_time(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn ensure_canvas_size(&self, width: f64, height: f64) {
        let pixel_width = (width * self.device_pixel_ratio) as u32;
        let pixel_height = (height * self.device_pixel_ratio) as u32;

        if self.canvas.width() != pixel_width || self.canvas.height() != pixel_height {
            self.canvas.set_width(pixel_width);
            self.canvas.set_height(pixel_height);

            let element: &HtmlElement = self.canvas.unchecked_ref();
            element
                .style()
                .set_property("width", &format!("{}px", width as u32))
                .unwrap();
            element
                .style()
                .set_property("height", &format!("{}px", height as u32))
                .unwrap();

            // Resizing resets the context transform, so re-apply the scale.
            self.context
                .scale(self.device_pixel_ratio, self.device_pixel_ratio)
                .unwrap();
        }
    }

    fn draw_light_rays(&self, width: f64, height: f64) {
        let ctx = &self.context;
        for i in 0..LIGHT_RAY_COUNT {
            let i = i as f64;
            ctx.save();
            ctx.set_global_alpha(0.08);
            ctx.begin_path();
            ctx.move_to(width / 2.0, 0.0);
            ctx.line_to(width / 2.0 + i.sin() * width, height);
            ctx.line_to(width / 2.0 + (i + 0.5).sin() * width, height);
            ctx.close_path();
            ctx.set_fill_style_str("#fff");
            ctx.fill();
            ctx.restore();
        }
    }

    fn draw_bubbles(&mut self, width: f64, height: f64) {
        let ctx = &self.context;
        let mut rng = rand::thread_rng();
        for b in &mut self.bubbles {
            ctx.save();
            ctx.set_global_alpha(b.opacity);
            ctx.begin_path();
            ctx.arc(b.x, b.y, b.r, 0.0, PI * 2.0).unwrap();
            ctx.set_fill_style_str(COLOR_BUBBLE);
            ctx.fill();
            ctx.restore();

            b.y -= b.speed;
            if b.y + b.r < 0.0 {
                b.respawn(width, height, &mut rng);
            }
        }
    }

    fn draw_fish(&mut self, width: f64, height: f64) {
        let ctx = &self.context;
        let mut rng = rand::thread_rng();
        for f in &mut self.fish {
            f.x += f.speed * f.dir;
            f.t += 0.1;
            if f.dir > 0.0 && f.x > width + 40.0 {
                f.x = -40.0;
                f.y = 80.0 + rng.gen_range(0.0..(height - 220.0));
            } else if f.dir < 0.0 && f.x < -40.0 {
                f.x = width + 40.0;
                f.y = 80.0 + rng.gen_range(0.0..(height - 220.0));
            }

            ctx.save();
            ctx.translate(f.x, f.y + f.t.sin() * 4.0).unwrap();
            ctx.scale(f.dir, 1.0).unwrap();

            // Body
            ctx.begin_path();
            ctx.ellipse(0.0, 0.0, 18.0, 8.0, 0.0, 0.0, PI * 2.0).unwrap();
            ctx.set_fill_style_str(&f.color);
            ctx.fill();

            // Tail
            ctx.begin_path();
            ctx.move_to(-18.0, 0.0);
            ctx.line_to(-28.0, -7.0);
            ctx.line_to(-28.0, 7.0);
            ctx.close_path();
            ctx.set_fill_style_str("#fff8");
            ctx.fill();

            // Eye
            ctx.begin_path();
            ctx.arc(8.0, -2.0, 2.0, 0.0, PI * 2.0).unwrap();
            ctx.set_fill_style_str("#fff");
            ctx.fill();
            ctx.begin_path();
            ctx.arc(8.7, -2.0, 1.0, 0.0, PI * 2.0).unwrap();
            ctx.set_fill_style_str("#222");
            ctx.fill();

            ctx.restore();
        }
    }

    fn draw_coral_reef(&self, width: f64, height: f64) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(0.95);
        let mut i = 0.0;
        while i < width {
            ctx.begin_path();
            ctx.move_to(i, height);
            ctx.bezier_curve_to(i + 10.0, height - 30.0, i + 30.0, height - 30.0, i + 40.0, height);
            ctx.line_to(i + 40.0, height);
            ctx.close_path();
            let color = if (i as i64) % 80 == 0 {
                COLOR_CORAL_A
            } else {
                COLOR_CORAL_B
            };
            ctx.set_fill_style_str(color);
            ctx.fill();
            i += 40.0;
        }
        ctx.restore();
    }

    /// Seaweed stalk standing in for a paddle, swaying with time. Anchored
    /// at the paddle's bottom edge and drawn upward over its full height.
    fn draw_seaweed(&self, x: f64, y: f64, height: f64, is_left: bool, t: f64) {
        let ctx = &self.context;
        ctx.save();
        ctx.translate(x, y).unwrap();
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        let flip = if is_left { -1.0 } else { 1.0 };
        let mut i = 0.0;
        while i < height {
            let dx = (t / 30.0 + i / 15.0).sin() * flip * (14.0 - i / 12.0);
            ctx.line_to(dx, -i);
            i += 10.0;
        }
        ctx.set_line_width(32.0);
        ctx.set_stroke_style_str(COLOR_SEAWEED);
        ctx.set_shadow_color(COLOR_SEAWEED_SHADOW);
        ctx.set_shadow_blur(8.0);
        ctx.stroke();
        ctx.restore();
    }

    fn draw_ball(&self, game: &Game) {
        let ctx = &self.context;
        ctx.save();
        ctx.begin_path();
        ctx.arc(game.ball.x, game.ball.y, game.ball.radius, 0.0, PI * 2.0)
            .unwrap();
        ctx.set_fill_style_str(COLOR_BALL);
        ctx.set_shadow_color(COLOR_BUBBLE);
        ctx.set_shadow_blur(10.0);
        ctx.fill();
        ctx.restore();
    }

    fn draw_particles(&self, game: &Game) {
        let ctx = &self.context;
        for p in game.particles.iter() {
            ctx.save();
            ctx.set_global_alpha(p.alpha.max(0.0));
            ctx.begin_path();
            ctx.arc(p.x, p.y, p.radius, 0.0, PI * 2.0).unwrap();
            ctx.set_fill_style_str(COLOR_BUBBLE);
            ctx.set_shadow_color("#fff");
            ctx.set_shadow_blur(8.0);
            ctx.fill();
            ctx.restore();
        }
    }

    fn draw_scores(&self, game: &Game, width: f64) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_font("bold 40px Arial");
        ctx.set_fill_style_str(COLOR_UI);
        ctx.set_text_align("center");
        ctx.fill_text(&game.score.left.to_string(), width / 4.0, 60.0)
            .unwrap();
        ctx.fill_text(&game.score.right.to_string(), width * 3.0 / 4.0, 60.0)
            .unwrap();
        ctx.restore();
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listeners();
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let width = game.config.field_width;
        let height = game.config.field_height;
        let t = self.current_time();

        self.ensure_canvas_size(width, height);

        // Background water
        self.context.set_fill_style_str(COLOR_WATER);
        self.context.fill_rect(0.0, 0.0, width, height);

        self.draw_light_rays(width, height);
        self.draw_bubbles(width, height);
        self.draw_fish(width, height);
        self.draw_coral_reef(width, height);

        // Seaweed bases sit at each paddle's bottom edge.
        self.draw_seaweed(
            10.0,
            game.left_paddle.y + game.left_paddle.height,
            game.left_paddle.height,
            true,
            t,
        );
        self.draw_seaweed(
            width - 10.0,
            game.right_paddle.y + game.right_paddle.height,
            game.right_paddle.height,
            false,
            t,
        );

        self.draw_ball(game);
        self.draw_particles(game);
        self.draw_scores(game, width);

        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
