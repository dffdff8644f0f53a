pub mod ai;
pub mod config;
pub mod entity;
pub mod game;
pub mod particles;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use config::Config;
pub use entity::{Ball, Paddle, Side};
pub use game::{Event, Game, Score};
pub use particles::{Particle, ParticlePool};
pub use renderer::{Input, Renderer};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
