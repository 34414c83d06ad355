use std::time::Instant;

use anyhow::{Context, Result};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use chomper::constants::{LOOP_TIME, WINDOW_HEIGHT, WINDOW_WIDTH};
use chomper::game::Game;

pub fn main() -> Result<()> {
    // Setup tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    let sdl_context = sdl2::init().map_err(anyhow::Error::msg).context("initializing SDL")?;
    let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg).context("initializing video")?;

    let window = video_subsystem
        .window("Chomper", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .context("creating window")?;

    let mut canvas = window
        .into_canvas()
        .target_texture()
        .build()
        .context("building canvas")?;
    canvas
        .set_logical_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .context("setting logical size")?;

    let texture_creator = canvas.texture_creator();
    let mut game = Game::new(&mut canvas, &texture_creator).context("initializing game")?;

    let mut event_pump = sdl_context
        .event_pump()
        .map_err(anyhow::Error::msg)
        .context("getting SDL event pump")?;

    info!("starting game loop ({:.3}ms)", LOOP_TIME.as_secs_f32() * 1000.0);
    'running: loop {
        let start = Instant::now();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    info!("exit requested");
                    break 'running;
                }
                _ => {}
            }
        }

        {
            let keys = event_pump.keyboard_state();
            game.tick(&keys)?;
        }
        game.draw(&mut canvas)?;

        let elapsed = start.elapsed();
        if elapsed < LOOP_TIME {
            spin_sleep::sleep(LOOP_TIME - elapsed);
        } else {
            warn!("game loop behind schedule by {:?}", elapsed - LOOP_TIME);
        }
    }

    Ok(())
}
