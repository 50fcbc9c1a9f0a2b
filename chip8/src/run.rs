use std::time::Instant;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use tracing::{debug, info};

use vip8_core::{Chip8, Cycle};
use vip8_display::Display;

use crate::error::FrontendError;
use crate::keymap::keymap;
use crate::options::Options;

/// Drives `chip8` until the window is closed
///
/// - Space held: ignore the clock and run as fast as possible
/// - Escape held: step backwards through saved cycles
pub fn run(mut chip8: Chip8, options: &Options) -> Result<(), FrontendError> {
    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().map_err(FrontendError::Sdl)?;
    let mut display: Display = Display::new(&sdl, "Vip-8")?;
    let mut events = sdl.event_pump().map_err(FrontendError::Sdl)?;

    let cycle_time = options.cycle_time();
    let mut last_cycle: Instant = Instant::now();

    // Whether or not the clock speed should be respected
    let mut fast_forward: bool = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind: bool = false;

    'event: loop {
        // If the draw flag is set, unset it and render the current frame
        if chip8.take_redraw() {
            display.render(chip8.frame_buffer())?;
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => rewind = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    (Keycode::Escape, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if rewind {
            chip8.reverse_cycle();
            // the restored frame is whatever it was back then
            display.render(chip8.frame_buffer())?;
        } else {
            match chip8.cycle() {
                Cycle::Beep => info!("beep"),
                Cycle::AwaitingKey | Cycle::Ran => {}
            }
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }

    debug!("window closed");
    Ok(())
}
