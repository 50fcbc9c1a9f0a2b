use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{trace, warn};

use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, MAX_SAVED_STATES, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::operations::{execute, Flow};
use crate::state::{FrameBuffer, Keypad, State};

/// What happened during a call to [`Chip8::cycle`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction ran and the timers ticked
    Ran,
    /// As `Ran`, and the sound timer passed through 1 so a beep is due
    Beep,
    /// Blocked on `Fx0A`; nothing ran and the timers held
    AwaitingKey,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `pressed_keys` with public interfaces for manipulating them
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU, timers included
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    pressed_keys: Keypad,
    rng: StdRng,
}

// TODO explore time/memory efficiency of more compact representations of past states (e.g. diffs)
impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose `Cxnn` results are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            pressed_keys: [false; KEY_COUNT],
            rng,
        }
    }

    /// Copy a ROM into memory at 0x200
    ///
    /// An oversized ROM is rejected and memory is left as it was; execution can still go
    /// ahead against whatever is already there.
    ///
    /// # Arguments
    /// * `rom` the raw program bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            warn!(
                "ROM too large for memory ({} bytes, limit {})",
                rom.len(),
                MAX_ROM_SIZE
            );
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Read-only view of the machine
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Returns whether the display should be redrawn and unsets the draw flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.state.draw_flag, false)
    }

    /// Replace the pressed status of every key
    pub fn set_keys(&mut self, keys: Keypad) {
        self.pressed_keys = keys;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed_keys.get_mut(key as usize) {
            *pressed = true;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed_keys.get_mut(key as usize) {
            *pressed = false;
        }
    }

    /// Advances the machine by a single cycle
    /// - if awaiting a keypress, retries the key-wait and bails out if no key is down
    /// - otherwise gets and executes the next opcode
    /// - then advances the timers
    pub fn cycle(&mut self) -> Cycle {
        let previous = self.state;

        let instruction = match self.state.awaiting_key {
            Some(x) => Instruction::WaitKey { x },
            None => {
                let op = self.state.fetch();
                let instruction = Instruction::decode(op);
                trace!(
                    "{:04X} {:<16} v{:02X?} i{:04X} pc{:04X}",
                    op,
                    instruction.to_string(),
                    self.state.v,
                    self.state.i,
                    self.state.pc
                );
                instruction
            }
        };

        match execute(
            instruction,
            &mut self.state,
            &self.pressed_keys,
            &mut self.rng,
        ) {
            Flow::AwaitingKey => Cycle::AwaitingKey,
            Flow::Continue => {
                self.save_state(previous);
                if self.advance_timers() {
                    Cycle::Beep
                } else {
                    Cycle::Ran
                }
            }
        }
    }

    /// Reverses the machine by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn reverse_cycle(&mut self) {
        if let Some(state) = self.previous_states.pop_front() {
            self.state = state;
        }
    }

    /// Number of cycles that can currently be rewound
    pub fn history_len(&self) -> usize {
        self.previous_states.len()
    }

    /// Puts a state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }

    /// Handles timers, which tick once per executed cycle
    /// - decrements the delay timer if it's above 0
    /// - decrements the sound timer if it's above 0, returning true when it goes 1 -> 0
    fn advance_timers(&mut self) -> bool {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        let beep = self.state.sound_timer == 1;
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
        beep
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
