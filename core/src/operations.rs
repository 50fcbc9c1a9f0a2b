use rand::Rng;
use tracing::{debug, warn};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, SPRITE_HEIGHT, STACK_SIZE};
use crate::instruction::Instruction;
use crate::state::{Keypad, State};

/// What the cycle should do after an instruction has been applied
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `Fx0A` found no pressed key; the pc was left in place and timers must not tick
    AwaitingKey,
}

/// Applies `instruction` to `state` in place.
///
/// Every instruction owns its pc update: +2 by default, +4 for a taken skip,
/// an absolute address for jumps, calls and returns, and nothing at all for
/// unknown opcodes and a blocked key-wait.
pub fn execute<R: Rng + ?Sized>(
    instruction: Instruction,
    state: &mut State,
    keys: &Keypad,
    rng: &mut R,
) -> Flow {
    use Instruction::*;

    // registers as they were before this instruction
    let v = state.v;
    let reg = |r: u8| v[r as usize];

    match instruction {
        Clear => clear(state),
        Return => ret(state),
        Jump { addr } => state.pc = addr,
        Call { addr } => call(state, addr),
        SkipEqImm { x, nn } => skip_if(state, reg(x) == nn),
        SkipNeImm { x, nn } => skip_if(state, reg(x) != nn),
        SkipEqReg { x, y } => skip_if(state, reg(x) == reg(y)),
        LoadImm { x, nn } => set(state, x, nn),
        AddImm { x, nn } => set(state, x, reg(x).wrapping_add(nn)),
        Move { x, y } => set(state, x, reg(y)),
        Or { x, y } => set(state, x, reg(x) | reg(y)),
        And { x, y } => set(state, x, reg(x) & reg(y)),
        Xor { x, y } => set(state, x, reg(x) ^ reg(y)),
        // no carry flag for this variant
        AddReg { x, y } => set(state, x, reg(x).wrapping_add(reg(y))),
        Sub { x, y } => sub(state, x, y),
        // no flag for this variant either
        ShiftRight { x } => set(state, x, reg(x) >> 1),
        SubN { x, y } => subn(state, x, y),
        ShiftLeft { x } => shl(state, x),
        SkipNeReg { x, y } => skip_if(state, reg(x) != reg(y)),
        LoadI { addr } => {
            state.i = addr;
            state.pc = state.pc.wrapping_add(2);
        }
        JumpV0 { addr } => state.pc = u16::from(reg(0x0)) + addr,
        Random { x, nn } => set(state, x, rng.gen::<u8>() & nn),
        Draw { x, y, n } => draw(state, reg(x), reg(y), n),
        SkipKeyPressed { x } => skip_if(state, is_pressed(keys, reg(x))),
        SkipKeyReleased { x } => skip_if(state, !is_pressed(keys, reg(x))),
        LoadDelay { x } => {
            let delay = state.delay_timer;
            set(state, x, delay)
        }
        WaitKey { x } => return wait_key(state, keys, x),
        SetDelay { x } => {
            state.delay_timer = reg(x);
            state.pc = state.pc.wrapping_add(2);
        }
        SetSound { x } => {
            state.sound_timer = reg(x);
            state.pc = state.pc.wrapping_add(2);
        }
        AddI { x } => add_i(state, reg(x)),
        LoadFont { x } => {
            state.i = u16::from(reg(x)) * SPRITE_HEIGHT;
            state.pc = state.pc.wrapping_add(2);
        }
        StoreBcd { x } => bcd(state, reg(x)),
        StoreRegisters { x } => store(state, x),
        LoadRegisters { x } => load(state, x),
        Unknown(op) => warn!("unknown opcode {:#06X} at {:#05X}", op, state.pc),
    }
    Flow::Continue
}

/// Vx = value
fn set(state: &mut State, x: u8, value: u8) {
    state.v[x as usize] = value;
    state.pc = state.pc.wrapping_add(2);
}

fn skip_if(state: &mut State, condition: bool) {
    state.pc = state.pc.wrapping_add(if condition { 4 } else { 2 });
}

fn is_pressed(keys: &Keypad, key: u8) -> bool {
    keys.get(key as usize).copied().unwrap_or(false)
}

/// clear
fn clear(state: &mut State) {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    state.pc = state.pc.wrapping_add(2);
}

/// PC = STACK.pop() + 2
fn ret(state: &mut State) {
    state.sp = state.sp.wrapping_sub(1);
    state.pc = state.stack[state.sp as usize % STACK_SIZE].wrapping_add(2);
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) {
    state.stack[state.sp as usize % STACK_SIZE] = state.pc;
    state.sp = state.sp.wrapping_add(1);
    state.pc = addr;
}

/// VF = !borrow; Vx -= Vy
/// VF is written first, so with x = F the difference lands on top of it.
fn sub(state: &mut State, x: u8, y: u8) {
    state.v[FLAG_REGISTER] = if state.v[y as usize] > state.v[x as usize] { 0 } else { 1 };
    let difference = state.v[x as usize].wrapping_sub(state.v[y as usize]);
    set(state, x, difference);
}

/// VF = !borrow; Vx = Vy - Vx
fn subn(state: &mut State, x: u8, y: u8) {
    state.v[FLAG_REGISTER] = if state.v[x as usize] > state.v[y as usize] { 0 } else { 1 };
    let difference = state.v[y as usize].wrapping_sub(state.v[x as usize]);
    set(state, x, difference);
}

/// VF = msb; Vx <<= 1
fn shl(state: &mut State, x: u8) {
    state.v[FLAG_REGISTER] = state.v[x as usize] >> 7;
    let shifted = state.v[x as usize] << 1;
    set(state, x, shifted);
}

/// VF = I + Vx > 0xFFF; I += Vx
/// The comparison is made on the full sum, before I wraps at 16 bits.
fn add_i(state: &mut State, vx: u8) {
    let sum = u32::from(state.i) + u32::from(vx);
    state.v[FLAG_REGISTER] = if sum > 0xFFF { 1 } else { 0 };
    state.i = state.i.wrapping_add(u16::from(vx));
    state.pc = state.pc.wrapping_add(2);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer.
/// Pixels past the right or bottom edge are dropped.
/// Sets VF if any pixels were erased.
fn draw(state: &mut State, origin_x: u8, origin_y: u8, n: u8) {
    state.v[FLAG_REGISTER] = 0;

    for row in 0..n {
        let sprite = state.read(state.i.wrapping_add(u16::from(row)));
        let py = origin_y as usize + row as usize;
        for bit in 0..8 {
            if sprite & (0x80 >> bit) == 0 {
                continue;
            }
            let px = origin_x as usize + bit;
            if px >= DISPLAY_WIDTH || py >= DISPLAY_HEIGHT {
                continue;
            }
            if state.frame_buffer[py][px] == 1 {
                state.v[FLAG_REGISTER] = 1;
            }
            state.frame_buffer[py][px] ^= 1;
        }
    }

    state.draw_flag = true;
    state.pc = state.pc.wrapping_add(2);
}

/// Vx = first pressed key, or hold the pc until one is
/// When several keys are down the highest one wins.
fn wait_key(state: &mut State, keys: &Keypad, x: u8) -> Flow {
    match keys.iter().rposition(|&pressed| pressed) {
        Some(key) => {
            debug!("V{:X} received key {:X}", x, key);
            state.v[x as usize] = key as u8;
            state.awaiting_key = None;
            state.pc = state.pc.wrapping_add(2);
            Flow::Continue
        }
        None => {
            if state.awaiting_key.is_none() {
                debug!("V{:X} waiting for a key", x);
            }
            state.awaiting_key = Some(x);
            Flow::AwaitingKey
        }
    }
}

/// mem[I..I+3] = decimal digits of Vx
/// The ones digit is taken as (Vx % 100) % 10, which agrees with Vx % 10.
fn bcd(state: &mut State, vx: u8) {
    let i = state.i;
    state.write(i, vx / 100);
    state.write(i.wrapping_add(1), (vx / 10) % 10);
    state.write(i.wrapping_add(2), (vx % 100) % 10);
    state.pc = state.pc.wrapping_add(2);
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
fn store(state: &mut State, x: u8) {
    for k in 0..=x {
        let (addr, value) = (state.i.wrapping_add(u16::from(k)), state.v[k as usize]);
        state.write(addr, value);
    }
    state.i = state.i.wrapping_add(u16::from(x) + 1);
    state.pc = state.pc.wrapping_add(2);
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
fn load(state: &mut State, x: u8) {
    for k in 0..=x {
        state.v[k as usize] = state.read(state.i.wrapping_add(u16::from(k)));
    }
    state.i = state.i.wrapping_add(u16::from(x) + 1);
    state.pc = state.pc.wrapping_add(2);
}
