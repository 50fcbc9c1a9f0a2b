use vip8_core::constants::{PROGRAM_START, SPRITE_SHEET};
use vip8_core::{Chip8, Chip8Error, Cycle};

fn machine(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_seed(0xC8);
    chip8.load_rom(program).expect("program fits in memory");
    chip8
}

#[test]
fn initializes_machine() {
    let chip8 = Chip8::with_seed(0);
    let state = chip8.state();
    assert_eq!(state.pc, PROGRAM_START);
    assert_eq!(state.v, [0; 16]);
    assert_eq!(state.stack, [0; 16]);
    assert_eq!(state.sp, 0);
    assert!(state.draw_flag);
    assert_eq!(state.memory[..80], SPRITE_SHEET[..]);
    assert!(state.memory[80..].iter().all(|&b| b == 0));
}

#[test]
fn jump_to_self_loops() {
    let mut chip8 = machine(&[0x12, 0x00]);
    chip8.cycle();
    assert_eq!(chip8.state().pc, 0x200);
    chip8.cycle();
    assert_eq!(chip8.state().pc, 0x200);
}

#[test]
fn register_set_then_skip() {
    let mut chip8 = machine(&[0x60, 0x05, 0x30, 0x05]);
    chip8.cycle();
    chip8.cycle();
    assert_eq!(chip8.state().v[0x0], 5);
    assert_eq!(chip8.state().pc, 0x200 + 2 + 4);
}

#[test]
fn clear_screen_after_drawing() {
    // DRW V0, V0, 5 (the "0" glyph at the origin); CLS
    let mut chip8 = machine(&[0xD0, 0x05, 0x00, 0xE0]);
    chip8.cycle();
    assert!(chip8.frame_buffer().iter().flatten().any(|&p| p == 1));
    assert!(chip8.take_redraw());

    chip8.cycle();
    assert!(chip8.frame_buffer().iter().flatten().all(|&p| p == 0));
    assert!(chip8.take_redraw());
}

#[test]
fn key_wait_blocks_until_a_key_is_pressed() {
    let mut chip8 = machine(&[0xF3, 0x0A]);
    for _ in 0..5 {
        assert_eq!(chip8.cycle(), Cycle::AwaitingKey);
        assert_eq!(chip8.state().pc, 0x200);
    }

    let mut keys = [false; 16];
    keys[0x5] = true;
    chip8.set_keys(keys);
    assert_eq!(chip8.cycle(), Cycle::Ran);
    assert_eq!(chip8.state().v[0x3], 0x5);
    assert_eq!(chip8.state().pc, 0x202);
}

#[test]
fn call_then_return() {
    // CALL 0x204; (unused); RET
    let mut chip8 = machine(&[0x22, 0x04, 0x00, 0x00, 0x00, 0xEE]);
    chip8.cycle();
    assert_eq!(chip8.state().pc, 0x204);
    assert_eq!(chip8.state().sp, 1);
    chip8.cycle();
    assert_eq!(chip8.state().pc, 0x202);
    assert_eq!(chip8.state().sp, 0);
}

#[test]
fn sprite_drawn_twice_is_erased() {
    // V1 = 20; V2 = 10; I = glyph "8"; DRW V1, V2, 5; DRW V1, V2, 5
    let mut chip8 = machine(&[
        0x61, 0x14, 0x62, 0x0A, 0xA0, 0x28, 0xD1, 0x25, 0xD1, 0x25,
    ]);
    for _ in 0..4 {
        chip8.cycle();
    }
    assert_eq!(chip8.state().v[0xF], 0);
    chip8.cycle();
    assert_eq!(chip8.state().v[0xF], 1);
    assert!(chip8.frame_buffer().iter().flatten().all(|&p| p == 0));
}

#[test]
fn overlapping_single_row_sprites_collide() {
    // I = 0x208; DRW V0, V0, 1; DRW V0, V0, 1; data 0xFF
    let mut chip8 = machine(&[0xA2, 0x08, 0xD0, 0x01, 0xD0, 0x01, 0x00, 0x00, 0xFF]);
    chip8.cycle();
    chip8.cycle();
    assert_eq!(chip8.state().v[0xF], 0);
    chip8.cycle();
    assert_eq!(chip8.state().v[0xF], 1);
}

#[test]
fn bcd_of_234() {
    // V4 = 234; I = 0x300; LD B, V4
    let mut chip8 = machine(&[0x64, 0xEA, 0xA3, 0x00, 0xF4, 0x33]);
    for _ in 0..3 {
        chip8.cycle();
    }
    assert_eq!(chip8.state().memory[0x300..0x303], [2, 3, 4]);
}

#[test]
fn oversized_rom_is_rejected_and_execution_continues() {
    let mut chip8 = Chip8::with_seed(0);
    let err = chip8.load_rom(&[0x12; 4000]).unwrap_err();
    assert_eq!(
        err,
        Chip8Error::RomTooLarge {
            size: 4000,
            max: 3583
        }
    );
    // runs the zeroed memory, which is an unknown opcode
    assert_eq!(chip8.cycle(), Cycle::Ran);
    assert_eq!(chip8.state().pc, 0x200);
}
