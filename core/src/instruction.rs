use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction along with its operands.
///
/// `x` and `y` are register indices, `nn` an immediate byte, `addr` a 12-bit address
/// and `n` the height of a sprite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xnn
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy_
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn
    LoadImm { x: u8, nn: u8 },
    /// 7xnn
    AddImm { x: u8, nn: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubN { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy_
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadI { addr: u16 },
    /// Bnnn
    JumpV0 { addr: u16 },
    /// Cxnn
    Random { x: u8, nn: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyReleased { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LoadFont { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
    /// Anything else, including unlisted variants within a known group
    Unknown(u16),
}

impl Instruction {
    /// Selects the Instruction for a given opcode.
    ///
    /// The low nibble of `5xy_` and `9xy_` is not checked.
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqImm { x, nn },
            (0x4, ..) => SkipNeImm { x, nn },
            (0x5, ..) => SkipEqReg { x, y },
            (0x6, ..) => LoadImm { x, nn },
            (0x7, ..) => AddImm { x, nn },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, ..) => SkipNeReg { x, y },
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpV0 { addr },
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => SkipKeyPressed { x },
            (0xE, .., 0xA, 0x1) => SkipKeyReleased { x },
            (0xF, .., 0x0, 0x7) => LoadDelay { x },
            (0xF, .., 0x0, 0xA) => WaitKey { x },
            (0xF, .., 0x1, 0x5) => SetDelay { x },
            (0xF, .., 0x1, 0x8) => SetSound { x },
            (0xF, .., 0x1, 0xE) => AddI { x },
            (0xF, .., 0x2, 0x9) => LoadFont { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegisters { x },
            (0xF, .., 0x6, 0x5) => LoadRegisters { x },
            _ => Unknown(op),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x } => write!(f, "SHR V{:X}", x),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? {:#06X}", op),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decodes_fixed_opcodes() {
        assert_eq!(Instruction::decode(0x00E0), Clear);
        assert_eq!(Instruction::decode(0x00EE), Return);
    }

    #[test]
    fn test_decodes_address_operands() {
        assert_eq!(Instruction::decode(0x1ABC), Jump { addr: 0xABC });
        assert_eq!(Instruction::decode(0x2123), Call { addr: 0x123 });
        assert_eq!(Instruction::decode(0xAABC), LoadI { addr: 0xABC });
        assert_eq!(Instruction::decode(0xB300), JumpV0 { addr: 0x300 });
    }

    #[test]
    fn test_decodes_register_operands() {
        assert_eq!(Instruction::decode(0x3A11), SkipEqImm { x: 0xA, nn: 0x11 });
        assert_eq!(Instruction::decode(0x8125), Sub { x: 0x1, y: 0x2 });
        assert_eq!(Instruction::decode(0x8AB6), ShiftRight { x: 0xA });
        assert_eq!(Instruction::decode(0x8ABE), ShiftLeft { x: 0xA });
        assert_eq!(Instruction::decode(0xD125), Draw { x: 0x1, y: 0x2, n: 0x5 });
        assert_eq!(Instruction::decode(0xE29E), SkipKeyPressed { x: 0x2 });
        assert_eq!(Instruction::decode(0xE2A1), SkipKeyReleased { x: 0x2 });
        assert_eq!(Instruction::decode(0xF30A), WaitKey { x: 0x3 });
        assert_eq!(Instruction::decode(0xF465), LoadRegisters { x: 0x4 });
    }

    #[test]
    fn test_register_compare_ignores_low_nibble() {
        assert_eq!(Instruction::decode(0x512F), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(Instruction::decode(0x9123), SkipNeReg { x: 0x1, y: 0x2 });
    }

    #[test]
    fn test_unlisted_opcodes_are_unknown() {
        for &op in &[0x0000, 0x0123, 0x00E1, 0x8128, 0x812F, 0xE100, 0xF1FF, 0xF100] {
            assert_eq!(Instruction::decode(op), Unknown(op), "{:#06X}", op);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x6122).to_string(), "LD V1, 0x22");
        assert_eq!(Instruction::decode(0xD0A5).to_string(), "DRW V0, VA, 5");
        assert_eq!(Instruction::decode(0x1200).to_string(), "JP 0x200");
        assert_eq!(Instruction::decode(0xF155).to_string(), "LD [I], V1");
        assert_eq!(Instruction::decode(0x8128).to_string(), "??? 0x8128");
    }
}
