#[macro_use]
mod macros;
mod arithmetic_and_logic;
mod program_flow;
mod system;

use std::fmt;

use crate::chip::{chip8::Chip8, CpuFault};

/// Represents a CHIP-8 opcode. A CHIP-8 opcode is two bytes long, stored
/// big-endian in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Opcode(u16);

impl Opcode {
    /// Constructs a new `Opcode` given its byte representation.
    pub(super) fn new(opcode: &[u8; 2]) -> Opcode {
        Opcode(u16::from_be_bytes(*opcode))
    }

    /// The instruction class is the most significant nibble of the opcode.
    fn instruction_class(self) -> usize {
        ((self.0 & 0xF000) >> 12) as usize
    }

    /// The register operand `x` in `_x__`.
    fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// The register operand `y` in `__y_`.
    fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// The least significant nibble, `___n`.
    fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// The least significant byte, `__kk`.
    fn byte(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The opcode without its instruction class, `_nnn`.
    fn address(self) -> u16 {
        self.0 & 0x0FFF
    }
}

/// A decoded instruction together with the operands it was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Instruction {
    /// Any opcode without a meaning. Executing it only advances the program counter.
    Nop,
    Cls,
    Ret,
    Jp { address: u16 },
    Call { address: u16 },
    SeByte { x: u8, byte: u8 },
    SneByte { x: u8, byte: u8 },
    SeReg { x: u8, y: u8 },
    LdByte { x: u8, byte: u8 },
    AddByte { x: u8, byte: u8 },
    LdReg { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddReg { x: u8, y: u8 },
    Sub { x: u8, y: u8 },
    Shr { x: u8 },
    Subn { x: u8, y: u8 },
    Shl { x: u8 },
    SneReg { x: u8, y: u8 },
    LdIndex { address: u16 },
    JpV0 { address: u16 },
    Rnd { x: u8, byte: u8 },
    Drw { x: u8, y: u8, rows: u8 },
    Skp { x: u8 },
    Sknp { x: u8 },
    LdFromDelay { x: u8 },
    LdKey { x: u8 },
    LdDelay { x: u8 },
    LdSound { x: u8 },
    AddIndex { x: u8 },
    LdGlyph { x: u8 },
    LdBcd { x: u8 },
    StoreRegisters { x: u8 },
    LoadRegisters { x: u8 },
}

type Decoder = fn(Opcode) -> Instruction;

/// First dispatch stage, indexed by the instruction class.
static INSTRUCTION_CLASSES: [Decoder; 16] = [
    decode_system,
    decode_jp,
    decode_call,
    decode_se_byte,
    decode_sne_byte,
    decode_se_reg,
    decode_ld_byte,
    decode_add_byte,
    decode_register,
    decode_sne_reg,
    decode_ld_index,
    decode_jp_v0,
    decode_rnd,
    decode_drw,
    decode_keypad,
    decode_misc,
];

/// Family 0x0, indexed by the least significant nibble.
static SYSTEM: [Decoder; 16] = dispatch_table!(16;
    0x0 => decode_cls,
    0xE => decode_ret,
);

/// Family 0x8, indexed by the least significant nibble.
static REGISTER: [Decoder; 16] = dispatch_table!(16;
    0x0 => decode_ld_reg,
    0x1 => decode_or,
    0x2 => decode_and,
    0x3 => decode_xor,
    0x4 => decode_add_reg,
    0x5 => decode_sub,
    0x6 => decode_shr,
    0x7 => decode_subn,
    0xE => decode_shl,
);

/// Family 0xE, indexed by the least significant nibble.
static KEYPAD: [Decoder; 16] = dispatch_table!(16;
    0x1 => decode_sknp,
    0xE => decode_skp,
);

/// Family 0xF, indexed by the least significant byte. Bytes past the end of
/// the table decode to `Instruction::Nop` as well.
static MISC: [Decoder; 0x66] = dispatch_table!(0x66;
    0x07 => decode_ld_from_delay,
    0x0A => decode_ld_key,
    0x15 => decode_ld_delay,
    0x18 => decode_ld_sound,
    0x1E => decode_add_index,
    0x29 => decode_ld_glyph,
    0x33 => decode_ld_bcd,
    0x55 => decode_store_registers,
    0x65 => decode_load_registers,
);

fn decode_system(opcode: Opcode) -> Instruction {
    SYSTEM[opcode.n() as usize](opcode)
}

fn decode_register(opcode: Opcode) -> Instruction {
    REGISTER[opcode.n() as usize](opcode)
}

fn decode_keypad(opcode: Opcode) -> Instruction {
    KEYPAD[opcode.n() as usize](opcode)
}

fn decode_misc(opcode: Opcode) -> Instruction {
    MISC.get(opcode.byte() as usize)
        .map_or(Instruction::Nop, |decoder| decoder(opcode))
}

define_decoder!(decode_nop, Nop);
define_decoder!(decode_cls, Cls);
define_decoder!(decode_ret, Ret);
define_decoder!(decode_jp, Jp { address: address });
define_decoder!(decode_call, Call { address: address });
define_decoder!(decode_se_byte, SeByte { x: x, byte: byte });
define_decoder!(decode_sne_byte, SneByte { x: x, byte: byte });
define_decoder!(decode_se_reg, SeReg { x: x, y: y });
define_decoder!(decode_ld_byte, LdByte { x: x, byte: byte });
define_decoder!(decode_add_byte, AddByte { x: x, byte: byte });
define_decoder!(decode_ld_reg, LdReg { x: x, y: y });
define_decoder!(decode_or, Or { x: x, y: y });
define_decoder!(decode_and, And { x: x, y: y });
define_decoder!(decode_xor, Xor { x: x, y: y });
define_decoder!(decode_add_reg, AddReg { x: x, y: y });
define_decoder!(decode_sub, Sub { x: x, y: y });
define_decoder!(decode_shr, Shr { x: x });
define_decoder!(decode_subn, Subn { x: x, y: y });
define_decoder!(decode_shl, Shl { x: x });
define_decoder!(decode_sne_reg, SneReg { x: x, y: y });
define_decoder!(decode_ld_index, LdIndex { address: address });
define_decoder!(decode_jp_v0, JpV0 { address: address });
define_decoder!(decode_rnd, Rnd { x: x, byte: byte });
define_decoder!(decode_drw, Drw { x: x, y: y, rows: n });
define_decoder!(decode_skp, Skp { x: x });
define_decoder!(decode_sknp, Sknp { x: x });
define_decoder!(decode_ld_from_delay, LdFromDelay { x: x });
define_decoder!(decode_ld_key, LdKey { x: x });
define_decoder!(decode_ld_delay, LdDelay { x: x });
define_decoder!(decode_ld_sound, LdSound { x: x });
define_decoder!(decode_add_index, AddIndex { x: x });
define_decoder!(decode_ld_glyph, LdGlyph { x: x });
define_decoder!(decode_ld_bcd, LdBcd { x: x });
define_decoder!(decode_store_registers, StoreRegisters { x: x });
define_decoder!(decode_load_registers, LoadRegisters { x: x });

impl Instruction {
    /// Decodes `opcode` in two table lookups: the instruction class selects a
    /// decoder, which for the families 0x0, 0x8, 0xE and 0xF looks up the
    /// sub-opcode in the family's own table.
    pub(super) fn decode(opcode: Opcode) -> Instruction {
        INSTRUCTION_CLASSES[opcode.instruction_class()](opcode)
    }

    /// Executes `self` relative to the given state. The program counter has
    /// already been advanced past the instruction. Handlers check every access
    /// before they modify the state, so a fault leaves `state` untouched.
    pub(super) fn execute(self, state: &mut Chip8) -> Result<(), CpuFault> {
        use Instruction::*;

        match self {
            Nop => Ok(()),
            Cls => system::clear_screen(state),
            Ret => program_flow::ret(state),
            Jp { address } => program_flow::jump(state, address),
            Call { address } => program_flow::call(state, address),
            SeByte { x, byte } => program_flow::skip_if_equal(state, x, byte),
            SneByte { x, byte } => program_flow::skip_if_not_equal(state, x, byte),
            SeReg { x, y } => program_flow::skip_if_registers_equal(state, x, y),
            LdByte { x, byte } => arithmetic_and_logic::load_byte(state, x, byte),
            AddByte { x, byte } => arithmetic_and_logic::add_byte(state, x, byte),
            LdReg { x, y } => arithmetic_and_logic::load_register(state, x, y),
            Or { x, y } => arithmetic_and_logic::or(state, x, y),
            And { x, y } => arithmetic_and_logic::and(state, x, y),
            Xor { x, y } => arithmetic_and_logic::xor(state, x, y),
            AddReg { x, y } => arithmetic_and_logic::add_register(state, x, y),
            Sub { x, y } => arithmetic_and_logic::sub(state, x, y),
            Shr { x } => arithmetic_and_logic::shift_right(state, x),
            Subn { x, y } => arithmetic_and_logic::sub_negated(state, x, y),
            Shl { x } => arithmetic_and_logic::shift_left(state, x),
            SneReg { x, y } => program_flow::skip_if_registers_not_equal(state, x, y),
            LdIndex { address } => arithmetic_and_logic::load_index(state, address),
            JpV0 { address } => program_flow::jump_offset(state, address),
            Rnd { x, byte } => arithmetic_and_logic::random(state, x, byte),
            Drw { x, y, rows } => system::draw(state, x, y, rows),
            Skp { x } => program_flow::skip_if_pressed(state, x),
            Sknp { x } => program_flow::skip_if_not_pressed(state, x),
            LdFromDelay { x } => system::load_from_delay_timer(state, x),
            LdKey { x } => system::await_key(state, x),
            LdDelay { x } => system::load_delay_timer(state, x),
            LdSound { x } => system::load_sound_timer(state, x),
            AddIndex { x } => arithmetic_and_logic::add_index(state, x),
            LdGlyph { x } => system::load_glyph(state, x),
            LdBcd { x } => system::store_bcd(state, x),
            StoreRegisters { x } => system::store_registers(state, x),
            LoadRegisters { x } => system::load_registers(state, x),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Nop => write!(f, "NOP"),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { address } => write!(f, "JP {:#05X}", address),
            Call { address } => write!(f, "CALL {:#05X}", address),
            SeByte { x, byte } => write!(f, "SE V{:X}, {:#04X}", x, byte),
            SneByte { x, byte } => write!(f, "SNE V{:X}, {:#04X}", x, byte),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, byte } => write!(f, "LD V{:X}, {:#04X}", x, byte),
            AddByte { x, byte } => write!(f, "ADD V{:X}, {:#04X}", x, byte),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdIndex { address } => write!(f, "LD I, {:#05X}", address),
            JpV0 { address } => write!(f, "JP V0, {:#05X}", address),
            Rnd { x, byte } => write!(f, "RND V{:X}, {:#04X}", x, byte),
            Drw { x, y, rows } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, rows),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdFromDelay { x } => write!(f, "LD V{:X}, DT", x),
            LdKey { x } => write!(f, "LD V{:X}, K", x),
            LdDelay { x } => write!(f, "LD DT, V{:X}", x),
            LdSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LdGlyph { x } => write!(f, "LD F, V{:X}", x),
            LdBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(opcode: u16) -> Instruction {
        Instruction::decode(Opcode::new(&opcode.to_be_bytes()))
    }

    #[test]
    fn test_operand_extraction() {
        let opcode = Opcode::new(&[0xAB, 0xCD]);
        assert_eq!(opcode.instruction_class(), 0xA);
        assert_eq!(opcode.x(), 0xB);
        assert_eq!(opcode.y(), 0xC);
        assert_eq!(opcode.n(), 0xD);
        assert_eq!(opcode.byte(), 0xCD);
        assert_eq!(opcode.address(), 0xBCD);
    }

    #[test]
    fn test_decode_instruction_classes() {
        assert_eq!(decode(0x1CAF), Instruction::Jp { address: 0xCAF });
        assert_eq!(decode(0x2CAF), Instruction::Call { address: 0xCAF });
        assert_eq!(decode(0x3412), Instruction::SeByte { x: 4, byte: 0x12 });
        assert_eq!(decode(0x5AB0), Instruction::SeReg { x: 0xA, y: 0xB });
        assert_eq!(decode(0xB123), Instruction::JpV0 { address: 0x123 });
        assert_eq!(
            decode(0xD125),
            Instruction::Drw {
                x: 1,
                y: 2,
                rows: 5
            }
        );
    }

    #[test]
    fn test_decode_families() {
        assert_eq!(decode(0x00E0), Instruction::Cls);
        assert_eq!(decode(0x00EE), Instruction::Ret);
        assert_eq!(decode(0x8AB4), Instruction::AddReg { x: 0xA, y: 0xB });
        assert_eq!(decode(0x8A0E), Instruction::Shl { x: 0xA });
        assert_eq!(decode(0xE39E), Instruction::Skp { x: 3 });
        assert_eq!(decode(0xE3A1), Instruction::Sknp { x: 3 });
        assert_eq!(decode(0xF30A), Instruction::LdKey { x: 3 });
        assert_eq!(decode(0xF365), Instruction::LoadRegisters { x: 3 });
    }

    #[test]
    fn test_unknown_sub_opcodes_decode_to_nop() {
        assert_eq!(decode(0x0123), Instruction::Nop);
        assert_eq!(decode(0x8AB8), Instruction::Nop);
        assert_eq!(decode(0x8ABF), Instruction::Nop);
        assert_eq!(decode(0xE3F5), Instruction::Nop);
        assert_eq!(decode(0xF300), Instruction::Nop);
        assert_eq!(decode(0xF3FF), Instruction::Nop);
    }

    #[test]
    fn test_display_mnemonics() {
        assert_eq!(decode(0x8014).to_string(), "ADD V0, V1");
        assert_eq!(decode(0xA2F0).to_string(), "LD I, 0x2F0");
        assert_eq!(decode(0xF233).to_string(), "LD B, V2");
        assert_eq!(Opcode::new(&[0x00, 0xE0]).to_string(), "00E0");
    }
}
