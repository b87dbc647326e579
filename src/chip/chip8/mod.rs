/// CHIP-8 constants.
pub mod constants;
/// Cursive display output.
pub mod cursive_display;
/// Decoding of opcodes and their execution.
mod opcodes;
/// Convenience functions for modification of the CHIP-8 state.
mod util;


use log::{info, trace, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::chip::{
    chip8::constants::{
        CHIP8_CHARSET, CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_SIZE, CHIP8_KEY_COUNT,
        CHIP8_MAX_PROGRAM_SIZE, CHIP8_MEMORY_SIZE, CHIP8_PROGRAM_START, CHIP8_REGISTER_COUNT,
        CHIP8_STACK_DEPTH,
    },
    chip8::opcodes::{Instruction, Opcode},
    Chip, CpuFault, LoadProgramError,
};

/// Represents the state of the CHIP-8.
#[derive(Clone)]
pub struct Chip8 {
    /// 4096 bytes of main memory
    memory: [u8; CHIP8_MEMORY_SIZE],

    /// 16 registers where each can store one byte. Register 0xF doubles as
    /// the carry, borrow and collision flag.
    registers: [u8; CHIP8_REGISTER_COUNT],

    /// An index register
    index: u16,

    /// A program counter, always pointing to the next instruction to fetch.
    program_counter: u16,

    /// The output pins, one per pixel of the 64x32 display in row-major order.
    /// A pin is either 0 or `CHIP8_PIXEL_ON`, so the buffer can be handed to a
    /// renderer as is.
    output_pins: [u32; CHIP8_DISPLAY_SIZE],

    /// The delay timer. Decremented once per cycle until it reaches 0.
    delay_timer: u8,

    /// The sound timer. Decremented once per cycle until it reaches 0.
    sound_timer: u8,

    /// The input pins. Note that those input pins are usually directly wired
    /// up to the keys. However, we do not prescribe how this is handled and
    /// hence refer to them as input pins rather than as keys.
    input_pins: [bool; CHIP8_KEY_COUNT],

    /// A stack. Note that there are no instructions allowing to modify the
    /// stack and it is only used to store return addresses for the return
    /// opcode.
    stack: [u16; CHIP8_STACK_DEPTH],

    /// Number of occupied stack levels; the next free slot.
    stack_pointer: u8,

    /// A flag that indicates whether the output pins changed since it
    /// was last set to false.
    draw: bool,

    /// Source for the random instruction.
    rng: StdRng,
}

impl Chip for Chip8 {
    /// The CHIP-8's pins can actually be addressed by using just half a byte.
    /// However, we use a whole byte here and assert whether it is in the right
    /// range, because it is more convenient to handle.
    type PinAddress = u8;

    fn load_program(&mut self, program: &[u8]) -> Result<usize, LoadProgramError> {
        if program.is_empty() {
            return Err(LoadProgramError::EmptyProgram);
        }

        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(LoadProgramError::ProgramTooLarge(
                program.len(),
                CHIP8_MAX_PROGRAM_SIZE,
            ));
        }

        let start = CHIP8_PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        info!(
            "Loaded {} program bytes at {:#05X}",
            program.len(),
            CHIP8_PROGRAM_START
        );

        Ok(program.len())
    }

    fn cycle(&mut self) -> Result<(), CpuFault> {
        let fetched_at = self.program_counter;
        let opcode = self.next_instruction()?;
        let instruction = Instruction::decode(opcode);
        trace!("{:#05X}: {} {}", fetched_at, opcode, instruction);

        self.program_counter = self.program_counter.wrapping_add(2);

        if let Err(fault) = instruction.execute(self) {
            warn!("{} at {:#05X} ({})", fault, fetched_at, instruction);
            self.program_counter = fetched_at;
            return Err(fault);
        }

        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }

        Ok(())
    }

    fn read_output_pins(&self) -> &[u32] {
        &self.output_pins
    }

    fn set_input_pin(&mut self, pin: u8, value: bool) {
        assert!(pin & 0x0F == pin);
        self.input_pins[pin as usize] = value;
    }

    fn reset_input_pins(&mut self) {
        self.input_pins = [false; CHIP8_KEY_COUNT];
    }
}

impl Chip8 {
    /// Constructs a new CHIP-8 and appropriately initializes all fields so that
    /// it is ready for the first execution cycle. Essentially this means that
    /// the program counter is set to `CHIP8_PROGRAM_START` and the default CHIP-8
    /// charset is loaded at memory address `CHIP8_CHARSET_OFFSET`. Note that no
    /// program is loaded upon initialization.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Like `new`, but seeds the random number generator so that the random
    /// instruction yields a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut memory = [0; CHIP8_MEMORY_SIZE];
        let charset_start = CHIP8_CHARSET_OFFSET as usize;
        memory[charset_start..charset_start + CHIP8_CHARSET.len()].copy_from_slice(&CHIP8_CHARSET);

        Chip8 {
            memory,
            registers: [0; CHIP8_REGISTER_COUNT],
            index: 0,
            program_counter: CHIP8_PROGRAM_START,
            output_pins: [0; CHIP8_DISPLAY_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            input_pins: [false; CHIP8_KEY_COUNT],
            stack: [0; CHIP8_STACK_DEPTH],
            stack_pointer: 0,
            draw: false,
            rng,
        }
    }

    /// Fetches the opcode `self.program_counter` points to.
    fn next_instruction(&self) -> Result<Opcode, CpuFault> {
        let range = util::memory_range(self.program_counter, 2)?;
        let bytes = &self.memory[range];
        Ok(Opcode::new(&[bytes[0], bytes[1]]))
    }

    pub fn registers(&self) -> &[u8; CHIP8_REGISTER_COUNT] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8; CHIP8_MEMORY_SIZE] {
        &self.memory
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}
