/// Size of the main memory in bytes.
pub const CHIP8_MEMORY_SIZE: usize = 0x1000; // 4096

/// Address at which programs are loaded and execution starts.
pub const CHIP8_PROGRAM_START: u16 = 0x200; // 512

/// Largest program that fits between `CHIP8_PROGRAM_START` and the end of memory.
pub const CHIP8_MAX_PROGRAM_SIZE: usize = CHIP8_MEMORY_SIZE - CHIP8_PROGRAM_START as usize;

pub const CHIP8_REGISTER_COUNT: usize = 16;

pub const CHIP8_STACK_DEPTH: usize = 16;

pub const CHIP8_KEY_COUNT: usize = 16;

pub const CHIP8_DISPLAY_WIDTH: usize = 64;

pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

pub const CHIP8_DISPLAY_SIZE: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT;

/// Value of a lit framebuffer cell. Unlit cells are 0.
pub const CHIP8_PIXEL_ON: u32 = 0xFFFF_FFFF;

pub const CHIP8_CHARSET_OFFSET: u16 = 0x50; // 80

/// Each glyph of the charset is five rows high.
pub const CHIP8_GLYPH_LEN: u16 = 5;

pub const CHIP8_CHARSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
