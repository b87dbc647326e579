use log::debug;

use crate::chip::{
    chip8::{
        constants::{
            CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_SIZE, CHIP8_DISPLAY_WIDTH,
            CHIP8_GLYPH_LEN, CHIP8_PIXEL_ON,
        },
        util, Chip8,
    },
    CpuFault,
};

pub(super) fn clear_screen(state: &mut Chip8) -> Result<(), CpuFault> {
    state.output_pins = [0; CHIP8_DISPLAY_SIZE];
    state.draw = true;
    Ok(())
}

/// XORs the `rows` byte sprite at I onto the display, anchored at
/// (Vx mod 64, Vy mod 32). Only the anchor wraps: a sprite bit landing past
/// the last row of the display is a fault. VF reports whether any lit pixel
/// was turned off.
pub(super) fn draw(state: &mut Chip8, x: u8, y: u8, rows: u8) -> Result<(), CpuFault> {
    let anchor_x = state.registers[x as usize] as usize % CHIP8_DISPLAY_WIDTH;
    let anchor_y = state.registers[y as usize] as usize % CHIP8_DISPLAY_HEIGHT;
    let sprite = util::memory_range(state.index, rows as usize)?;

    let mut pixels = Vec::with_capacity(rows as usize * 8);
    for (row, &pixel_byte) in state.memory[sprite].iter().enumerate() {
        for column in 0..8 {
            if pixel_byte & (0x80 >> column) != 0 {
                let index = (anchor_y + row) * CHIP8_DISPLAY_WIDTH + anchor_x + column;
                if index >= CHIP8_DISPLAY_SIZE {
                    return Err(CpuFault::FramebufferOutOfBounds { index });
                }
                pixels.push(index);
            }
        }
    }

    state.registers[0xF] = 0;
    for index in pixels {
        if state.output_pins[index] == CHIP8_PIXEL_ON {
            state.registers[0xF] = 1;
        }
        state.output_pins[index] ^= CHIP8_PIXEL_ON;
        state.draw = true;
    }
    Ok(())
}

/// Vx = DT
pub(super) fn load_from_delay_timer(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    state.registers[x as usize] = state.delay_timer;
    Ok(())
}

/// Waits for a key press and stores the lowest pressed key in Vx. While no
/// key is pressed the program counter is moved back onto this instruction, so
/// every following cycle polls again.
pub(super) fn await_key(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    match state.input_pins.iter().position(|&pressed| pressed) {
        Some(key) => {
            debug!("Key {:X} pressed, stored in V{:X}", key, x);
            state.registers[x as usize] = key as u8;
        }
        None => {
            state.program_counter = state.program_counter.wrapping_sub(2);
        }
    }
    Ok(())
}

/// DT = Vx
pub(super) fn load_delay_timer(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    state.delay_timer = state.registers[x as usize];
    Ok(())
}

/// ST = Vx
pub(super) fn load_sound_timer(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    state.sound_timer = state.registers[x as usize];
    Ok(())
}

/// I = address of the glyph for Vx
pub(super) fn load_glyph(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let character = state.registers[x as usize] as u16;
    state.index = CHIP8_CHARSET_OFFSET + character * CHIP8_GLYPH_LEN;
    Ok(())
}

/// mem[I..I+3] = hundreds, tens and ones of Vx
pub(super) fn store_bcd(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let range = util::memory_range(state.index, 3)?;
    let value = state.registers[x as usize];
    state.memory[range].copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub(super) fn store_registers(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let count = x as usize + 1;
    let range = util::memory_range(state.index, count)?;
    state.memory[range].copy_from_slice(&state.registers[..count]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub(super) fn load_registers(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let count = x as usize + 1;
    let range = util::memory_range(state.index, count)?;
    state.registers[..count].copy_from_slice(&state.memory[range]);
    Ok(())
}
