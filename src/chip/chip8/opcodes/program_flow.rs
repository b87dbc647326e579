use log::debug;

use crate::chip::{
    chip8::{
        constants::CHIP8_STACK_DEPTH,
        util, Chip8,
    },
    CpuFault,
};

/// PC = STACK.pop()
pub(super) fn ret(state: &mut Chip8) -> Result<(), CpuFault> {
    if state.stack_pointer == 0 {
        return Err(CpuFault::StackUnderflow);
    }
    state.stack_pointer -= 1;
    state.program_counter = state.stack[state.stack_pointer as usize];
    debug!(
        "Returning to {:#05X}, stack depth {}",
        state.program_counter, state.stack_pointer
    );
    Ok(())
}

pub(super) fn jump(state: &mut Chip8, address: u16) -> Result<(), CpuFault> {
    state.program_counter = address;
    Ok(())
}

/// STACK.push(PC); PC = address
pub(super) fn call(state: &mut Chip8, address: u16) -> Result<(), CpuFault> {
    if state.stack_pointer as usize == CHIP8_STACK_DEPTH {
        return Err(CpuFault::StackOverflow {
            depth: CHIP8_STACK_DEPTH,
        });
    }
    state.stack[state.stack_pointer as usize] = state.program_counter;
    state.stack_pointer += 1;
    state.program_counter = address;
    debug!(
        "Calling {:#05X}, stack depth {}",
        address, state.stack_pointer
    );
    Ok(())
}

/// PC = V0 + address
pub(super) fn jump_offset(state: &mut Chip8, address: u16) -> Result<(), CpuFault> {
    state.program_counter = address.wrapping_add(state.registers[0] as u16);
    Ok(())
}

pub(super) fn skip_if_equal(state: &mut Chip8, x: u8, byte: u8) -> Result<(), CpuFault> {
    let condition = state.registers[x as usize] == byte;
    util::skip_next_if(state, condition);
    Ok(())
}

pub(super) fn skip_if_not_equal(state: &mut Chip8, x: u8, byte: u8) -> Result<(), CpuFault> {
    let condition = state.registers[x as usize] != byte;
    util::skip_next_if(state, condition);
    Ok(())
}

pub(super) fn skip_if_registers_equal(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    let condition = state.registers[x as usize] == state.registers[y as usize];
    util::skip_next_if(state, condition);
    Ok(())
}

pub(super) fn skip_if_registers_not_equal(
    state: &mut Chip8,
    x: u8,
    y: u8,
) -> Result<(), CpuFault> {
    let condition = state.registers[x as usize] != state.registers[y as usize];
    util::skip_next_if(state, condition);
    Ok(())
}

pub(super) fn skip_if_pressed(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let pressed = key_state(state, x)?;
    util::skip_next_if(state, pressed);
    Ok(())
}

pub(super) fn skip_if_not_pressed(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    let pressed = key_state(state, x)?;
    util::skip_next_if(state, !pressed);
    Ok(())
}

/// Whether the key named by Vx is pressed.
fn key_state(state: &Chip8, x: u8) -> Result<bool, CpuFault> {
    let key = state.registers[x as usize];
    state
        .input_pins
        .get(key as usize)
        .copied()
        .ok_or(CpuFault::InvalidKey { key })
}
