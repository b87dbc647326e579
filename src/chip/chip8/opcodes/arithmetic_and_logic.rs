use rand::Rng;

use crate::chip::{chip8::Chip8, CpuFault};

/// Applies `f` to Vx and Vy and stores the result in Vx. If `f` reports a flag,
/// VF is set to it before the result is written, so an operation targeting VF
/// itself keeps its result rather than the flag.
fn modify_registers(
    state: &mut Chip8,
    x: u8,
    y: u8,
    f: fn(u8, u8) -> (u8, Option<bool>),
) -> Result<(), CpuFault> {
    let (val, flag) = f(state.registers[x as usize], state.registers[y as usize]);
    if let Some(flag) = flag {
        state.registers[0xF] = flag as u8;
    }
    state.registers[x as usize] = val;
    Ok(())
}

/// Vx = byte
pub(super) fn load_byte(state: &mut Chip8, x: u8, byte: u8) -> Result<(), CpuFault> {
    state.registers[x as usize] = byte;
    Ok(())
}

/// Vx += byte, without touching VF
pub(super) fn add_byte(state: &mut Chip8, x: u8, byte: u8) -> Result<(), CpuFault> {
    state.registers[x as usize] = state.registers[x as usize].wrapping_add(byte);
    Ok(())
}

pub(super) fn load_register(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |_, vy| (vy, None))
}

pub(super) fn or(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| (vx | vy, None))
}

pub(super) fn and(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| (vx & vy, None))
}

pub(super) fn xor(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| (vx ^ vy, None))
}

/// Vx += Vy; VF = carry
pub(super) fn add_register(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| {
        let (result, overflow) = vx.overflowing_add(vy);
        (result, Some(overflow))
    })
}

/// Vx -= Vy; VF = Vx > Vy
pub(super) fn sub(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| (vx.wrapping_sub(vy), Some(vx > vy)))
}

/// Vx >>= 1; VF = shifted out bit
pub(super) fn shift_right(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, x, |vx, _| (vx >> 1, Some(vx & 0x01 != 0)))
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub(super) fn sub_negated(state: &mut Chip8, x: u8, y: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, y, |vx, vy| (vy.wrapping_sub(vx), Some(vy > vx)))
}

/// Vx <<= 1; VF = shifted out bit
pub(super) fn shift_left(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    modify_registers(state, x, x, |vx, _| (vx << 1, Some(vx & 0x80 != 0)))
}

pub(super) fn load_index(state: &mut Chip8, address: u16) -> Result<(), CpuFault> {
    state.index = address;
    Ok(())
}

/// I += Vx
pub(super) fn add_index(state: &mut Chip8, x: u8) -> Result<(), CpuFault> {
    state.index = state.index.wrapping_add(state.registers[x as usize] as u16);
    Ok(())
}

/// Vx = random byte & byte
pub(super) fn random(state: &mut Chip8, x: u8, byte: u8) -> Result<(), CpuFault> {
    let sample: u8 = state.rng.gen();
    state.registers[x as usize] = sample & byte;
    Ok(())
}
