use std::ops::Range;

use crate::chip::{
    chip8::{constants::CHIP8_MEMORY_SIZE, Chip8},
    CpuFault,
};

/// Skips the next instruction if `condition` holds.
pub fn skip_next_if(state: &mut Chip8, condition: bool) {
    if condition {
        increment_program_counter(state);
    }
}

pub fn increment_program_counter(state: &mut Chip8) {
    state.program_counter = state.program_counter.wrapping_add(2);
}

/// Returns the memory range `start..start + len`, or the first address past the
/// end of memory if the range does not fit.
pub fn memory_range(start: u16, len: usize) -> Result<Range<usize>, CpuFault> {
    let start = start as usize;
    let end = start + len;
    if end > CHIP8_MEMORY_SIZE {
        return Err(CpuFault::MemoryOutOfBounds {
            address: start.max(CHIP8_MEMORY_SIZE),
        });
    }
    Ok(start..end)
}
