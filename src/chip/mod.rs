pub mod chip8;

use std::fs;
use std::path::{Path, PathBuf};

use cursive::CbSink;
use thiserror::Error;

/// A chip that executes one instruction per `cycle` and talks to the outside
/// world through input and output pins.
pub trait Chip {
    type PinAddress;

    /// Copies `program` into memory at the program entry address and returns the
    /// number of bytes loaded. On error the chip is left untouched.
    fn load_program(&mut self, program: &[u8]) -> Result<usize, LoadProgramError>;

    /// Reads the program at `path` and loads it via `load_program`.
    fn load_program_file(&mut self, path: &Path) -> Result<usize, LoadProgramError> {
        let program = fs::read(path).map_err(|source| LoadProgramError::CouldNotReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&program)
    }

    /// Executes a single fetch-decode-execute step and ticks the timers once.
    fn cycle(&mut self) -> Result<(), CpuFault>;

    fn read_output_pins(&self) -> &[u32];

    fn set_input_pin(&mut self, pin: Self::PinAddress, value: bool);

    fn reset_input_pins(&mut self);
}

/// A chip whose output pins can be rendered by a cursive based user interface.
pub trait ChipWithCursiveDisplay {
    /// Pushes the current output pins to the UI if they changed since the last call.
    fn update_ui(&mut self, gfx_sink: &CbSink);
}

/// Captures errors when loading a program into a chip.
#[derive(Debug, Error)]
pub enum LoadProgramError {
    #[error("Could not read program file {}: {}", .path.display(), .source)]
    CouldNotReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The program is empty.")]
    EmptyProgram,

    #[error("The program is too large ({0} bytes, at most {1} bytes fit into memory).")]
    ProgramTooLarge(usize, usize),
}

/// Conditions under which a cycle cannot complete. A faulting cycle leaves
/// the chip in the state it had before the cycle started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuFault {
    #[error("Stack overflow: all {depth} stack levels are in use")]
    StackOverflow { depth: usize },

    #[error("Stack underflow: return without a matching call")]
    StackUnderflow,

    #[error("Memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("Sprite pixel {index} lies outside of the framebuffer")]
    FramebufferOutOfBounds { index: usize },

    #[error("Key {key:#04X} does not exist on the keypad")]
    InvalidKey { key: u8 },
}
