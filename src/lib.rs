//! A CHIP-8 CPU core. The instruction set follows the one described
//! [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table): 4096 bytes of memory,
//! sixteen 8-bit registers, a sixteen level call stack, two timers, a 64x32
//! monochrome framebuffer and a 16-key hexadecimal keypad.
//!
//! The core only advances state one cycle at a time. Pacing, input polling and
//! rendering are left to the caller; the `emulator_text_ui` binary is one such
//! caller built on the cursive text user interface library.
pub mod chip;
