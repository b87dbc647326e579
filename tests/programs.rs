use chip_8_core::chip::{
    chip8::{
        constants::{CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_WIDTH, CHIP8_PIXEL_ON},
        Chip8,
    },
    Chip, CpuFault,
};

fn run(chip8: &mut Chip8, cycles: usize) {
    for _ in 0..cycles {
        chip8.cycle().expect("cycle faulted");
    }
}

#[test]
fn adds_two_registers() {
    let mut chip8 = Chip8::with_seed(1);
    chip8
        .load_program(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14])
        .unwrap();

    run(&mut chip8, 3);

    assert_eq!(chip8.registers()[0], 8);
    assert_eq!(chip8.registers()[0xF], 0);
    assert_eq!(chip8.program_counter(), 0x206);
}

#[test]
fn draws_a_glyph_and_its_bcd_digits() {
    let mut chip8 = Chip8::with_seed(1);
    chip8
        .load_program(&[
            0x60, 0x9D, // LD V0, 157
            0xA3, 0x00, // LD I, 0x300
            0xF0, 0x33, // LD B, V0
            0xF2, 0x65, // LD V2, [I]
            0xF1, 0x29, // LD F, V1
            0x63, 0x00, // LD V3, 0
            0xD3, 0x35, // DRW V3, V3, 5
        ])
        .unwrap();

    run(&mut chip8, 5);
    assert_eq!(chip8.registers()[0..3], [1, 5, 7]);
    assert_eq!(chip8.memory()[0x300..0x303], [1, 5, 7]);
    assert_eq!(chip8.index(), CHIP8_CHARSET_OFFSET + 5 * 5);

    run(&mut chip8, 2);
    // Glyph 5 starts with 0xF0, 0x80.
    let pins = chip8.read_output_pins();
    assert!(pins[0..4].iter().all(|&pin| pin == CHIP8_PIXEL_ON));
    assert_eq!(pins[4], 0);
    assert_eq!(pins[CHIP8_DISPLAY_WIDTH], CHIP8_PIXEL_ON);
    assert_eq!(pins[CHIP8_DISPLAY_WIDTH + 1], 0);
    assert_eq!(chip8.registers()[0xF], 0);
}

#[test]
fn counts_down_delay_timer_in_a_loop() {
    let mut chip8 = Chip8::with_seed(1);
    chip8
        .load_program(&[
            0x60, 0x0A, // LD V0, 10
            0xF0, 0x15, // LD DT, V0
            0xF1, 0x07, // LD V1, DT
            0x31, 0x00, // SE V1, 0
            0x12, 0x04, // JP 0x204
            0x12, 0x0A, // JP 0x20A
        ])
        .unwrap();

    run(&mut chip8, 40);

    assert_eq!(chip8.delay_timer(), 0);
    assert_eq!(chip8.registers()[1], 0);
    assert_eq!(chip8.program_counter(), 0x20A);
}

#[test]
fn waits_for_a_key_then_continues() {
    let mut chip8 = Chip8::with_seed(1);
    chip8
        .load_program(&[
            0xF5, 0x0A, // LD V5, K
            0xE5, 0x9E, // SKP V5
            0x00, 0xE0, // CLS
            0x12, 0x06, // JP 0x206
        ])
        .unwrap();

    run(&mut chip8, 10);
    assert_eq!(chip8.program_counter(), 0x200);

    chip8.set_input_pin(0xB, true);
    run(&mut chip8, 2);
    assert_eq!(chip8.registers()[5], 0xB);
    assert_eq!(chip8.program_counter(), 0x206);

    chip8.reset_input_pins();
    run(&mut chip8, 1);
    assert_eq!(chip8.program_counter(), 0x206);
}

#[test]
fn runaway_recursion_overflows_the_stack() {
    let mut chip8 = Chip8::with_seed(1);
    chip8.load_program(&[0x22, 0x00]).unwrap();

    run(&mut chip8, 16);
    assert_eq!(chip8.stack_pointer(), 16);

    assert_eq!(
        chip8.cycle(),
        Err(CpuFault::StackOverflow { depth: 16 })
    );
    assert_eq!(chip8.program_counter(), 0x200);
}
