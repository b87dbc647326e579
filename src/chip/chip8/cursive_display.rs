use log::warn;

use crate::chip::{
    chip8::{
        constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_SIZE, CHIP8_DISPLAY_WIDTH},
        Chip8,
    },
    Chip, ChipWithCursiveDisplay,
};

use cursive::{
    theme::{BaseColor, Color, ColorStyle},
    view::View,
    Cursive, Printer, Vec2,
};

/// Name under which the display view is registered in the cursive tree.
pub const DISPLAY_VIEW_NAME: &str = "chip8_display";

/// Represents the display of the CHIP-8
pub struct Display {
    pixels: [bool; CHIP8_DISPLAY_SIZE],
}

impl Display {
    /// Creates a new display from the CHIP-8's output pins. Any nonzero pin is lit.
    pub fn new(pins: &[u32]) -> Self {
        assert_eq!(pins.len(), CHIP8_DISPLAY_SIZE);
        let mut pixels = [false; CHIP8_DISPLAY_SIZE];
        for (pixel, &pin) in pixels.iter_mut().zip(pins) {
            *pixel = pin != 0;
        }
        Display { pixels }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixels[x + CHIP8_DISPLAY_WIDTH * y]
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(&[0; CHIP8_DISPLAY_SIZE])
    }
}

/// Implements cursive::view::View for Display to enable drawing it
/// as a View out of the box.
impl View for Display {
    fn draw(&self, printer: &Printer) {
        printer.with_color(
            ColorStyle::new(Color::Dark(BaseColor::Black), Color::Light(BaseColor::White)),
            |printer| {
                for x in 0..CHIP8_DISPLAY_WIDTH {
                    for y in 0..CHIP8_DISPLAY_HEIGHT {
                        if self.is_lit(x, y) {
                            printer.print((x, y), " ");
                        }
                    }
                }
            },
        );
    }

    fn required_size(&mut self, _: Vec2) -> Vec2 {
        Vec2 {
            x: CHIP8_DISPLAY_WIDTH,
            y: CHIP8_DISPLAY_HEIGHT,
        }
    }
}

impl ChipWithCursiveDisplay for Chip8 {
    fn update_ui(&mut self, gfx_sink: &cursive::CbSink) {
        if !self.draw {
            return;
        }
        let display = Display::new(self.read_output_pins());
        let sent = gfx_sink.send(Box::new(move |s: &mut Cursive| {
            if s
                .call_on_name(DISPLAY_VIEW_NAME, |view: &mut Display| *view = display)
                .is_none()
            {
                warn!("No view named {} to draw on", DISPLAY_VIEW_NAME);
            }
        }));
        if sent.is_err() {
            warn!("Display update dropped, the UI is no longer running");
        }
        self.draw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::chip8::constants::CHIP8_PIXEL_ON;
    use cursive::view::Nameable;

    #[test]
    fn test_display_lights_nonzero_pins() {
        let mut pins = [0; CHIP8_DISPLAY_SIZE];
        pins[0] = 0xFFFF_FFFF;
        pins[CHIP8_DISPLAY_WIDTH + 3] = 0xFFFF_FFFF;

        let display = Display::new(&pins);

        assert!(display.is_lit(0, 0));
        assert!(display.is_lit(3, 1));
        assert!(!display.is_lit(1, 0));
        assert!(!display.is_lit(0, 1));
    }

    #[test]
    fn test_update_ui_only_when_drawn() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut chip8 = Chip8::new();

        chip8.update_ui(&sender);
        assert!(receiver.try_recv().is_err());

        chip8.draw = true;
        chip8.update_ui(&sender);
        assert!(receiver.try_recv().is_ok());
        assert!(!chip8.draw);
    }

    #[test]
    fn test_update_ui_keeps_debug_console_open() {
        let mut siv = Cursive::new();
        siv.add_layer(Display::default().with_name(DISPLAY_VIEW_NAME));
        siv.toggle_debug_console();
        assert_eq!(siv.screen().len(), 2);

        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut chip8 = Chip8::new();
        chip8.output_pins[0] = CHIP8_PIXEL_ON;
        chip8.draw = true;
        chip8.update_ui(&sender);

        let frame = receiver.try_recv().unwrap();
        frame(&mut siv);

        assert_eq!(siv.screen().len(), 2);
        assert!(siv
            .screen_mut()
            .find_layer_from_name("_cursive_debug_view")
            .is_some());
        let lit = siv.call_on_name(DISPLAY_VIEW_NAME, |view: &mut Display| view.is_lit(0, 0));
        assert_eq!(lit, Some(true));
    }
}
