use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use cursive::{CbSink, Cursive};
use cursive::view::Nameable;
use log::{error, info, warn, LevelFilter};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use chip_8_core::chip::{
    chip8::cursive_display::{Display, DISPLAY_VIEW_NAME},
    chip8::Chip8, Chip, ChipWithCursiveDisplay, LoadProgramError,
};

/// Runs a CHIP-8 program in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the program to load.
    rom: PathBuf,

    /// Milliseconds to sleep after each cycle.
    #[arg(long, default_value_t = 2)]
    cycle_delay: u64,

    /// Most verbose log level shown in the debug console (toggle with `~`).
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

/// Error type for errors that occur while starting up the emulator.
#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    InvalidProgram(#[from] LoadProgramError),
}

/// Represents an event to be processed by the event loop. It is generic
/// over the type representing the pressed key.
enum Event<T> {
    /// Occurs when the key passed in the enum value was pressed.
    Key(T),

    /// Indicates that all keys are released. Note that this is a
    /// hack because OS X currently requires extra permissions to
    /// listen to key down/up events. To get around this we simply
    /// read the stdin (indirectly via registering for cursive
    /// events) and assign one key to trigger releasing all keys.
    KeyRelease,

    /// Decreases the sleep time after each cycle.
    SpeedUp,

    /// Increases the sleep time after each cycle.
    SlowDown,

    /// Shut down.
    Quit,
}

/// Represents the channels available to the event loop. It is generic
/// over the type representing the pressed keys.
#[derive(Clone)]
struct EventLoopChannels<T> {
    /// The channel to send the UI refresh messages to.
    gfx_sender: CbSink,

    /// The channel on which the Events are received.
    key_receiver: Receiver<Event<T>>,

    /// A channel to report that the thread has completed
    /// shutdown.
    shutdown_sender: Sender<()>,
}

/// The event loop. Constantly loops over (1) process event if there
/// is any. (2) Invoke cycle on the chip. (3) Update the UI. (4) Sleep
/// for the cycle sleep time. (5) Start over. A faulting cycle halts the
/// chip; the loop keeps serving events until it is asked to quit.
fn event_loop<T, P>(mut chip: T, io_channels: EventLoopChannels<P>, mut cycle_sleep: u64)
where
    T: Chip<PinAddress = P> + ChipWithCursiveDisplay,
{
    let mut halted = false;
    loop {
        match io_channels.key_receiver.try_recv() {
            Ok(Event::Key(key)) => {
                chip.set_input_pin(key, true);
            }
            Ok(Event::KeyRelease) => {
                chip.reset_input_pins();
            }
            Ok(Event::Quit) => {
                if io_channels.shutdown_sender.send(()).is_err() {
                    error!("Failed to orderly shutdown.");
                }
                return;
            }
            Ok(Event::SpeedUp) => {
                cycle_sleep = faster(cycle_sleep);
            }
            Ok(Event::SlowDown) => {
                cycle_sleep = slower(cycle_sleep);
            }
            Err(_) => { /* do nothing */ }
        };

        if !halted {
            if let Err(fault) = chip.cycle() {
                error!("Halting the chip: {}", fault);
                halted = true;
            }
            chip.update_ui(&io_channels.gfx_sender);
        }

        std::thread::sleep(Duration::from_millis(cycle_sleep));
    }
}

/// Step by which the speed keys change the sleep time after each cycle.
const CYCLE_SLEEP_STEP: u64 = 5;

/// The sleep time never drops below one millisecond.
fn faster(cycle_sleep: u64) -> u64 {
    cycle_sleep.saturating_sub(CYCLE_SLEEP_STEP).max(1)
}

fn slower(cycle_sleep: u64) -> u64 {
    cycle_sleep.saturating_add(CYCLE_SLEEP_STEP)
}

/// Forwards an event from a UI callback to the event loop and reports
/// whether it was delivered.
fn forward<T>(sender: &Sender<Event<T>>, event: Event<T>) -> bool {
    let sent = sender.send(event).is_ok();
    if !sent {
        warn!("Event dropped, the event loop is no longer running");
    }
    sent
}

fn load_program(chip8: &mut Chip8, args: &Args) -> Result<usize, Error> {
    Ok(chip8.load_program_file(&args.rom)?)
}

/// Constructs the UI and spawns the event loop and the UI thread.
fn main() {
    let args = Args::parse();
    cursive::logger::init();
    log::set_max_level(args.log_level);

    let mut chip8 = Chip8::new();

    match load_program(&mut chip8, &args) {
        Ok(len) => info!("Loaded {} bytes from {}", len, args.rom.display()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let mut siv = cursive::default();

    let cb_sink = siv.cb_sink().clone();
    let (key_sender, key_receiver) = bounded::<Event<u8>>(10);
    let (shutdown_sender, shutdown_receiver) = bounded::<()>(1);
    let cycle_delay = args.cycle_delay;

    std::thread::spawn(move || {
        event_loop(
            chip8,
            EventLoopChannels {
                gfx_sender: cb_sink,
                key_receiver,
                shutdown_sender,
            },
            cycle_delay,
        );
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        if sender.send(Event::Quit).is_ok() && shutdown_receiver.recv().is_err() {
            error!("Orderly shutdown failed");
        }
        s.quit();
    });

    for &(i, j) in &[
        ('1', 0x1),
        ('2', 0x2),
        ('3', 0x3),
        ('4', 0xC),
        ('q', 0x4),
        ('w', 0x5),
        ('e', 0x6),
        ('r', 0xD),
        ('a', 0x7),
        ('s', 0x8),
        ('d', 0x9),
        ('f', 0xE),
        ('z', 0xA),
        ('x', 0x0),
        ('c', 0xB),
        ('v', 0xF),
    ] {
        let sender = key_sender.clone();
        siv.add_global_callback(i, move |_s| {
            forward(&sender, Event::Key(j as u8));
        });
    }

    let sender = key_sender.clone();
    siv.add_global_callback(' ', move |_s| {
        forward(&sender, Event::KeyRelease);
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        forward(&sender, Event::SpeedUp);
    });

    let sender = key_sender;
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        forward(&sender, Event::SlowDown);
    });

    siv.add_global_callback('~', Cursive::toggle_debug_console);

    siv.add_layer(Display::default().with_name(DISPLAY_VIEW_NAME));

    siv.run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_speed_up_from_short_delays() {
        assert_eq!(faster(2), 1);
        assert_eq!(faster(1), 1);
        assert_eq!(faster(7), 2);
        assert_eq!(faster(slower(2)), 2);
    }

    #[test]
    fn test_forward_reports_dropped_events() {
        let (sender, receiver) = unbounded::<Event<u8>>();
        assert!(forward(&sender, Event::Key(0xA)));
        assert!(matches!(receiver.try_recv(), Ok(Event::Key(0xA))));

        drop(receiver);
        assert!(!forward(&sender, Event::KeyRelease));
    }
}
