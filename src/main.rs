//! NES emulator entry point.
//!
//! Loads a cartridge and runs it in a window, or headless for a fixed number of frames.
//! Usage: famicore [--scale N] [--log-level LEVEL] [--frames N] path/to/game.nes

mod logger;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use famicore::{
    Nes,
    controller::Buttons,
    ppu::{HEIGHT, WIDTH},
};
use log::LevelFilter;
use minifb::{Key, Scale, Window, WindowOptions};

/// NES runs at ~60.0988 Hz (NTSC). Target one frame per 16.67 ms for ~60 fps.
const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Host keys for controller 1.
const KEY_MAP: [(Key, Buttons); 8] = [
    (Key::Z, Buttons::A),
    (Key::X, Buttons::B),
    (Key::RightShift, Buttons::SELECT),
    (Key::Enter, Buttons::START),
    (Key::Up, Buttons::UP),
    (Key::Down, Buttons::DOWN),
    (Key::Left, Buttons::LEFT),
    (Key::Right, Buttons::RIGHT),
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Cycle-stepped NES emulator
#[derive(Parser, Debug)]
#[command(name = "famicore", version, about, long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Window scale factor (1, 2, 4 or 8)
    #[arg(short, long, default_value_t = 2, value_parser = parse_scale)]
    scale: u8,

    /// Log verbosity; `trace` prints every CPU instruction
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Run this many frames without a window, then exit
    #[arg(short, long)]
    frames: Option<u64>,
}

fn parse_scale(s: &str) -> Result<u8, String> {
    match s {
        "1" | "2" | "4" | "8" => s.parse().map_err(|e| format!("{e}")),
        _ => Err(format!("scale must be 1, 2, 4 or 8, got {s}")),
    }
}

fn window_scale(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        4 => Scale::X4,
        8 => Scale::X8,
        _ => Scale::X2,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.log_level.into());

    let mut nes = match Nes::load(&args.rom) {
        Ok(nes) => nes,
        Err(err) => {
            log::error!("{}: {err}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let result = match args.frames {
        Some(frames) => run_headless(&mut nes, frames),
        None => run_window(&mut nes, window_scale(args.scale)),
    };

    // Returning (rather than exiting) drops `nes`, which flushes battery RAM.
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(nes: &mut Nes, frames: u64) -> Result<(), Box<dyn Error>> {
    nes.reset()?;
    for _ in 0..frames {
        nes.run_frame()?;
    }
    log::info!(
        "ran {frames} frames in {} CPU cycles",
        nes.cpu().cycles
    );
    Ok(())
}

fn run_window(nes: &mut Nes, scale: Scale) -> Result<(), Box<dyn Error>> {
    let mut window = Window::new(
        "Famicore",
        WIDTH,
        HEIGHT,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    nes.reset()?;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let frame_start = Instant::now();

        let buttons = KEY_MAP
            .iter()
            .filter(|(key, _)| window.is_key_down(*key))
            .fold(Buttons::empty(), |held, (_, button)| held | *button);
        nes.set_buttons(0, buttons);

        nes.run_frame()?;
        window.update_with_buffer(nes.frame_buffer(), WIDTH, HEIGHT)?;

        // Pace to ~60 fps so we don't burn CPU (emulation is far faster than real NES)
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }
    Ok(())
}
