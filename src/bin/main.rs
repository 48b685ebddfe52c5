//! Host harness: the boot menu and console running over a simulated
//! framebuffer, with stdin standing in for the firmware keyboard.
//!
//! ```bash
//! # Blocking line-per-key driver, frames dumped as PPM
//! bootcon --frames-dir frames
//!
//! # Polled key driver, doubled pixels
//! bootcon --poll --scale 2
//!
//! # Replay a key script
//! bootcon --script keys.txt
//! ```

use std::cell::RefCell;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use argbframe::{Frame, color};
use bootcon_core::{
    ActionError, Arg, BitOrder, ConsoleConfig, ConsoleSession, Font, MenuNavigator, Palette,
    PixelPainter, StatusLine,
    emit::CharSink,
    emit_report,
    input::{Polled, ShutdownPort},
    menu,
};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use log::info;

#[path = "main/clock.rs"]
mod clock;
#[path = "main/keys.rs"]
mod keys;
#[path = "main/ppm.rs"]
mod ppm;

use clock::SystemClock;
use keys::HarnessKeys;
use ppm::FrameDumper;

struct Args {
    width: usize,
    height: usize,
    scale: u32,
    poll: bool,
    script: Option<PathBuf>,
    frames_dir: Option<PathBuf>,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            scale: 1,
            poll: false,
            script: None,
            frames_dir: None,
            help: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            }
            "--width" => {
                i += 1;
                if i < argv.len() {
                    args.width = argv[i].parse().unwrap_or(args.width);
                }
            }
            "--height" => {
                i += 1;
                if i < argv.len() {
                    args.height = argv[i].parse().unwrap_or(args.height);
                }
            }
            "--scale" => {
                i += 1;
                if i < argv.len() {
                    args.scale = argv[i].parse().unwrap_or(args.scale);
                }
            }
            "--poll" => {
                args.poll = true;
            }
            "--script" => {
                i += 1;
                if i < argv.len() {
                    args.script = Some(PathBuf::from(&argv[i]));
                }
            }
            "--frames-dir" => {
                i += 1;
                if i < argv.len() {
                    args.frames_dir = Some(PathBuf::from(&argv[i]));
                }
            }
            _ => {}
        }
        i += 1;
    }

    args
}

fn print_help() {
    eprintln!(
        r#"bootcon - framebuffer console and boot menu on a host

USAGE:
    bootcon [OPTIONS]

OPTIONS:
    -h, --help              Show this help message
        --width <N>         Frame width in pixels (default: 800)
        --height <N>        Frame height in pixels (default: 600)
        --scale <N>         Pixel doubling factor (default: 1)
        --poll              Use the polled key driver instead of blocking reads
        --script <FILE>     Replay keys from a file, one line per key
        --frames-dir <DIR>  Dump each demo frame as PPM into this directory

KEYS (one stdin line each):
    w / k       move up
    s / j       move down
    empty line  confirm
    q           quit (power off)
"#
    );
}

/// Stderr is the harness stand-in for the firmware diagnostic console.
struct StderrSink;

impl CharSink for StderrSink {
    type Error = std::io::Error;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        use std::io::Write;
        let mut err = std::io::stderr().lock();
        err.write_all(text.as_bytes())?;
        err.flush()
    }
}

struct HostPower;

impl ShutdownPort for HostPower {
    fn power_off(&mut self) -> ! {
        info!("power off requested");
        std::process::exit(0)
    }
}

/// 128-glyph table from `font8x8`, whose rows keep the leftmost pixel in
/// bit 0 and so need a per-byte reversal for left-to-right order.
fn basic_font_table() -> Vec<u8> {
    let mut table = Vec::with_capacity(128 * 8);
    for code in 0u8..128 {
        let rows = BASIC_FONTS.get(code as char).unwrap_or([0; 8]);
        table.extend(rows.iter().map(|row| row.reverse_bits()));
    }
    table
}

fn dump_frame(dumper: &RefCell<Option<FrameDumper>>, frame: &Frame<'_>) {
    if let Some(dumper) = dumper.borrow_mut().as_mut() {
        match dumper.dump(frame) {
            Ok(path) => info!("frame written to {}", path.display()),
            Err(err) => log::warn!("frame dump failed: {err}"),
        }
    }
}

fn console_failed<E>(_: E) -> ActionError {
    ActionError {
        status: 0x9,
        message: "console write failed",
    }
}

fn run_harness(args: &Args) -> Result<(), String> {
    let table = basic_font_table();
    let font = Font::new("font8x8", 8, 8, BitOrder::LeftToRight, 128, &table)
        .map_err(|err| format!("font setup failed: {err:?}"))?;

    let mut px = vec![0u32; args.width * args.height];
    let mut frame = Frame::new(&mut px, args.width, args.height, args.width)
        .map_err(|err| format!("bad frame geometry: {err:?}"))?;
    let config = ConsoleConfig {
        scale: args.scale,
        ..ConsoleConfig::default()
    };
    let session = ConsoleSession::new(&mut frame, &font, config)
        .map_err(|err| format!("console setup failed: {err:?}"))?;
    let mut painter = PixelPainter::new(session, Palette::default());

    let dumper = RefCell::new(match &args.frames_dir {
        Some(dir) => Some(
            FrameDumper::new(dir.clone())
                .map_err(|err| format!("cannot create {}: {err}", dir.display()))?,
        ),
        None => None,
    });

    // Enough lines to push the first ones off the top.
    let scroll_lines = args.height / args.scale as usize / 8 + 8;

    let mut demo_text = |painter: &mut PixelPainter<'_, '_>| -> Result<(), ActionError> {
        let session = painter.session_mut();
        session.set_colors(color::LIGHT_GRAY, color::DARK_GRAY);
        session.clear();
        emit_report(
            session,
            &mut StderrSink,
            "bootcon %s, frame %u by %u\r\n",
            &[
                Arg::Str("formatted output demo"),
                Arg::Uint(args.width as u32),
                Arg::Uint(args.height as u32),
            ],
        )
        .map_err(console_failed)?;
        for i in 0..scroll_lines as i32 {
            emit_report(
                session,
                &mut StderrSink,
                "line %d of the scroll exercise, mask %x\r\n",
                &[Arg::Int(i), Arg::Hex((i as usize) << 4)],
            )
            .map_err(console_failed)?;
        }
        dump_frame(&dumper, session.frame());
        Ok(())
    };

    let mut demo_clock = |painter: &mut PixelPainter<'_, '_>| -> Result<(), ActionError> {
        let session = painter.session_mut();
        session.set_colors(color::LIGHT_GRAY, color::DARK_GRAY);
        session.clear();
        let mut clock = SystemClock;
        let mut status = StatusLine::new();
        let mut redraws = 0;
        while redraws < 3 {
            let drew = status.refresh(session, &mut clock).map_err(|_| ActionError {
                status: 0x1A,
                message: "clock unavailable",
            })?;
            if drew {
                redraws += 1;
            }
            thread::sleep(Duration::from_millis(50));
        }
        dump_frame(&dumper, session.frame());
        Ok(())
    };

    let mut demo_fail = |_: &mut PixelPainter<'_, '_>| -> Result<(), ActionError> {
        Err(ActionError::display_device_error())
    };

    let labels = [
        "Formatted output demo",
        "Clock demo",
        "Report a device error",
    ];
    let mut nav = MenuNavigator::new(&labels);
    let mut actions: [menu::Action<'_, PixelPainter<'_, '_>>; 3] =
        [&mut demo_text, &mut demo_clock, &mut demo_fail];

    let mut keys = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            let events: Vec<_> = text.lines().map(keys::map_line).collect();
            HarnessKeys::Scripted(events.into_iter())
        }
        None if args.poll => HarnessKeys::Polled(Polled::new(keys::spawn_stdin_reader())),
        None => HarnessKeys::Blocking(keys::BlockingStdinKeys),
    };

    let mut diagnostics = StderrSink;
    let mut power = HostPower;
    menu::run(
        &mut nav,
        &mut actions,
        &mut painter,
        &mut keys,
        &mut diagnostics,
        &mut power,
    )
    .map_err(|err| format!("menu loop failed: {err:?}"))
}

fn main() -> std::process::ExitCode {
    let args = parse_args();
    if args.help {
        print_help();
        return std::process::ExitCode::SUCCESS;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run_harness(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            std::process::ExitCode::FAILURE
        }
    }
}
