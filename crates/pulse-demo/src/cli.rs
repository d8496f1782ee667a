#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean. Supports environment variable overrides via the `PULSE_DEMO_*`
//! prefix.

use std::env;
use std::path::PathBuf;
use std::process;

use pulse_dashboard::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Pulse Demo - dashboard stores wired to logging subscribers

USAGE:
    pulse-demo [OPTIONS]

OPTIONS:
    --data-dir=PATH      Persist the theme under PATH (file per key).
                         Omit to run without persistence.
    --system-theme=NAME  Host theme preference: 'light' or 'dark'
    --toggle-theme       Toggle the theme once after startup
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT:
    PULSE_DEMO_DATA_DIR      Same as --data-dir
    PULSE_DEMO_SYSTEM_THEME  Same as --system-theme
";

#[derive(Debug, Default)]
pub struct DemoArgs {
    pub data_dir: Option<PathBuf>,
    pub system_theme: Option<Theme>,
    pub toggle_theme: bool,
}

pub fn parse() -> DemoArgs {
    let mut args = DemoArgs {
        data_dir: env::var_os("PULSE_DEMO_DATA_DIR").map(PathBuf::from),
        system_theme: env::var("PULSE_DEMO_SYSTEM_THEME")
            .ok()
            .and_then(|raw| raw.parse().ok()),
        toggle_theme: false,
    };

    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--data-dir=") {
            args.data_dir = Some(PathBuf::from(path));
        } else if let Some(name) = arg.strip_prefix("--system-theme=") {
            match name.parse::<Theme>() {
                Ok(theme) => args.system_theme = Some(theme),
                Err(error) => fail(&error.to_string()),
            }
        } else if arg == "--toggle-theme" {
            args.toggle_theme = true;
        } else if arg == "--help" || arg == "-h" {
            print!("{HELP_TEXT}");
            process::exit(0);
        } else if arg == "--version" || arg == "-V" {
            println!("pulse-demo {VERSION}");
            process::exit(0);
        } else {
            fail(&format!("unrecognized argument: {arg}"));
        }
    }

    args
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    eprintln!("run with --help for usage");
    process::exit(2);
}
