use std::io::{self, IsTerminal};
use std::process;

use clap::Parser;
use colored::Colorize;
use log::{debug, info};

use relay::option::{Args, Mode, RelayOption};
use relay::utils::logger;
use relay::{pipe, RelayError, RelayServer};

fn run(args: Args) -> Result<(), RelayError> {
    let opts = RelayOption::resolve(args)?;
    logger::init(opts.log_level, opts.verbose);
    if let Ok(jsonstr) = serde_json::to_string_pretty(&opts) {
        debug!("relay options:\n{}", jsonstr);
    }

    match opts.mode() {
        Mode::Server => {
            let report = RelayServer::bootstrap(&opts)?;
            info!("served {} sessions", report.sessions);
        }
        Mode::OneShot => {
            pipe::bootstrap(&opts)?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    colored::control::set_override(io::stderr().is_terminal());
    if let Err(e) = run(args) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}
