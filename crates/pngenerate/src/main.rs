//! The main entry point of pngenerate.

use std::process::ExitCode;

use colored::Colorize;
use pngenerate::{cli, text, Resolution};

fn try_main() -> anyhow::Result<()> {
    match cli::resolve(std::env::args_os())? {
        Resolution::PrintVersion => print!("{}", text::version()),
        Resolution::PrintHelp => print!("{}", text::help()),
        Resolution::Generate(config) => pngenerate::run(&config)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        better_panic::debug_install();
    } else {
        better_panic::install();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err.to_string();
            eprintln!("{} {}", "ERROR:".red().bold(), message.trim_end());
            ExitCode::FAILURE
        }
    }
}
