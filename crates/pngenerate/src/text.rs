//! Texts printed by `--version` and `--help`.

use clap::{Arg, CommandFactory};

use crate::cli::Cli;

/// Program name
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Program version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LICENSE: &str = "\
Copyright (c) 2021 Cyrus Lee

Permission is hereby granted, free of charge, to any person obtaining a copy of this
software and associated documentation files (the “Software”), to deal in the Software without
restriction, including without limitation the rights to use, copy, modify, merge, publish,
distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
";

/// Text printed by `--version`
pub fn version() -> String {
    format!("{NAME} {VERSION}\n{LICENSE}")
}

/// Text printed by `--help`, listing the options documented on [`Cli`].
pub fn help() -> String {
    let command = Cli::command();
    let about = command
        .get_about()
        .map(ToString::to_string)
        .unwrap_or_default();
    let options = command
        .get_arguments()
        .filter_map(option_line)
        .collect::<String>();
    format!("Usage: {NAME} [-w <width>] [-h <height>] [OPTION]... [OUTPUT FILE]\n{about}.\n\n{options}")
}

/// `  -w, --width <WIDTH>   Set width in pixels`, `None` for positionals.
fn option_line(arg: &Arg) -> Option<String> {
    let long = arg.get_long()?;
    let short = arg
        .get_short()
        .map_or_else(|| String::from("    "), |short| format!("-{short}, "));
    let value = arg
        .get_value_names()
        .and_then(<[_]>::first)
        .map(|name| format!(" <{name}>"))
        .unwrap_or_default();
    let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
    Some(format!("  {:<27}{help}\n", format!("{short}--{long}{value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_starts_with_name_and_version() {
        let text = version();
        assert!(text.starts_with("pngenerate 1.0.1\n"));
        assert!(text.contains("Permission is hereby granted"));
    }

    #[test]
    fn help_lists_every_option() {
        let text = help();
        assert!(text.starts_with("Usage: pngenerate "));
        for option in [
            "--width",
            "--height",
            "--color",
            "--red",
            "--green",
            "--blue",
            "--alpha",
            "--alpha-random",
            "--ignore-size-limit",
            "--verbose",
            "--version",
            "--help",
        ] {
            assert!(text.contains(option), "help is missing {option}");
        }
    }

    #[test]
    fn help_uses_the_documented_options() {
        let text = help();
        assert!(text.contains("\nGenerates a random png image.\n"));
        assert!(text.contains("  -w, --width <WIDTH>        Set width in pixels (required)\n"));
        assert!(text.contains("      --ignore-size-limit    Ignores 500MB size limit on output files\n"));
        assert!(!text.contains("OUTPUT FILE>"));
    }
}
