#![warn(missing_docs)]
//! cli argument parser module
//!
//! Turns the command line into a [`GenerationConfig`]. Numeric arguments are
//! validated strictly: a value containing anything but digits is treated as
//! `0` instead of being partially parsed.

use std::{
    ffi::{OsStr, OsString},
    num::NonZeroU32,
    path::PathBuf,
};

use clap::{parser::ValueSource, ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::config::{ChannelPolicy, GenerationConfig, SizeLimit};

/// Structure containing all the flags and arguments that can be passed to
/// the binary from a shell. Use [`resolve`] instead of `Cli::parse()`, as
/// unknown options have to be removed first and the order of the channel
/// options matters.
///
/// Clap's own `-h`/`--help` and `--version` flags are disabled, `-h` sets
/// the height.
#[derive(Debug, Parser)]
#[command(
    name = "pngenerate",
    about = "Generates a random png image",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Set width in pixels (required)
    #[arg(short, long, value_name = "WIDTH", allow_hyphen_values = true)]
    pub width: Option<OsString>,

    /// Set height in pixels (required)
    #[arg(short = 'h', long, value_name = "HEIGHT", allow_hyphen_values = true)]
    pub height: Option<OsString>,

    /// Set color using hexadecimal notation (e.g. ffffff)
    #[arg(short, long, value_name = "RRGGBB", allow_hyphen_values = true)]
    pub color: Option<OsString>,

    /// Set red value
    #[arg(short, long, value_name = "0-255", allow_hyphen_values = true)]
    pub red: Option<OsString>,

    /// Set green value
    #[arg(short, long, value_name = "0-255", allow_hyphen_values = true)]
    pub green: Option<OsString>,

    /// Set blue value
    #[arg(short, long, value_name = "0-255", allow_hyphen_values = true)]
    pub blue: Option<OsString>,

    /// Set alpha value
    #[arg(short, long, value_name = "0-255", allow_hyphen_values = true)]
    pub alpha: Option<OsString>,

    /// Generate random alpha values for each pixel
    #[arg(short = 'A', long)]
    pub alpha_random: bool,

    /// Ignores 500MB size limit on output files
    #[arg(long)]
    pub ignore_size_limit: bool,

    /// Explain what is being done
    #[arg(short, long)]
    pub verbose: bool,

    /// Print version and license
    #[arg(long)]
    pub version: bool,

    /// Print this help message
    #[arg(long)]
    pub help: bool,

    /// Output file, only the first one is used
    #[arg(value_name = "OUTPUT FILE")]
    pub output: Vec<PathBuf>,
}

/// Which image dimension was invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// `-w`/`--width`
    Width,
    /// `-h`/`--height`
    Height,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Error type for [`resolve`]
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No positional argument was given
    #[error("No output file specified.")]
    MissingOutputPath,
    /// Width or height is missing, zero or not a decimal number
    #[error("Invalid {0} or none specified.")]
    InvalidDimension(Dimension),
    /// Clap could not make sense of the remaining arguments
    #[error("{0}")]
    Arguments(#[from] clap::Error),
}

/// Result type for [`resolve`]
pub type Result<T> = std::result::Result<T, CliError>;

/// What the command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Generate an image
    Generate(GenerationConfig),
    /// Print the name, version and license, then exit
    PrintVersion,
    /// Print the usage, then exit
    PrintHelp,
}

/// An option understood by [`Cli`]
struct KnownOption {
    long:        &'static str,
    short:       Option<char>,
    takes_value: bool,
}

const fn with_value(long: &'static str, short: char) -> KnownOption {
    KnownOption {
        long,
        short: Some(short),
        takes_value: true,
    }
}

const fn flag(long: &'static str, short: Option<char>) -> KnownOption {
    KnownOption {
        long,
        short,
        takes_value: false,
    }
}

const KNOWN_OPTIONS: [KnownOption; 12] = [
    with_value("width", 'w'),
    with_value("height", 'h'),
    with_value("color", 'c'),
    with_value("red", 'r'),
    with_value("green", 'g'),
    with_value("blue", 'b'),
    with_value("alpha", 'a'),
    flag("alpha-random", Some('A')),
    flag("ignore-size-limit", None),
    flag("verbose", Some('v')),
    flag("version", None),
    flag("help", None),
];

fn find_short(short: char) -> Option<&'static KnownOption> {
    KNOWN_OPTIONS.iter().find(|option| option.short == Some(short))
}

/// Exact match, or the only option `name` is a prefix of.
fn find_long(name: &str) -> Option<&'static KnownOption> {
    if name.is_empty() {
        return None;
    }
    if let Some(exact) = KNOWN_OPTIONS.iter().find(|option| option.long == name) {
        return Some(exact);
    }
    let mut candidates = KNOWN_OPTIONS
        .iter()
        .filter(|option| option.long.starts_with(name));
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Drop every option [`Cli`] does not know, and expand abbreviated long
/// options, so that clap only ever sees arguments it accepts.
///
/// The first element is the binary name and is kept as is. Everything after
/// `--` is positional.
fn retain_known_options<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            kept.push(arg);
            continue;
        };

        if text == "--" {
            kept.push(arg);
            kept.extend(args);
            break;
        }

        if let Some(long) = text.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            match (find_long(name), inline_value) {
                (Some(option), Some(value)) if option.takes_value => {
                    kept.push(format!("--{}={value}", option.long).into());
                }
                (Some(option), None) if option.takes_value => {
                    if let Some(value) = args.next() {
                        kept.push(format!("--{}", option.long).into());
                        kept.push(value);
                    } else {
                        log::debug!("ignoring --{} without a value", option.long);
                    }
                }
                (Some(option), None) => kept.push(format!("--{}", option.long).into()),
                _ => log::debug!("ignoring unrecognised option {text}"),
            }
            continue;
        }

        let Some(cluster) = text.strip_prefix('-').filter(|rest| !rest.is_empty()) else {
            kept.push(arg);
            continue;
        };

        let mut retained = String::from("-");
        let mut value = None;
        for (i, short) in cluster.char_indices() {
            match find_short(short) {
                Some(option) if option.takes_value => {
                    retained.push(short);
                    // an attached value goes to clap as its own argument, so
                    // `-w=5` keeps the `=` and fails validation
                    let attached = &cluster[i + short.len_utf8()..];
                    value = Some(if attached.is_empty() {
                        args.next()
                    } else {
                        Some(OsString::from(attached))
                    });
                    break;
                }
                Some(_) => retained.push(short),
                None => log::debug!("ignoring unrecognised option -{short}"),
            }
        }

        match value {
            Some(Some(value)) => {
                kept.push(retained.into());
                kept.push(value);
            }
            Some(None) => {
                log::debug!("ignoring {retained} without a value");
                retained.pop();
                if retained.len() > 1 {
                    kept.push(retained.into());
                }
            }
            None if retained.len() > 1 => kept.push(retained.into()),
            None => {}
        }
    }

    kept
}

/// Parse `digits` in `radix`, rejecting the whole string if any character is
/// not a digit of that radix, or if the value does not fit in a `u32`.
fn parse_strict(digits: &str, radix: u32) -> Option<u32> {
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Only the lowest byte is kept, e.g. `300` becomes `44`.
const fn low_byte(value: u32) -> u8 {
    value.to_le_bytes()[0]
}

fn parse_dimension(value: Option<&OsStr>, dimension: Dimension) -> Result<NonZeroU32> {
    value
        .and_then(OsStr::to_str)
        .and_then(|digits| parse_strict(digits, 10))
        .and_then(NonZeroU32::new)
        .ok_or(CliError::InvalidDimension(dimension))
}

/// A channel value given with `-r`, `-g`, `-b` or `-a`. Invalid input,
/// including input that is not UTF-8, yields `0`.
fn parse_channel(value: &OsStr) -> u8 {
    value
        .to_str()
        .and_then(|digits| parse_strict(digits, 10))
        .map_or(0, low_byte)
}

/// Split the first six characters of `hex` into `RR`, `GG` and `BB`.
///
/// A pair that is missing or contains a non hex digit yields `0` for its
/// channel. The channel still counts as set.
fn parse_color(hex: &str) -> [u8; 3] {
    let digits = hex.chars().take(6).collect::<Vec<_>>();
    let mut rgb = [0; 3];
    for (channel, pair) in rgb.iter_mut().zip(digits.chunks(2)) {
        let pair = pair.iter().collect::<String>();
        *channel = parse_strict(&pair, 16).map_or(0, low_byte);
    }
    rgb
}

/// Position of the last occurrence of `id` on the command line.
fn last_position(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches
        .indices_of(id)
        .and_then(Iterator::max)
        .or(Some(0))
}

/// Of all the settings of one channel, the one given last wins.
fn latest(candidates: impl IntoIterator<Item = Option<(usize, ChannelPolicy)>>) -> Option<ChannelPolicy> {
    candidates
        .into_iter()
        .flatten()
        .max_by_key(|&(position, _)| position)
        .map(|(_, policy)| policy)
}

/// Parse `args` into a [`Resolution`]. The first element of `args` is the
/// binary name, as with [`std::env::args_os`].
///
/// # Errors
///
/// Will return `Err` if:
/// 1. No output file is given
/// 2. Width or height is missing, zero, or not a decimal number
///
/// `--version` and `--help` never fail.
pub fn resolve<I, T>(args: I) -> Result<Resolution>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = retain_known_options(args.into_iter().map(Into::into));
    let matches = Cli::command().try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;

    if cli.version {
        return Ok(Resolution::PrintVersion);
    }
    if cli.help {
        return Ok(Resolution::PrintHelp);
    }

    let output_path = cli
        .output
        .first()
        .cloned()
        .ok_or(CliError::MissingOutputPath)?;
    if cli.output.len() > 1 {
        log::warn!("only the first output file is used: {}", output_path.display());
    }

    let width = parse_dimension(cli.width.as_deref(), Dimension::Width)?;
    let height = parse_dimension(cli.height.as_deref(), Dimension::Height)?;

    let color = cli
        .color
        .as_deref()
        .map(|hex| parse_color(&hex.to_string_lossy()));
    let color_position = last_position(&matches, "color");
    let from_color = |component: usize| {
        color_position
            .zip(color)
            .map(|(position, rgb)| (position, ChannelPolicy::Fixed(rgb[component])))
    };
    let from_value = |id: &str, value: Option<&OsString>| {
        last_position(&matches, id)
            .zip(value)
            .map(|(position, value)| (position, ChannelPolicy::Fixed(parse_channel(value))))
    };

    let mut config = GenerationConfig::new(width, height, output_path);
    config.red = latest([from_color(0), from_value("red", cli.red.as_ref())])
        .unwrap_or(ChannelPolicy::Random);
    config.green = latest([from_color(1), from_value("green", cli.green.as_ref())])
        .unwrap_or(ChannelPolicy::Random);
    config.blue = latest([from_color(2), from_value("blue", cli.blue.as_ref())])
        .unwrap_or(ChannelPolicy::Random);

    let alpha_random = cli
        .alpha_random
        .then(|| last_position(&matches, "alpha_random"))
        .flatten()
        .map(|position| (position, ChannelPolicy::Random));
    config.alpha = latest([from_value("alpha", cli.alpha.as_ref()), alpha_random])
        .unwrap_or(ChannelPolicy::OpaqueDefault);

    if cli.ignore_size_limit {
        config.size_limit = SizeLimit::Unlimited;
    }
    config.verbose = cli.verbose;

    log::debug!("resolved {config:?}");
    Ok(Resolution::Generate(config))
}
