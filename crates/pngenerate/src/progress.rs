//! Progress messages printed with `--verbose`.

/// Print `message` on stdout if `verbose` is set. The message is always
/// recorded at debug level.
pub fn report(verbose: bool, message: &str) {
    log::debug!("{message}");
    if verbose {
        println!("{message}");
    }
}
