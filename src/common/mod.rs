//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

pub use io::{open_read_maybe_gz, open_write_maybe_gz};

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Expand a leading `~` in a user-provided path.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// Map the clap verbosity onto a `tracing` level.
pub fn tracing_level(args: &Args) -> tracing::Level {
    match args.verbose.log_level() {
        Some(level) => match level {
            log::Level::Error => tracing::Level::ERROR,
            log::Level::Warn => tracing::Level::WARN,
            log::Level::Info => tracing::Level::INFO,
            log::Level::Debug => tracing::Level::DEBUG,
            log::Level::Trace => tracing::Level::TRACE,
        },
        None => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod test {
    use clap_verbosity_flag::Verbosity;

    #[rstest::rstest]
    #[case(0, 0, tracing::Level::INFO)]
    #[case(1, 0, tracing::Level::DEBUG)]
    #[case(2, 0, tracing::Level::TRACE)]
    #[case(0, 1, tracing::Level::WARN)]
    fn tracing_level(#[case] verbose: u8, #[case] quiet: u8, #[case] expected: tracing::Level) {
        let args = super::Args {
            verbose: Verbosity::new(verbose, quiet),
        };

        assert_eq!(super::tracing_level(&args), expected);
    }

    #[test]
    fn expand_path_keeps_plain_paths() {
        assert_eq!(super::expand_path("tests/report/case.tsv"), "tests/report/case.tsv");
    }
}
