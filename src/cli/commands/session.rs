use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_SECURE_COOKIES: &str = "secure-cookies";

const DEFAULT_SESSION_TTL_SECONDS: &str = "604800";

#[derive(Debug)]
pub struct Options {
    pub session_ttl_seconds: i64,
    pub secure_cookies: bool,
}

impl Options {
    /// Read session settings from parsed matches.
    ///
    /// # Errors
    /// Returns an error if the TTL is not positive.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(604_800);
        if session_ttl_seconds <= 0 {
            anyhow::bail!("--{ARG_SESSION_TTL_SECONDS} must be greater than zero");
        }

        Ok(Self {
            session_ttl_seconds,
            secure_cookies: matches.get_flag(ARG_SECURE_COOKIES),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Lifetime of a login session in seconds")
                .default_value(DEFAULT_SESSION_TTL_SECONDS)
                .env("GRADPATH_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_SECURE_COOKIES)
                .long(ARG_SECURE_COOKIES)
                .help("Mark session cookies Secure (serve over HTTPS)")
                .env("GRADPATH_SECURE_COOKIES")
                .action(ArgAction::SetTrue),
        )
}
