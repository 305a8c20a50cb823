use clap::{Arg, Command};

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .short('b')
                .long("backend-url")
                .help("Backend base URL, example: https://api.tld or https://api.tld/prefix")
                .env("PINGATE_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("PINGATE_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
}
