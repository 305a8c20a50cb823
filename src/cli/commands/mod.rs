pub mod backend;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_IDENTIFIER: &str = "identifier";
pub const ARG_PIN: &str = "pin";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("pingate")
        .about("PIN authentication gate")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(concat!(
            env!("CARGO_PKG_VERSION"),
            " - ",
            env!("PINGATE_GIT_SHA")
        ))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_IDENTIFIER)
                .help("Identifier to authenticate, usually the last segment of the invitation link")
                .env("PINGATE_IDENTIFIER"),
        )
        .arg(
            Arg::new(ARG_PIN)
                .long("pin")
                .help("Submit this 4-digit PIN instead of reading keys from stdin")
                .env("PINGATE_PIN")
                .hide_env_values(true),
        );

    let command = backend::with_args(command);
    logging::with_args(command)
}
