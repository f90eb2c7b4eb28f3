mod backend;
pub mod logging;

pub use logging::validator_log_level;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("practice-login")
        .about("Provider login for the practice portal")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(signup())
        .subcommand(format());

    logging::with_args(command)
}

fn login() -> Command {
    let command = Command::new("login")
        .about("Sign in as a provider and print the stored session")
        .arg(
            Arg::new("landing-path")
                .long("landing-path")
                .help("Path to navigate to after a successful login")
                .default_value("/dashboard")
                .env("PRACTICE_LOGIN_LANDING_PATH"),
        );

    backend::with_credentials(backend::with_args(command))
}

fn signup() -> Command {
    let command = Command::new("signup")
        .about("Register a provider account")
        .arg(
            Arg::new("redirect-origin")
                .long("redirect-origin")
                .help("Public origin of the portal, used for the /auth/callback link")
                .env("PRACTICE_LOGIN_REDIRECT_ORIGIN")
                .required(true),
        );

    backend::with_credentials(backend::with_args(command))
}

fn format() -> Command {
    let value = || Arg::new("value").help("Value to format").required(true);

    Command::new("format")
        .about("Format names, dates and phone numbers the way the portal renders them")
        .subcommand_required(true)
        .subcommand(
            Command::new("name")
                .about("Capitalize a name: mcDONALD -> Mcdonald")
                .arg(value()),
        )
        .subcommand(
            Command::new("date")
                .about("Render an ISO date as Mon D, YYYY (UTC)")
                .arg(value()),
        )
        .subcommand(
            Command::new("phone")
                .about("Render a North American phone number")
                .arg(value()),
        )
}
