use clap::{Arg, Command};

/// Connection flags for actions that talk to the hosted auth and data service.
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .help("Base URL of the auth and data service, example: https://db.practice.tld")
                .env("PRACTICE_LOGIN_URL")
                .required(true),
        )
        .arg(
            Arg::new("anon-key")
                .long("anon-key")
                .help("Public anon key sent as the apikey header")
                .env("PRACTICE_LOGIN_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("PRACTICE_LOGIN_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

/// Email and password flags shared by `login` and `signup`.
pub fn with_credentials(command: Command) -> Command {
    command
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Provider email address")
                .env("PRACTICE_LOGIN_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Provider password")
                .env("PRACTICE_LOGIN_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}
