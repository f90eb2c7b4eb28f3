use crate::cli::{
    actions::{
        Action,
        format::{self, FormatKind},
        login, signup,
    },
    globals::GlobalArgs,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub_m)) => {
            let mut globals = globals(sub_m)?;
            if let Some(landing_path) = sub_m.get_one::<String>("landing-path") {
                globals.set_landing_path(landing_path.clone());
            }

            Ok(Action::Login(login::Args {
                globals,
                email: required(sub_m, "email")?,
                password: SecretString::from(required(sub_m, "password")?),
            }))
        }
        Some(("signup", sub_m)) => Ok(Action::SignUp(signup::Args {
            globals: globals(sub_m)?,
            email: required(sub_m, "email")?,
            password: SecretString::from(required(sub_m, "password")?),
            redirect_origin: required(sub_m, "redirect-origin")?,
        })),
        Some(("format", sub_m)) => {
            let (kind, value_m) = sub_m.subcommand().context("missing format kind")?;
            let kind = match kind {
                "name" => FormatKind::Name,
                "date" => FormatKind::Date,
                "phone" => FormatKind::Phone,
                other => bail!("unknown format kind: {other}"),
            };

            Ok(Action::Format(format::Args {
                kind,
                value: value_m
                    .get_one::<String>("value")
                    .cloned()
                    .context("missing value to format")?,
            }))
        }
        _ => Err(anyhow!("missing subcommand")),
    }
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let url = required(matches, "url")?;
    let anon_key = SecretString::from(required(matches, "anon-key")?);

    let mut globals = GlobalArgs::new(url, anon_key);
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        globals.set_timeout(Duration::from_secs(*timeout));
    }

    Ok(globals)
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}
