use crate::formatters::{capitalize_word, format_date, format_phone_number};
use anyhow::{Result, bail};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Name,
    Date,
    Phone,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(formatter, "name"),
            Self::Date => write!(formatter, "date"),
            Self::Phone => write!(formatter, "phone"),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub kind: FormatKind,
    pub value: String,
}

/// Formats `args.value` and prints it.
/// # Errors
/// Returns an error if the value cannot be formatted as the requested kind.
pub fn execute(args: &Args) -> Result<()> {
    println!("{}", render(args)?);
    Ok(())
}

fn render(args: &Args) -> Result<String> {
    let formatted = match args.kind {
        FormatKind::Name => capitalize_word(Some(&args.value)),
        FormatKind::Date => format_date(&args.value),
        FormatKind::Phone => format_phone_number(&args.value),
    };

    match formatted {
        Some(value) => Ok(value),
        None => bail!("cannot format {:?} as a {}", args.value, args.kind),
    }
}
