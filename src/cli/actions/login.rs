use crate::{
    backend::BackendClient,
    cli::globals::GlobalArgs,
    formatters::capitalize_word,
    login::{HistoryNavigator, LoginController, LoginForm, SubmitOutcome},
    session::{SessionInfo, SessionStore},
};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the form is invalid or the login fails for any reason.
pub async fn execute(args: Args) -> Result<()> {
    let client = BackendClient::new(args.globals.backend_config()?)?;
    let controller = LoginController::new(
        client.clone(),
        client,
        HistoryNavigator::new(),
        SessionStore::new(),
    )
    .with_landing_path(args.globals.landing_path.clone());

    let form = LoginForm {
        email: args.email,
        password: args.password,
    };

    match controller.submit(&form).await {
        SubmitOutcome::Navigated(path) => {
            if let Some(info) = controller.session().provider_info() {
                println!("{}", greeting(&info));
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("failed to encode session")?
                );
            }
            info!(%path, "login complete");
            println!("navigating to {path}");
            Ok(())
        }
        SubmitOutcome::NoSession => {
            println!("signed in, but no session was issued; confirm the account email first");
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => bail!("{errors}"),
        SubmitOutcome::Busy => bail!("a login is already in progress"),
        SubmitOutcome::InvalidLogin(err) => {
            debug!(error = %err, "login failed");
            bail!("{}", err.user_message())
        }
    }
}

fn greeting(info: &SessionInfo) -> String {
    let first_name = capitalize_word(Some(&info.provider_first_name)).unwrap_or_default();
    let last_name = capitalize_word(Some(&info.provider_last_name)).unwrap_or_default();
    format!("Welcome, Dr. {first_name} {last_name}")
}
