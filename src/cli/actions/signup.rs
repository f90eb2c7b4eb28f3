use crate::{
    backend::BackendClient,
    cli::globals::GlobalArgs,
    login::{HistoryNavigator, LoginController, LoginForm},
    session::SessionStore,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
    pub redirect_origin: String,
}

/// Execute the signup action.
/// # Errors
/// Returns an error if the form is invalid or the service rejects the signup.
pub async fn execute(args: Args) -> Result<()> {
    let client = BackendClient::new(args.globals.backend_config()?)?;
    let controller = LoginController::new(
        client.clone(),
        client,
        HistoryNavigator::new(),
        SessionStore::new(),
    );

    let form = LoginForm {
        email: args.email,
        password: args.password,
    };

    controller.sign_up(&form, &args.redirect_origin).await?;

    info!("signup submitted");
    println!("confirmation email sent to {}", form.email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_execute_signup() {
        if TcpListener::bind("127.0.0.1:0").is_err() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(query_param(
                "redirect_to",
                "https://portal.clinic.test/auth/callback",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let args = Args {
            globals: GlobalArgs::new(server.uri(), SecretString::from("anon")),
            email: "new@clinic.test".to_string(),
            password: SecretString::from("long-enough"),
            redirect_origin: "https://portal.clinic.test".to_string(),
        };

        assert!(execute(args).await.is_ok());
    }
}
