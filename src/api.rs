use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;

/// Fixed client identification sent with every request.
pub const USER_AGENT: &str = "todo-printer/1.0";

/// Per-request timeout. An unreachable remote fails the cycle rather than
/// blocking it forever.
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// The three remote calls one polling cycle is made of.
pub trait MessageApi {
    /// Obtain a session token. The token authorizes fetch and delete for
    /// the current cycle only; it is never reused across cycles.
    fn login(&self) -> Result<String, Error>;

    /// Fetch the ordered batch of pending messages.
    fn messages(&self, token: &str) -> Result<Vec<String>, Error>;

    /// Acknowledge the batch. Deletion is bulk: everything currently
    /// pending on the remote goes at once.
    fn delete_messages(&self, token: &str) -> Result<(), Error>;
}

/// JSON-over-HTTP implementation against the to-do API.
pub struct HttpApi {
    client: reqwest::blocking::Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()?;

        Ok(HttpApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    // The remote expects the scheme keyword in lowercase.
    fn auth_header(token: &str) -> String {
        format!("bearer {}", token)
    }
}

impl MessageApi for HttpApi {
    fn login(&self) -> Result<String, Error> {
        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            username: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            token: String,
        }

        let url = format!("{}/login", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()?
            .error_for_status()?;

        let token: TokenResponse = resp.json()?;
        if token.token.is_empty() {
            return Err(Error::InvalidResponse(
                "login returned an empty token".into(),
            ));
        }

        Ok(token.token)
    }

    fn messages(&self, token: &str) -> Result<Vec<String>, Error> {
        let url = format!("{}/messages", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, Self::auth_header(token))
            .send()?
            .error_for_status()?;

        let messages = resp.json()?;
        Ok(messages)
    }

    fn delete_messages(&self, token: &str) -> Result<(), Error> {
        let url = format!("{}/messages", self.base_url);
        let resp = self
            .client
            .delete(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, Self::auth_header(token))
            .send()?;

        // Status is logged, never inspected: only a transport failure
        // counts as an acknowledgment error.
        log::info!("delete returned {}", resp.status());
        Ok(())
    }
}
