// This module exchanges client credentials for a bearer token.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    configuration::Credentials,
    error::{ExtractError, Result},
};

/// A bearer token, held in memory for the duration of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(<{} chars>)", self.0.len())
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: Option<String>,
}

/// Posts the credentials to `auth_url` and returns the token from the answer.
///
/// A single request is made. Transport errors, non-success statuses, unreadable bodies and
/// empty tokens all fail with [`ExtractError::Auth`].
pub async fn authenticate(
    http: &Client,
    auth_url: &str,
    credentials: &Credentials,
) -> Result<Token> {
    match request_token(http, auth_url, credentials).await {
        Ok(token) => {
            info!("Access token obtained successfully");
            Ok(token)
        }
        Err(message) => {
            error!("Authentication failed: {}", message);
            Err(ExtractError::Auth(message))
        }
    }
}

async fn request_token(
    http: &Client,
    auth_url: &str,
    credentials: &Credentials,
) -> std::result::Result<Token, String> {
    let response = http
        .post(auth_url)
        .json(&AuthRequest {
            username: &credentials.client_id,
            password: &credentials.client_secret,
        })
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("{}: {}", status, body));
    }

    let parsed: AuthResponse = serde_json::from_str(&body)
        .map_err(|e| format!("unreadable token response: {}", e))?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(Token(token)),
        _ => Err("the response did not contain an access token".to_string()),
    }
}
