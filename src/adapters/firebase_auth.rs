use crate::config::FirebaseConfig;
use crate::domain::ports::AuthService;
use crate::domain::session::AuthUser;
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Email/password sign-in against the Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    id_token: String,
}

impl FirebaseAuth {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &FirebaseConfig) -> Self {
        Self::new(config.auth_url.clone(), config.api_key.clone())
    }
}

#[async_trait]
impl AuthService for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let url = format!("{}/v1/accounts:signInWithPassword", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // e.g. INVALID_LOGIN_CREDENTIALS, USER_DISABLED
            let body: Value = response.json().await.unwrap_or_default();
            return Err(AdminError::Store {
                status: status.as_u16(),
                message: body["error"]["message"]
                    .as_str()
                    .unwrap_or("unknown auth error")
                    .to_string(),
            });
        }

        let body: SignInResponse = response.json().await?;
        Ok(AuthUser {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
        })
    }
}
