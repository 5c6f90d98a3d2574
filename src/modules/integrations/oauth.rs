//! OAuth provider client. The provider is an opaque collaborator: we
//! exchange the client-supplied access token for a profile through its
//! userinfo endpoint and never persist the token.

use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
pub struct OAuthProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

fn userinfo_url() -> String {
    env::var("OAUTH_USERINFO_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/userinfo".to_string())
}

pub async fn fetch_profile(access_token: &str) -> Result<OAuthProfile, String> {
    let client = reqwest::Client::new();
    let res = client
        .get(userinfo_url())
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("OAuth provider error: {}", res.status()));
    }

    let profile: OAuthProfile = res.json().await.map_err(|e| e.to_string())?;
    if profile.email.is_empty() {
        return Err("OAuth profile has no email".to_string());
    }
    Ok(profile)
}
