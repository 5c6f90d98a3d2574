//! Transactional email client for OTP delivery. When the provider is
//! not configured the send is logged and skipped so local development
//! does not need an API key.

use std::env;

pub async fn send_otp_email(to: &str, code: &str) -> Result<(), String> {
    let api_url = match env::var("EMAIL_API_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("EMAIL_API_URL not configured, skipping OTP mail to {}", to);
            return Ok(());
        }
    };
    let api_key = env::var("EMAIL_API_KEY").unwrap_or_default();
    let from = env::var("EMAIL_FROM").unwrap_or_else(|_| "no-reply@shopacc.vn".to_string());

    let payload = serde_json::json!({
        "from": from,
        "to": [to],
        "subject": "Mã xác thực ShopAcc",
        "html": format!(
            "<p>Mã xác thực của bạn là <b>{}</b>. Mã có hiệu lực trong 5 phút.</p>",
            code
        ),
    });

    let client = reqwest::Client::new();
    let res = client
        .post(&api_url)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("Email provider error: {}", res.status()));
    }
    Ok(())
}
