pub mod image_host;
pub mod mailer;
pub mod oauth;
