//! Collaborators the controller talks to but does not own: page navigation
//! and transient notifications.

use shared::domain::SignupToken;
use url::form_urlencoded;

pub trait Navigator {
    fn push(&mut self, path: &str, token: Option<&SignupToken>);
}

pub trait Notifier {
    fn error(&mut self, message: &str);
    fn success(&mut self, message: &str);
}

/// `path`, plus `?token=` when a session token is handed over.
pub fn navigation_target(path: &str, token: Option<&SignupToken>) -> String {
    match token {
        Some(token) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("token", token.as_str())
                .finish();
            format!("{path}?{query}")
        }
        None => path.to_string(),
    }
}

pub fn phone_signup_path(locale: &str) -> String {
    format!("/{locale}/signup/phone")
}

pub const HOME_PATH: &str = "/";
