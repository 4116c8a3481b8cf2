use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Email validation. Only the syntax is checked; deliverability is not.
pub fn validate_email(email: &str) -> Result<()> {
    let re = EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

    if email.len() > 255 {
        return Err(anyhow!("Email cannot be longer than 255 characters"));
    }

    if !re.is_match(email) {
        return Err(anyhow!("Invalid email format"));
    }

    Ok(())
}
