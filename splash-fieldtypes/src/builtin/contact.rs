use super::random_word;
use crate::kind::{FakeOptions, FieldKind, expect_str, is_blank};
use rand::{Rng, RngCore};
use serde_json::Value;
use splash_types::types;

pub struct Email;

impl FieldKind for Email {
    fn name(&self) -> &'static str {
        types::EMAIL
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "email")?;
        let valid = match text.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.split('.').count() >= 2
                    && domain.split('.').all(|part| !part.is_empty())
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(format!("`{text}` is not an email address"))
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let user = random_word(rng, 8).to_lowercase();
        let domain = random_word(rng, 6).to_lowercase();
        Value::String(format!("{user}@{domain}.com"))
    }
}

pub struct Phone;

impl FieldKind for Phone {
    fn name(&self) -> &'static str {
        types::PHONE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "phone")?;
        let allowed = |c: char| c.is_ascii_digit() || " +-().".contains(c);
        if text.chars().all(allowed) && text.chars().any(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(format!("`{text}` is not a phone number"))
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let digits: String = (0..8)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Value::String(format!("+33 6{digits}"))
    }
}

pub struct Url;

impl FieldKind for Url {
    fn name(&self) -> &'static str {
        types::URL
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "url")?;
        let rest = text
            .strip_prefix("https://")
            .or_else(|| text.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
            _ => Err(format!("`{text}` is not an http(s) url")),
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let host = random_word(rng, 10).to_lowercase();
        Value::String(format!("https://www.{host}.com"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_shapes() {
        assert!(Email.validate(&json!("a@b.io")).is_ok());
        assert!(Email.validate(&json!("a@b")).is_err());
        assert!(Email.validate(&json!("@b.io")).is_err());
        assert!(Email.validate(&json!("a@b@c.io")).is_err());
    }

    #[test]
    fn phone_and_url_shapes() {
        assert!(Phone.validate(&json!("+33 (0)6 12-34.56")).is_ok());
        assert!(Phone.validate(&json!("call me")).is_err());
        assert!(Url.validate(&json!("https://splashsync.com/x")).is_ok());
        assert!(Url.validate(&json!("ftp://x")).is_err());
    }
}
