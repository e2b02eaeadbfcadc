use super::pick;
use crate::kind::{FakeOptions, FieldKind, expect_str, is_blank};
use rand::RngCore;
use serde_json::Value;
use splash_types::types;

const LANGS: &[&str] = &["en_US", "fr_FR", "es_ES", "de_DE", "it_IT"];
const COUNTRIES: &[&str] = &["FR", "US", "ES", "DE", "IT", "GB", "BE"];
const STATES: &[&str] = &["CA", "NY", "TX", "FL", "WA"];
const CURRENCIES: &[&str] = &["EUR", "USD", "GBP", "CHF"];

fn all_ascii(text: &str, upper: bool) -> bool {
    text.chars().all(|c| {
        if upper {
            c.is_ascii_uppercase()
        } else {
            c.is_ascii_lowercase()
        }
    })
}

/// `fr` or `fr_FR`.
fn is_lang_code(text: &str) -> bool {
    match text.split_once('_') {
        Some((lang, region)) => {
            lang.len() == 2 && all_ascii(lang, false) && region.len() == 2 && all_ascii(region, true)
        }
        None => text.len() == 2 && all_ascii(text, false),
    }
}

pub struct Lang;

impl FieldKind for Lang {
    fn name(&self) -> &'static str {
        types::LANG
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "language code")?;
        if is_lang_code(text) {
            Ok(())
        } else {
            Err(format!("`{text}` is not a language code"))
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(pick(rng, LANGS).to_string())
    }
}

pub struct Country;

impl FieldKind for Country {
    fn name(&self) -> &'static str {
        types::COUNTRY
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "country code")?;
        if text.len() == 2 && all_ascii(text, true) {
            Ok(())
        } else {
            Err(format!("`{text}` is not an ISO 3166 country code"))
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(pick(rng, COUNTRIES).to_string())
    }
}

pub struct State;

impl FieldKind for State {
    fn name(&self) -> &'static str {
        types::STATE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        expect_str(data, "state code").map(|_| ())
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(pick(rng, STATES).to_string())
    }
}

pub struct Currency;

impl FieldKind for Currency {
    fn name(&self) -> &'static str {
        types::CURRENCY
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "currency code")?;
        if text.len() == 3 && all_ascii(text, true) {
            Ok(())
        } else {
            Err(format!("`{text}` is not an ISO 4217 currency code"))
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(pick(rng, CURRENCIES).to_string())
    }
}
