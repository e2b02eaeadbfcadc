//! Price records and their arithmetic.
//!
//! A price carries both amounts (tax excluded `ht`, tax included `ttc`), the
//! VAT rate in percent, the derived tax amount and a currency. `base` tells
//! which amount was the reference when the price was encoded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Tolerance for amount and rate comparisons.
pub const PRICE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("invalid price: no amount given")]
    Invalid,
    #[error("invalid price: amounts and rate must be finite numbers")]
    NotFinite,
    #[error("invalid price: both tax excluded and tax included amounts given")]
    BothValues,
    #[error("invalid price: VAT rate is not a finite number")]
    NoVat,
    #[error("invalid price: no currency code")]
    NoCurrencyCode,
    #[error("malformed price record: {0}")]
    Malformed(String),
}

impl PriceError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            PriceError::Invalid | PriceError::NotFinite | PriceError::Malformed(_) => "ErrPriceInvalid",
            PriceError::BothValues => "ErrPriceBothValues",
            PriceError::NoVat => "ErrPriceNoVATValue",
            PriceError::NoCurrencyCode => "ErrPriceNoCurrCode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// `true` when the tax included amount was given.
    #[serde(serialize_with = "base_to_int", deserialize_with = "base_from_any")]
    pub base: bool,
    pub ht: f64,
    pub tax: f64,
    pub ttc: f64,
    pub vat: f64,
    pub code: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

fn base_to_int<S: Serializer>(base: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*base))
}

fn base_from_any<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    truthy(&value).ok_or_else(|| serde::de::Error::custom("price base must be a bool or 0/1"))
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.as_str() {
            "" | "0" => Some(false),
            _ => Some(true),
        },
        _ => None,
    }
}

/// Numeric view of a wire value. Numeric strings count as numbers.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

impl Price {
    /// Build a price from exactly one of the two amounts.
    pub fn encode(
        tax_excl: Option<f64>,
        vat: f64,
        tax_incl: Option<f64>,
        code: &str,
        symbol: &str,
        name: &str,
    ) -> Result<Self, PriceError> {
        let (base, amount) = match (tax_excl, tax_incl) {
            (None, None) => return Err(PriceError::Invalid),
            (Some(_), Some(_)) => return Err(PriceError::BothValues),
            (Some(ht), None) => (false, ht),
            (None, Some(ttc)) => (true, ttc),
        };
        if !vat.is_finite() {
            return Err(PriceError::NoVat);
        }
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if code.is_empty() {
            return Err(PriceError::NoCurrencyCode);
        }
        let ratio = vat / 100.0;
        let (ht, tax, ttc) = if base {
            let ht = amount / (1.0 + ratio);
            (ht, amount - ht, amount)
        } else {
            (amount, amount * ratio, amount * (1.0 + ratio))
        };
        if !(ht.is_finite() && tax.is_finite() && ttc.is_finite()) {
            return Err(PriceError::NotFinite);
        }
        Ok(Self {
            base,
            ht,
            tax,
            ttc,
            vat,
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
    }

    /// Same amounts, rate and currency, whichever amount each side was encoded from.
    ///
    /// The reference amount is taken from `self.base`. Prices holding a
    /// non finite amount or rate never compare equal.
    pub fn compare(&self, other: &Price) -> bool {
        self.compare_amounts(other)
    }

    pub fn compare_amounts(&self, other: &Price) -> bool {
        if !self.is_finite() || !other.is_finite() {
            return false;
        }
        let (mine, theirs) = if self.base {
            (self.ttc, other.ttc)
        } else {
            (self.ht, other.ht)
        };
        if (mine - theirs).abs() > PRICE_EPSILON {
            return false;
        }
        if (self.vat - other.vat).abs() > PRICE_EPSILON {
            return false;
        }
        if self.code.is_empty() || other.code.is_empty() {
            return true;
        }
        self.code == other.code
    }

    /// Every amount and the rate are finite.
    pub fn is_finite(&self) -> bool {
        [self.ht, self.tax, self.ttc, self.vat]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Decode a wire record, requiring every price key.
    pub fn from_value(value: &Value) -> Result<Self, PriceError> {
        let Value::Object(map) = value else {
            return Err(PriceError::Malformed("not an object".into()));
        };
        let present = |key: &str| map.get(key).filter(|v| !v.is_null());
        let base = present("base")
            .and_then(truthy)
            .ok_or_else(|| PriceError::Malformed("missing base".into()))?;
        let amount = |key: &str| {
            present(key)
                .and_then(numeric)
                .ok_or_else(|| PriceError::Malformed(format!("missing or non numeric `{key}`")))
        };
        let text = |key: &str| {
            present(key)
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .ok_or_else(|| PriceError::Malformed(format!("missing `{key}`")))
        };
        Ok(Self {
            base,
            ht: amount("ht")?,
            tax: amount("tax")?,
            ttc: amount("ttc")?,
            vat: amount("vat")?,
            code: text("code")?,
            symbol: text("symbol")?,
            name: text("name")?,
        })
    }

    pub fn is_valid(value: &Value) -> bool {
        Self::from_value(value).is_ok()
    }

    /// Numeric entry of a wire record, `None` when absent or non numeric.
    pub fn extract(value: &Value, key: &str) -> Option<f64> {
        value.get(key).and_then(numeric)
    }

    pub fn tax_excluded(&self) -> f64 {
        self.ht
    }

    pub fn tax_included(&self) -> f64 {
        self.ttc
    }

    pub fn tax_percent(&self) -> f64 {
        self.vat
    }

    pub fn tax_ratio(&self) -> f64 {
        self.vat / 100.0
    }

    pub fn tax_amount(&self) -> f64 {
        self.tax
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "base": u8::from(self.base),
            "ht": self.ht,
            "tax": self.tax,
            "ttc": self.ttc,
            "vat": self.vat,
            "code": self.code,
            "symbol": self.symbol,
            "name": self.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_from_tax_excluded() {
        let p = Price::encode(Some(10.0), 20.0, None, "EUR", "€", "Euro").expect("price");
        assert!(!p.base);
        assert!((p.ttc - 12.0).abs() < PRICE_EPSILON);
        assert!((p.tax - 2.0).abs() < PRICE_EPSILON);
    }

    #[test]
    fn encode_from_tax_included() {
        let p = Price::encode(None, 20.0, Some(12.0), "EUR", "", "").expect("price");
        assert!(p.base);
        assert!((p.ht - 10.0).abs() < PRICE_EPSILON);
        assert!((p.tax_amount() - 2.0).abs() < PRICE_EPSILON);
        assert!((p.tax_ratio() - 0.2).abs() < PRICE_EPSILON);
    }

    #[test]
    fn encode_rejects_bad_input() {
        assert_eq!(
            Price::encode(None, 20.0, None, "EUR", "", ""),
            Err(PriceError::Invalid)
        );
        assert_eq!(
            Price::encode(Some(1.0), 20.0, Some(1.2), "EUR", "", ""),
            Err(PriceError::BothValues)
        );
        assert_eq!(
            Price::encode(Some(1.0), f64::NAN, None, "EUR", "", ""),
            Err(PriceError::NoVat)
        );
        assert_eq!(
            Price::encode(Some(1.0), 20.0, None, "", "", ""),
            Err(PriceError::NoCurrencyCode)
        );
        assert_eq!(PriceError::NoVat.key(), "ErrPriceNoVATValue");
    }

    #[test]
    fn compare_ignores_which_amount_was_given() {
        let excl = Price::encode(Some(10.0), 20.0, None, "EUR", "", "").expect("price");
        let incl = Price::encode(None, 20.0, Some(12.0), "EUR", "", "").expect("price");
        assert!(excl.compare(&incl));
        assert!(incl.compare(&excl));
    }

    #[test]
    fn compare_checks_rate_and_code() {
        let a = Price::encode(Some(10.0), 20.0, None, "EUR", "", "").expect("price");
        let b = Price::encode(Some(10.0), 5.5, None, "EUR", "", "").expect("price");
        let c = Price::encode(Some(10.0), 20.0, None, "USD", "", "").expect("price");
        assert!(!a.compare(&b));
        assert!(!a.compare(&c));
    }

    #[test]
    fn encode_rejects_non_finite_amounts() {
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                Price::encode(Some(amount), 20.0, None, "EUR", "", ""),
                Err(PriceError::NotFinite)
            );
            assert_eq!(
                Price::encode(None, 20.0, Some(amount), "EUR", "", ""),
                Err(PriceError::NotFinite)
            );
        }
        assert_eq!(
            Price::encode(None, -100.0, Some(12.0), "EUR", "", ""),
            Err(PriceError::NotFinite)
        );
        assert_eq!(PriceError::NotFinite.key(), "ErrPriceInvalid");
    }

    #[test]
    fn non_finite_prices_never_compare_equal() {
        let ten = Price::encode(Some(10.0), 20.0, None, "EUR", "", "").expect("price");
        let nan = Price {
            ht: f64::NAN,
            tax: f64::NAN,
            ttc: f64::NAN,
            ..ten.clone()
        };
        assert!(!nan.is_finite());
        assert!(!nan.compare(&ten));
        assert!(!ten.compare(&nan));
        assert!(!nan.compare(&nan));
        assert!(!Price::is_valid(&nan.to_value()));
        assert!(!Price::is_valid(&json!({
            "base": 0, "ht": "NaN", "tax": 0, "ttc": 0, "vat": 20,
            "code": "EUR", "symbol": "", "name": ""
        })));
    }

    #[test]
    fn from_value_accepts_wire_record() {
        let v = json!({
            "base": 0, "ht": "10", "tax": 2.0, "ttc": 12.0, "vat": 20,
            "code": "EUR", "symbol": "€", "name": "Euro"
        });
        let p = Price::from_value(&v).expect("valid");
        assert_eq!(p.ht, 10.0);
        assert_eq!(Price::extract(&v, "vat"), Some(20.0));
        assert!(!Price::is_valid(&json!({"ht": 1.0})));
        assert!(!Price::is_valid(&json!("10")));
    }

    #[test]
    fn serialized_base_is_numeric() {
        let p = Price::encode(None, 20.0, Some(12.0), "EUR", "", "").expect("price");
        let v = serde_json::to_value(&p).expect("serialize");
        assert_eq!(v["base"], json!(1));
        let back: Price = serde_json::from_value(v).expect("deserialize");
        assert_eq!(back, p);
        assert_eq!(p.to_value()["base"], json!(1));
    }
}
