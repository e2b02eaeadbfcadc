use super::random_word;
use crate::kind::{FakeOptions, FieldKind, expect_str, option_f64, option_i64, option_u64};
use rand::{Rng, RngCore};
use serde_json::{Value, json};
use splash_types::types;

/// Tolerance used when comparing doubles.
const DOUBLE_EPSILON: f64 = 1e-6;

/// Longest generated varchar.
pub const FAKE_MAX_LENGTH: u64 = 4096;
/// Most words in a generated text.
pub const FAKE_MAX_WORDS: u64 = 1024;
/// Generated doubles stay within `-FAKE_DOUBLE_BOUND..=FAKE_DOUBLE_BOUND`.
pub const FAKE_DOUBLE_BOUND: f64 = 1e12;

pub struct Varchar;

impl FieldKind for Varchar {
    fn name(&self) -> &'static str {
        types::VARCHAR
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        expect_str(data, "varchar").map(|_| ())
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let min = option_u64(options, "minLength", 6).clamp(1, FAKE_MAX_LENGTH);
        let max = option_u64(options, "maxLength", 12).clamp(min, FAKE_MAX_LENGTH);
        let len = rng.gen_range(min..=max) as usize;
        Value::String(random_word(rng, len))
    }
}

pub struct Text;

impl FieldKind for Text {
    fn name(&self) -> &'static str {
        types::TEXT
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        expect_str(data, "text").map(|_| ())
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let words = option_u64(options, "words", 8).clamp(1, FAKE_MAX_WORDS);
        let text: Vec<String> = (0..words)
            .map(|_| {
                let len = rng.gen_range(3..=9);
                random_word(rng, len)
            })
            .collect();
        Value::String(text.join(" "))
    }
}

fn as_integer(data: &Value) -> Option<i64> {
    match data {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_double(data: &Value) -> Option<f64> {
    match data {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub struct Int;

impl FieldKind for Int {
    fn name(&self) -> &'static str {
        types::INT
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        as_integer(data)
            .map(|_| ())
            .ok_or_else(|| format!("{data} is not an integer"))
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let min = option_i64(options, "min", 1);
        let max = option_i64(options, "max", 1000).max(min);
        json!(rng.gen_range(min..=max))
    }

    fn compare(&self, source: &Value, target: &Value) -> bool {
        as_integer(source) == as_integer(target)
    }
}

pub struct Double;

impl FieldKind for Double {
    fn name(&self) -> &'static str {
        types::DOUBLE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        as_double(data)
            .filter(|f| f.is_finite())
            .map(|_| ())
            .ok_or_else(|| format!("{data} is not a number"))
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let min =
            option_f64(options, "min", 1.0).clamp(-FAKE_DOUBLE_BOUND, FAKE_DOUBLE_BOUND - 1.0);
        let max = option_f64(options, "max", 1000.0)
            .max(min + 1.0)
            .min(FAKE_DOUBLE_BOUND);
        let value: f64 = rng.gen_range(min..max);
        json!((value * 100.0).round() / 100.0)
    }

    fn compare(&self, source: &Value, target: &Value) -> bool {
        match (as_double(source), as_double(target)) {
            (Some(a), Some(b)) => (a - b).abs() < DOUBLE_EPSILON,
            _ => source == target,
        }
    }
}

fn as_bool(data: &Value) -> Option<bool> {
    match data {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "" | "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

pub struct Bool;

impl FieldKind for Bool {
    fn name(&self) -> &'static str {
        types::BOOL
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        as_bool(data)
            .map(|_| ())
            .ok_or_else(|| format!("{data} is not a boolean"))
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::Bool(rng.gen_bool(0.5))
    }

    fn compare(&self, source: &Value, target: &Value) -> bool {
        as_bool(source) == as_bool(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn varchar_fake_honours_length_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = FakeOptions::from([
            ("minLength".to_string(), json!(4)),
            ("maxLength".to_string(), json!(4)),
        ]);
        let value = Varchar.fake(&options, &mut rng);
        assert_eq!(value.as_str().map(str::len), Some(4));
    }

    #[test]
    fn int_accepts_numeric_strings() {
        assert!(Int.validate(&json!("42")).is_ok());
        assert!(Int.validate(&json!(4.5)).is_err());
        assert!(Int.compare(&json!("42"), &json!(42)));
    }

    #[test]
    fn double_compares_with_tolerance() {
        assert!(Double.compare(&json!(0.1 + 0.2), &json!(0.3)));
        assert!(!Double.compare(&json!(0.1), &json!(0.2)));
    }

    #[test]
    fn bool_accepts_wire_forms() {
        for v in [json!(true), json!(0), json!("1"), json!("false")] {
            assert!(Bool.validate(&v).is_ok(), "{v}");
        }
        assert!(Bool.validate(&json!("yes")).is_err());
        assert!(Bool.compare(&json!(1), &json!(true)));
    }
}
