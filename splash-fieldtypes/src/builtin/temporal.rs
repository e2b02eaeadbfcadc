use crate::kind::{FakeOptions, FieldKind, expect_str, is_blank};
use chrono::{Duration, Local, Months, NaiveDate, NaiveDateTime};
use rand::{Rng, RngCore};
use serde_json::Value;
use splash_types::types;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Now, moved back by 1 to 10 months, 1 to 60 minutes and 1 to 60 seconds.
fn random_past(rng: &mut dyn RngCore) -> NaiveDateTime {
    let now = Local::now().naive_local();
    let months = Months::new(rng.gen_range(1..=10));
    let offset = Duration::minutes(rng.gen_range(1..=60)) + Duration::seconds(rng.gen_range(1..=60));
    now.checked_sub_months(months).unwrap_or(now) - offset
}

pub struct Date;

impl FieldKind for Date {
    fn name(&self) -> &'static str {
        types::DATE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "date")?;
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| format!("`{text}` is not a date with format ({DATE_FORMAT})"))
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(random_past(rng).format(DATE_FORMAT).to_string())
    }
}

pub struct DateTime;

impl FieldKind for DateTime {
    fn name(&self) -> &'static str {
        types::DATETIME
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "datetime")?;
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(|_| ())
            .map_err(|_| format!("`{text}` is not a datetime with format ({DATETIME_FORMAT})"))
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::String(random_past(rng).format(DATETIME_FORMAT).to_string())
    }
}
