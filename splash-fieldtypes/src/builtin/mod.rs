//! Built-in field types.

mod composite;
mod contact;
mod locale;
mod scalar;
mod temporal;

use crate::kind::FieldKind;
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};

pub use composite::{File, Image, Inline, MultiLang, ObjectId, PriceKind};
pub use contact::{Email, Phone, Url};
pub use locale::{Country, Currency, Lang, State};
pub use scalar::{
    Bool, Double, FAKE_DOUBLE_BOUND, FAKE_MAX_LENGTH, FAKE_MAX_WORDS, Int, Text, Varchar,
};
pub use temporal::{DATE_FORMAT, DATETIME_FORMAT, Date, DateTime};

/// Every built-in type, in registration order.
pub fn builtin_kinds() -> Vec<Box<dyn FieldKind>> {
    vec![
        Box::new(Varchar),
        Box::new(Text),
        Box::new(Int),
        Box::new(Double),
        Box::new(Bool),
        Box::new(Date),
        Box::new(DateTime),
        Box::new(Email),
        Box::new(Phone),
        Box::new(Url),
        Box::new(Lang),
        Box::new(Country),
        Box::new(State),
        Box::new(Currency),
        Box::new(PriceKind),
        Box::new(Image),
        Box::new(File),
        Box::new(ObjectId),
        Box::new(Inline),
        Box::new(MultiLang::varchar()),
        Box::new(MultiLang::text()),
    ]
}

pub(crate) fn random_word(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

pub(crate) fn pick<'a>(rng: &mut dyn RngCore, items: &[&'a str]) -> &'a str {
    if items.is_empty() {
        return "";
    }
    items[rng.gen_range(0..items.len())]
}
