use super::{pick, random_word};
use crate::kind::{
    FakeOptions, FieldKind, OPTION_OBJECT_TYPE, expect_str, is_blank, option_f64, option_str,
};
use rand::{Rng, RngCore};
use serde_json::{Map, Value, json};
use splash_types::ids::{encode_object_reference, is_object_reference};
use splash_types::price::Price;
use splash_types::types;

const VAT_RATES: &[f64] = &[0.0, 5.5, 10.0, 20.0];

pub struct PriceKind;

impl FieldKind for PriceKind {
    fn name(&self) -> &'static str {
        types::PRICE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        Price::from_value(data).map(|_| ()).map_err(|e| e.to_string())
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let ht = (rng.gen_range(1.0..1000.0_f64) * 100.0).round() / 100.0;
        let vat = match options.get("vat").and_then(Value::as_f64) {
            Some(vat) => vat,
            None => VAT_RATES[rng.gen_range(0..VAT_RATES.len())],
        };
        let code = option_str(options, "currency", "EUR");
        match Price::encode(Some(ht), vat, None, code, "", "") {
            Ok(price) => price.to_value(),
            Err(_) => Value::Null,
        }
    }

    fn compare(&self, source: &Value, target: &Value) -> bool {
        match (Price::from_value(source), Price::from_value(target)) {
            (Ok(a), Ok(b)) => a.compare(&b),
            _ => source == target,
        }
    }
}

fn require_keys(data: &Value, what: &str, keys: &[&str]) -> Result<(), String> {
    let Value::Object(map) = data else {
        return Err(format!("{what} must be an object"));
    };
    match keys.iter().find(|k| !map.contains_key(**k)) {
        Some(missing) => Err(format!("{what} has no `{missing}` entry")),
        None => Ok(()),
    }
}

fn fake_file_record(rng: &mut dyn RngCore, extension: &str) -> Map<String, Value> {
    let stem = random_word(rng, 10).to_lowercase();
    let filename = format!("{stem}.{extension}");
    let mut map = Map::new();
    map.insert("name".into(), json!(stem));
    map.insert("filename".into(), json!(filename));
    map.insert("path".into(), json!(format!("files/{filename}")));
    map.insert("md5".into(), json!(random_word(rng, 32).to_lowercase()));
    map.insert("size".into(), json!(rng.gen_range(1_000..100_000)));
    map
}

const FILE_KEYS: &[&str] = &["name", "filename", "path", "md5", "size"];

pub struct File;

impl FieldKind for File {
    fn name(&self) -> &'static str {
        types::FILE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        require_keys(data, "file", FILE_KEYS)
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        Value::Object(fake_file_record(rng, "pdf"))
    }

    /// Files are the same when their contents are.
    fn compare(&self, source: &Value, target: &Value) -> bool {
        source.get("md5") == target.get("md5")
    }
}

pub struct Image;

impl FieldKind for Image {
    fn name(&self) -> &'static str {
        types::IMAGE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        require_keys(data, "image", FILE_KEYS)?;
        for key in ["width", "height"] {
            if let Some(v) = data.get(key) {
                if !v.is_u64() {
                    return Err(format!("image {key} must be a positive integer"));
                }
            }
        }
        Ok(())
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let mut map = fake_file_record(rng, "png");
        let width = option_f64(options, "width", 640.0) as u64;
        let height = option_f64(options, "height", 480.0) as u64;
        map.insert("width".into(), json!(width));
        map.insert("height".into(), json!(height));
        let url = format!(
            "https://www.example.com/{}",
            map.get("filename").and_then(Value::as_str).unwrap_or_default()
        );
        map.insert("url".into(), json!(url));
        Value::Object(map)
    }

    fn compare(&self, source: &Value, target: &Value) -> bool {
        source.get("md5") == target.get("md5")
    }
}

/// `id::ObjectType` reference to another synchronized object.
pub struct ObjectId;

impl FieldKind for ObjectId {
    fn name(&self) -> &'static str {
        types::OBJECT_ID
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "object reference")?;
        match is_object_reference(text) {
            Some(r) if !r.object_id.is_empty() && !r.object_type.is_empty() => Ok(()),
            _ => Err(format!("`{text}` is not an `id::ObjectType` reference")),
        }
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let object_type = option_str(options, OPTION_OBJECT_TYPE, "Object");
        let id = rng.gen_range(1..=1000).to_string();
        Value::String(encode_object_reference(&id, object_type))
    }
}

const INLINE_WORDS: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon"];

/// JSON encoded array of strings, stored as a single string.
pub struct Inline;

impl FieldKind for Inline {
    fn name(&self) -> &'static str {
        types::INLINE
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        if is_blank(data) {
            return Ok(());
        }
        let text = expect_str(data, "inline list")?;
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
            _ => Err(format!("`{text}` is not a JSON array of strings")),
        }
    }

    fn fake(&self, _options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let count = rng.gen_range(1..=INLINE_WORDS.len());
        let picked: Vec<&str> = (0..count).map(|_| pick(rng, INLINE_WORDS)).collect();
        Value::String(json!(picked).to_string())
    }
}

/// Multi-language string: an object keyed by language code.
pub struct MultiLang {
    name: &'static str,
    words: usize,
}

impl MultiLang {
    pub fn varchar() -> Self {
        Self {
            name: types::MVARCHAR,
            words: 1,
        }
    }

    pub fn text() -> Self {
        Self {
            name: types::MTEXT,
            words: 6,
        }
    }
}

impl FieldKind for MultiLang {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, data: &Value) -> Result<(), String> {
        let Value::Object(map) = data else {
            return Err(format!("{} must be an object keyed by language", self.name));
        };
        match map.iter().find(|(_, v)| !v.is_string() && !v.is_null()) {
            Some((lang, _)) => Err(format!("{} entry `{lang}` is not a string", self.name)),
            None => Ok(()),
        }
    }

    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value {
        let langs = option_str(options, "langs", "en_US,fr_FR");
        let mut map = Map::new();
        for lang in langs.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            let words: Vec<String> = (0..self.words).map(|_| random_word(rng, 7)).collect();
            map.insert(lang.to_string(), json!(words.join(" ")));
        }
        Value::Object(map)
    }
}
