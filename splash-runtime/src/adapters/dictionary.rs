use crate::ports::Translator;
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Most positional parameters a message template consumes.
pub const MAX_PARAMS: usize = 5;

const PLACEHOLDER: &str = "%s";

static BUILTIN: &[(&str, &str)] = &[
    // Schema builder
    ("ErrFieldsNoNew", "No field is being defined, call create() first."),
    ("ErrFieldsNoType", "Field definition has no type."),
    ("ErrFieldsNoId", "Field definition of type %s has no identifier."),
    ("ErrFieldsNoName", "Field %s has no name."),
    ("ErrFieldsNoDesc", "Field %s has no description."),
    ("ErrFieldsNoOptionType", "Field %s: option type may not be empty."),
    ("ErrFieldsNoList", "No fields were declared."),
    // Dispatch
    ("ErrLocalWrongField", "%s::%s() Requested field %s was not found."),
    ("ErrLocalObjectNotFound", "%s::%s() Unable to load object %s."),
    ("ErrLocalObjectCreate", "%s::%s() Unable to create new object."),
    ("ErrLocalObjectUpdate", "%s::%s() Unable to save object changes."),
    ("ErrLocalHost", "%s::%s() Host error: %s"),
    ("ErrLocalTpl", "%s::%s() Invalid field value for %s."),
    ("ErrUnknownObjectType", "Unknown object type %s."),
    ("ErrTaskParams", "Task %s has invalid parameters: %s"),
    ("ErrUnknownTask", "Unknown task %s."),
    ("ErrTaskEncode", "Task %s: unable to encode result: %s"),
    ("DebTraceMsg", "Trace: %s::%s()"),
    ("MsgObjectSaved", "Object %s %s saved."),
    // Field types
    ("ErrInvalidType", "Field type %s is not registered."),
    ("ErrInvalidData", "Invalid %s value: %s"),
    // Prices
    ("ErrPriceInvalid", "%s: invalid price, amount missing or not a number."),
    ("ErrPriceBothValues", "%s: invalid price, both amounts given."),
    ("ErrPriceNoVATValue", "%s: invalid price, VAT rate missing."),
    ("ErrPriceNoCurrCode", "%s: invalid price, currency code missing."),
    // Files
    ("ErrFileDirMissing", "%s: directory not given."),
    ("ErrFileFileMissing", "%s: file name not given."),
    ("ErrFileMd5Missing", "%s: file checksum not given."),
    ("ErrFileRawMissing", "%s: file contents not given."),
    ("ErrFileDirNoExists", "%s: directory %s does not exist."),
    ("ErrFileNoExists", "%s: file %s does not exist."),
    ("ErrFileReadable", "%s: file %s is not readable."),
    ("ErrFileRead", "%s: unable to read file %s."),
    ("ErrFileWrite", "%s: unable to write file %s."),
    ("ErrFileWriteable", "%s: file %s is not writable."),
    ("ErrFileDeleted", "%s: unable to delete file %s."),
    ("ErrFileRawDecode", "%s: file contents of %s are not valid base64."),
    ("ErrFileMd5Mismatch", "%s: checksum of %s does not match after write."),
    ("MsgFileRead", "%s: file %s read."),
    ("MsgFileWrite", "%s: file %s written."),
    ("MsgFileDeleted", "%s: file %s deleted."),
    ("MsgFileExists", "%s: file %s found."),
    // Log buffer
    ("MsgLogCleaned", "Log messages buffer cleaned."),
];

/// Key to template map implementing [`Translator`].
///
/// Templates use sequential `%s` placeholders. Unknown keys translate to
/// themselves, with the same placeholder substitution.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    messages: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DictionaryFile {
    messages: HashMap<String, String>,
}

impl Dictionary {
    /// English texts for every key the workspace emits.
    pub fn builtin() -> Self {
        Self {
            messages: BUILTIN
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Built-in texts overridden by a TOML file with a `[messages]` table.
    pub fn load(path: &Utf8Path) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read translations {}", path))?;
        let mut dict = Self::builtin();
        let added = dict
            .extend_from_toml(&contents)
            .with_context(|| format!("parse translations {}", path))?;
        debug!("loaded {} translations from {}", added, path);
        Ok(dict)
    }

    /// Merge a `[messages]` table, returning how many entries it had.
    pub fn extend_from_toml(&mut self, contents: &str) -> anyhow::Result<usize> {
        let file: DictionaryFile = toml::from_str(contents).context("invalid TOML")?;
        let added = file.messages.len();
        self.messages.extend(file.messages);
        Ok(added)
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Templates translated without params are returned as is, `%s` included.
fn substitute(template: &str, params: &[&str]) -> String {
    if params.is_empty() {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut params = params.iter().take(MAX_PARAMS);
    let mut rest = template;
    while let Some(pos) = rest.find(PLACEHOLDER) {
        out.push_str(&rest[..pos]);
        out.push_str(params.next().copied().unwrap_or_default());
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

impl Translator for Dictionary {
    fn translate(&self, key: &str, params: &[&str]) -> String {
        let template = self.messages.get(key).map(String::as_str).unwrap_or(key);
        substitute(template, params)
    }
}
