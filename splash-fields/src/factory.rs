use crate::error::SchemaError;
use serde_json::Value;
use splash_hash::field_tag;
use splash_runtime::ports::{LogSink, Translator};
use splash_types::field::{FieldChoice, FieldDescriptor};
use splash_types::ids::{FieldId, FieldType, LIST_SPLIT, LIST_TYPE};
use std::collections::BTreeMap;
use tracing::debug;

/// Descriptor under construction. Identifiers stay raw strings until commit.
#[derive(Debug)]
struct PendingField {
    field_type: String,
    id: String,
    name: String,
    description: String,
    group: Option<String>,
    required: bool,
    read: bool,
    write: bool,
    in_list: bool,
    log: bool,
    item_type: Option<String>,
    item_prop: Option<String>,
    tag: Option<String>,
    choices: Vec<FieldChoice>,
    associations: Vec<String>,
    options: BTreeMap<String, Value>,
    notest: bool,
}

impl PendingField {
    fn new(field_type: &str) -> Self {
        Self {
            field_type: field_type.to_string(),
            id: String::new(),
            name: String::new(),
            description: String::new(),
            group: None,
            required: false,
            read: true,
            write: true,
            in_list: false,
            log: false,
            item_type: None,
            item_prop: None,
            tag: None,
            choices: Vec::new(),
            associations: Vec::new(),
            options: BTreeMap::new(),
            notest: false,
        }
    }

    /// Checks type, id, name then description. First failure wins.
    fn into_descriptor(self) -> Result<FieldDescriptor, SchemaError> {
        if self.field_type.is_empty() {
            return Err(SchemaError::MissingType);
        }
        let field_type = FieldType::parse(&self.field_type)
            .map_err(|_| SchemaError::InvalidType(self.field_type.clone()))?;
        if self.id.is_empty() {
            return Err(SchemaError::MissingId {
                field_type: self.field_type,
            });
        }
        let id = FieldId::parse(&self.id).map_err(|_| SchemaError::InvalidId(self.id.clone()))?;
        if self.name.is_empty() {
            return Err(SchemaError::MissingName(self.id));
        }
        if self.description.is_empty() {
            return Err(SchemaError::MissingDescription(self.id));
        }
        Ok(FieldDescriptor {
            id,
            field_type,
            name: self.name,
            description: self.description,
            group: self.group,
            required: self.required,
            read: self.read,
            write: self.write,
            in_list: self.in_list,
            log: self.log,
            item_type: self.item_type,
            item_prop: self.item_prop,
            tag: self.tag,
            choices: self.choices,
            associations: self.associations,
            options: self.options,
            notest: self.notest,
        })
    }
}

/// Fluent builder for the field schema of one object type.
///
/// At most one descriptor is pending at a time. [`create`](Self::create) and
/// [`publish`](Self::publish) commit it; an invalid descriptor is logged and
/// dropped without stopping the build. Mutators called with nothing pending
/// are logged no-ops.
///
/// ```ignore
/// factory
///     .create("varchar")
///     .identifier("ref")
///     .name("Reference")
///     .is_required()
///     .is_listed();
/// ```
pub struct FieldsFactory<'a> {
    log: &'a dyn LogSink,
    translator: &'a dyn Translator,
    pending: Option<PendingField>,
    fields: Vec<FieldDescriptor>,
    errors: Vec<SchemaError>,
}

impl<'a> FieldsFactory<'a> {
    pub fn new(log: &'a dyn LogSink, translator: &'a dyn Translator) -> Self {
        Self {
            log,
            translator,
            pending: None,
            fields: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Start a new descriptor of type `field_type`, committing the pending one.
    pub fn create(&mut self, field_type: &str) -> &mut Self {
        self.commit();
        self.pending = Some(PendingField::new(field_type));
        self
    }

    /// [`create`](Self::create) with identifier and name in one call.
    pub fn declare(&mut self, field_type: &str, id: &str, name: &str) -> &mut Self {
        self.create(field_type).identifier(id).name(name)
    }

    pub fn identifier(&mut self, id: &str) -> &mut Self {
        self.update(|field, _| field.id = id.to_string())
    }

    /// Also used as description while none is set.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.update(|field, translator| {
            field.name = name.to_string();
            if field.description.is_empty() {
                field.description = translator.translate(name.trim(), &[]);
            }
        })
    }

    pub fn description(&mut self, text: &str) -> &mut Self {
        self.update(|field, translator| field.description = translator.translate(text.trim(), &[]))
    }

    pub fn group(&mut self, text: &str) -> &mut Self {
        self.update(|field, translator| {
            field.group = Some(translator.translate(text.trim(), &[]));
        })
    }

    /// Move the pending field into list `list`: id becomes `id@list`, type
    /// becomes `type@list`. Empty list names are ignored.
    pub fn in_list(&mut self, list: &str) -> &mut Self {
        if list.is_empty() {
            return self;
        }
        self.update(|field, _| {
            field.id = format!("{}{LIST_SPLIT}{list}", field.id);
            field.field_type = format!("{}{LIST_SPLIT}{LIST_TYPE}", field.field_type);
        })
    }

    pub fn is_read_only(&mut self) -> &mut Self {
        self.update(|field, _| {
            field.read = true;
            field.write = false;
        })
    }

    pub fn is_write_only(&mut self) -> &mut Self {
        self.update(|field, _| {
            field.read = false;
            field.write = true;
        })
    }

    pub fn is_required(&mut self) -> &mut Self {
        self.update(|field, _| field.required = true)
    }

    pub fn is_listed(&mut self) -> &mut Self {
        self.update(|field, _| field.in_list = true)
    }

    pub fn is_logged(&mut self) -> &mut Self {
        self.update(|field, _| field.log = true)
    }

    pub fn is_not_tested(&mut self) -> &mut Self {
        self.update(|field, _| field.notest = true)
    }

    /// Set the semantic linking pair and derive the tag from it.
    pub fn micro_data(&mut self, item_type: &str, item_prop: &str) -> &mut Self {
        self.update(|field, _| {
            field.item_type = Some(item_type.to_string());
            field.item_prop = Some(item_prop.to_string());
            field.tag = Some(field_tag(item_prop, item_type));
        })
    }

    /// Replace the associated fields. An empty slice clears them.
    pub fn association(&mut self, ids: &[&str]) -> &mut Self {
        self.update(|field, _| field.associations = ids.iter().map(|s| s.to_string()).collect())
    }

    pub fn add_choice(&mut self, value: &str, label: &str) -> &mut Self {
        self.update(|field, translator| {
            field.choices.push(FieldChoice {
                key: value.to_string(),
                value: translator.translate(label.trim(), &[]),
            });
        })
    }

    pub fn add_choices<K, L>(&mut self, choices: impl IntoIterator<Item = (K, L)>) -> &mut Self
    where
        K: AsRef<str>,
        L: AsRef<str>,
    {
        for (value, label) in choices {
            self.add_choice(value.as_ref(), label.as_ref());
        }
        self
    }

    /// Set a fake data constraint, for example `("maxLength", 12)`.
    pub fn add_option(&mut self, option: &str, value: impl Into<Value>) -> &mut Self {
        if option.is_empty() {
            let id = self
                .pending
                .as_ref()
                .map(|field| field.id.clone())
                .unwrap_or_default();
            self.record(SchemaError::EmptyOptionType(id));
            return self;
        }
        let value = value.into();
        self.update(|field, _| {
            field.options.insert(option.to_string(), value);
        })
    }

    pub fn add_options<K, V>(&mut self, options: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (option, value) in options {
            self.add_option(option.as_ref(), value);
        }
        self
    }

    /// Commit the pending field and hand over the declared list.
    ///
    /// The builder is empty afterwards, so a second call without new
    /// declarations fails with [`SchemaError::NoFieldsDeclared`].
    pub fn publish(&mut self) -> Result<Vec<FieldDescriptor>, SchemaError> {
        self.commit();
        if self.fields.is_empty() {
            self.record(SchemaError::NoFieldsDeclared);
            return Err(SchemaError::NoFieldsDeclared);
        }
        debug!("published {} fields", self.fields.len());
        Ok(std::mem::take(&mut self.fields))
    }

    /// Errors recorded so far, in order.
    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn update(&mut self, apply: impl FnOnce(&mut PendingField, &dyn Translator)) -> &mut Self {
        let translator = self.translator;
        match self.pending.as_mut() {
            Some(field) => apply(field, translator),
            None => self.record(SchemaError::NoPendingField),
        }
        self
    }

    fn commit(&mut self) {
        let Some(field) = self.pending.take() else {
            return;
        };
        match field.into_descriptor() {
            Ok(descriptor) => {
                debug!("committed field {} ({})", descriptor.id, descriptor.field_type);
                self.fields.push(descriptor);
            }
            Err(err) => self.record(err),
        }
    }

    fn record(&mut self, err: SchemaError) {
        let params: Vec<&str> = err.subject().into_iter().collect();
        self.log.err(err.key(), &params);
        self.errors.push(err);
    }
}

/// First descriptor carrying `tag`. Empty tags never match.
pub fn search_by_tag<'f>(fields: &'f [FieldDescriptor], tag: &str) -> Option<&'f FieldDescriptor> {
    if tag.is_empty() {
        return None;
    }
    fields.iter().find(|f| f.tag.as_deref() == Some(tag))
}

/// First descriptor whose encoded id is `id`. Empty ids never match.
pub fn search_by_id<'f>(fields: &'f [FieldDescriptor], id: &str) -> Option<&'f FieldDescriptor> {
    if id.is_empty() {
        return None;
    }
    fields.iter().find(|f| f.id == id)
}
