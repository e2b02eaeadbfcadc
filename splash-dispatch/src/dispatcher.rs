use crate::adapter::{FieldValues, ObjectAdapter, RequestedFields};
use crate::context::{GetContext, SetContext, UpdateFlag};
use crate::error::DispatchError;
use crate::handlers::HandlerRegistry;
use serde_json::{Map, Value};
use splash_fields::FieldsFactory;
use splash_runtime::ports::{LogSink, Translator};
use splash_types::field::FieldDescriptor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Routes schema, Get and Set requests of one object type to the handlers
/// its adapter registered.
///
/// Every call starts from fresh buffers. Get and Set are all or nothing with
/// respect to the requested fields: any field left unclaimed fails the call
/// and is logged on its own. Host mutations made by a failed Set are not
/// rolled back.
pub struct ObjectDispatcher<A: ObjectAdapter> {
    adapter: A,
    handlers: HandlerRegistry<A>,
    log: Arc<dyn LogSink>,
    translator: Arc<dyn Translator>,
}

impl<A: ObjectAdapter> ObjectDispatcher<A> {
    pub fn new(adapter: A, log: Arc<dyn LogSink>, translator: Arc<dyn Translator>) -> Self {
        Self::with_handlers(adapter, A::handlers(), log, translator)
    }

    pub fn with_handlers(
        adapter: A,
        handlers: HandlerRegistry<A>,
        log: Arc<dyn LogSink>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            adapter,
            handlers,
            log,
            translator,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    pub fn object_type(&self) -> &str {
        self.adapter.object_type()
    }

    /// Run every build handler in order and publish the resulting schema.
    pub fn fields(&self) -> Result<Vec<FieldDescriptor>, DispatchError> {
        self.log.deb("DebTraceMsg", &[self.object_type(), "fields"]);
        let mut factory = FieldsFactory::new(&*self.log, &*self.translator);
        for build in self.handlers.builders() {
            build(&self.adapter, &mut factory);
        }
        Ok(factory.publish()?)
    }

    /// Read the requested fields of object `id`.
    ///
    /// The result always carries `id`. For each requested entry the getters
    /// are tried in order until one claims it.
    pub fn get(
        &mut self,
        id: &str,
        requested: RequestedFields,
    ) -> Result<Map<String, Value>, DispatchError> {
        let object_type = self.object_type().to_string();
        self.log.deb("DebTraceMsg", &[object_type.as_str(), "get"]);

        let object = self.load(&object_type, "get", id)?;

        let mut input = requested.into_inner();
        let mut output = Map::new();
        output.insert("id".to_string(), Value::String(id.to_string()));

        let getters: Vec<_> = self.handlers.getters().collect();
        let entries: Vec<(String, String)> = input
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, field) in &entries {
            let mut ctx = GetContext::new(&object, &mut input, &mut output, &*self.log);
            for getter in &getters {
                if ctx.is_claimed(key) {
                    break;
                }
                getter(&self.adapter, &mut ctx, key, field);
            }
        }

        let leftovers: Vec<String> = input.into_values().collect();
        self.check_consumed(&object_type, "get", leftovers)?;
        debug!("{}: read {} fields of {}", object_type, entries.len(), id);
        Ok(output)
    }

    /// Write `values` to object `id`, or to a new object when `id` is `None`,
    /// and save it. Returns the id reported by the adapter.
    ///
    /// The adapter's `update` is never reached when a field is left unclaimed.
    pub fn set(&mut self, id: Option<&str>, values: FieldValues) -> Result<String, DispatchError> {
        let object_type = self.object_type().to_string();
        self.log.deb("DebTraceMsg", &[object_type.as_str(), "set"]);

        let mut object = match id {
            Some(id) => self.load(&object_type, "set", id)?,
            None => self.create(&object_type, &values)?,
        };

        let mut input = values;
        let mut flag = UpdateFlag::default();
        let setters: Vec<_> = self.handlers.setters().collect();
        let entries: Vec<(String, Value)> = input
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (field, value) in &entries {
            let mut ctx = SetContext::new(&mut object, &mut input, &mut flag, &*self.log);
            for setter in &setters {
                if ctx.is_claimed(field) {
                    break;
                }
                setter(&mut self.adapter, &mut ctx, field, value);
            }
        }

        let leftovers: Vec<String> = input.into_keys().collect();
        self.check_consumed(&object_type, "set", leftovers)?;

        let saved = self
            .adapter
            .update(object, flag.is_needed())
            .map_err(|source| self.host_failure(&object_type, "set", source))?;
        match saved {
            Some(saved_id) => {
                self.log.msg("MsgObjectSaved", &[object_type.as_str(), saved_id.as_str()]);
                Ok(saved_id)
            }
            None => {
                self.log.err("ErrLocalObjectUpdate", &[object_type.as_str(), "set"]);
                Err(DispatchError::UpdateFailed { object_type })
            }
        }
    }

    fn load(&mut self, object_type: &str, function: &str, id: &str) -> Result<A::Target, DispatchError> {
        match self.adapter.load(id) {
            Ok(Some(object)) => Ok(object),
            Ok(None) => {
                self.log
                    .err("ErrLocalObjectNotFound", &[object_type, function, id]);
                Err(DispatchError::ObjectNotFound {
                    object_type: object_type.to_string(),
                    id: id.to_string(),
                })
            }
            Err(source) => Err(self.host_failure(object_type, function, source)),
        }
    }

    fn create(&mut self, object_type: &str, values: &FieldValues) -> Result<A::Target, DispatchError> {
        match self.adapter.create(values) {
            Ok(Some(object)) => Ok(object),
            Ok(None) => {
                self.log.err("ErrLocalObjectCreate", &[object_type, "set"]);
                Err(DispatchError::CreateFailed {
                    object_type: object_type.to_string(),
                })
            }
            Err(source) => Err(self.host_failure(object_type, "set", source)),
        }
    }

    /// One log entry per leftover field, then a single error listing them all.
    fn check_consumed(
        &self,
        object_type: &str,
        function: &str,
        leftovers: Vec<String>,
    ) -> Result<(), DispatchError> {
        if leftovers.is_empty() {
            return Ok(());
        }
        for field in &leftovers {
            self.log
                .err("ErrLocalWrongField", &[object_type, function, field.as_str()]);
        }
        warn!(
            "{}::{}() left {} fields unclaimed",
            object_type,
            function,
            leftovers.len()
        );
        Err(DispatchError::UnconsumedFields {
            object_type: object_type.to_string(),
            fields: leftovers,
        })
    }

    fn host_failure(&self, object_type: &str, function: &str, source: anyhow::Error) -> DispatchError {
        let reason = format!("{source:#}");
        self.log
            .err("ErrLocalHost", &[object_type, function, reason.as_str()]);
        DispatchError::Host {
            object_type: object_type.to_string(),
            source,
        }
    }
}
