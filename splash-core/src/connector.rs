use crate::service::ObjectService;
use crate::task::{Response, TASK_FIELDS, TASK_GET, TASK_OBJECTS, TASK_SET, Task, TaskResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use splash_dispatch::{DispatchError, FieldValues, ObjectAdapter, ObjectDispatcher, RequestedFields};
use splash_runtime::Runtime;
use splash_runtime::ports::LogSink;
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task `{0}`")]
    UnknownTask(String),
    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),
    #[error("task `{task}` has invalid parameters: {reason}")]
    InvalidParams { task: String, reason: String },
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("unable to encode task result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TaskError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            TaskError::UnknownTask(_) => "ErrUnknownTask",
            TaskError::UnknownObjectType(_) => "ErrUnknownObjectType",
            TaskError::InvalidParams { .. } => "ErrTaskParams",
            TaskError::Dispatch(e) => e.key(),
            TaskError::Encode(_) => "ErrTaskEncode",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TypeParams {
    #[serde(rename = "type")]
    object_type: String,
}

#[derive(Debug, Deserialize)]
struct GetParams {
    #[serde(rename = "type")]
    object_type: String,
    id: String,
    fields: Value,
}

#[derive(Debug, Deserialize)]
struct SetParams {
    #[serde(rename = "type")]
    object_type: String,
    #[serde(default)]
    id: Option<String>,
    fields: FieldValues,
}

/// Serves task batches for every registered object type.
///
/// The protocol log of the runtime is drained into each [`Response`], so a
/// caller sees exactly the entries its batch produced.
pub struct Connector {
    runtime: Runtime,
    objects: BTreeMap<String, Box<dyn ObjectService>>,
}

impl Connector {
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            objects: BTreeMap::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Dispatcher wired to this connector's logger and translations.
    pub fn dispatcher<A: ObjectAdapter>(&self, adapter: A) -> ObjectDispatcher<A> {
        ObjectDispatcher::new(adapter, self.runtime.log(), self.runtime.translator())
    }

    /// Serve `adapter` under its object type, replacing any earlier registration.
    pub fn register<A: ObjectAdapter + 'static>(&mut self, adapter: A) -> &mut Self {
        let dispatcher = self.dispatcher(adapter);
        self.register_service(Box::new(dispatcher))
    }

    pub fn register_service(&mut self, service: Box<dyn ObjectService>) -> &mut Self {
        let object_type = service.object_type().to_string();
        debug!("registered object type {}", object_type);
        self.objects.insert(object_type, service);
        self
    }

    pub fn object_types(&self) -> Vec<&str> {
        self.objects.keys().map(String::as_str).collect()
    }

    /// Run every task in order. The batch result is true only when all tasks succeed.
    pub fn run(&mut self, tasks: Vec<Task>) -> Response {
        let mut results = Vec::with_capacity(tasks.len());
        for task in &tasks {
            results.push(self.run_task(task));
        }
        let result = results.iter().all(|r| r.result);
        info!(
            "ran {} tasks, {} failed",
            results.len(),
            results.iter().filter(|r| !r.result).count()
        );
        Response {
            result,
            tasks: results,
            log: self.runtime.logger.take(),
        }
    }

    pub fn run_task(&mut self, task: &Task) -> TaskResult {
        let started = Instant::now();
        let outcome = self.execute(task);
        let delay_ms = started.elapsed().as_secs_f64() * 1000.0;
        let (result, data) = match outcome {
            Ok(data) => (true, data),
            Err(err) => {
                self.report(task, &err);
                (false, Value::Null)
            }
        };
        TaskResult {
            id: task.id.clone(),
            name: task.name.clone(),
            desc: task.desc.clone(),
            result,
            data,
            delay_ms,
            delay_str: format!("{delay_ms:.3} ms"),
        }
    }

    fn execute(&mut self, task: &Task) -> Result<Value, TaskError> {
        match task.name.as_str() {
            TASK_OBJECTS => Ok(Value::from(self.object_types())),
            TASK_FIELDS => {
                let params: TypeParams = params(task)?;
                let fields = self.service(&params.object_type)?.fields()?;
                Ok(serde_json::to_value(fields)?)
            }
            TASK_GET => {
                let params: GetParams = params(task)?;
                let requested =
                    RequestedFields::from_value(&params.fields).ok_or_else(|| {
                        TaskError::InvalidParams {
                            task: task.name.clone(),
                            reason: "fields must be a list of field ids".into(),
                        }
                    })?;
                let out = self
                    .service(&params.object_type)?
                    .get(&params.id, requested)?;
                Ok(Value::Object(out))
            }
            TASK_SET => {
                let params: SetParams = params(task)?;
                let id = params.id.as_deref().filter(|id| !id.is_empty());
                let saved = self
                    .service(&params.object_type)?
                    .set(id, params.fields)?;
                Ok(Value::String(saved))
            }
            other => Err(TaskError::UnknownTask(other.to_string())),
        }
    }

    fn service(&mut self, object_type: &str) -> Result<&mut Box<dyn ObjectService>, TaskError> {
        self.objects
            .get_mut(object_type)
            .ok_or_else(|| TaskError::UnknownObjectType(object_type.to_string()))
    }

    /// Dispatch failures are logged where they happen; the rest are logged here.
    fn report(&self, task: &Task, err: &TaskError) {
        let log = self.runtime.logger.as_ref();
        match err {
            TaskError::UnknownTask(name) => {
                log.err(err.key(), &[name.as_str()]);
            }
            TaskError::UnknownObjectType(object_type) => {
                log.err(err.key(), &[object_type.as_str()]);
            }
            TaskError::InvalidParams { reason, .. } => {
                log.err(err.key(), &[task.name.as_str(), reason.as_str()]);
            }
            TaskError::Encode(e) => {
                let reason = e.to_string();
                log.err(err.key(), &[task.name.as_str(), reason.as_str()]);
            }
            TaskError::Dispatch(_) => {}
        }
        debug!("task {} ({}) failed: {}", task.id, task.name, err);
    }
}

fn params<T: DeserializeOwned>(task: &Task) -> Result<T, TaskError> {
    serde_json::from_value(task.params.clone()).map_err(|e| TaskError::InvalidParams {
        task: task.name.clone(),
        reason: e.to_string(),
    })
}
