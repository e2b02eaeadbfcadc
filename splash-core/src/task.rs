use serde::{Deserialize, Serialize};
use serde_json::Value;
use splash_types::log::RawLog;

pub const TASK_OBJECTS: &str = "objects";
pub const TASK_FIELDS: &str = "fields";
pub const TASK_GET: &str = "get";
pub const TASK_SET: &str = "set";

/// One request of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub params: Value,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, params: Value) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            desc: name.clone(),
            name,
            params,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}

/// Outcome of one task, echoing its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub result: bool,
    pub data: Value,
    #[serde(rename = "delayms")]
    pub delay_ms: f64,
    #[serde(rename = "delaystr")]
    pub delay_str: String,
}

/// Batch response: overall result, per task results and the protocol log
/// collected while running them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub result: bool,
    pub tasks: Vec<TaskResult>,
    #[serde(default)]
    pub log: RawLog,
}

impl Response {
    pub fn task(&self, id: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
