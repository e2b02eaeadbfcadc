use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use splash_core::{Connector, Response, Task};
use splash_dispatch::{FieldValues, GetContext, HandlerRegistry, ObjectAdapter, SetContext};
use splash_fields::FieldsFactory;
use splash_runtime::Runtime;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Contact {
    id: String,
    email: String,
}

#[derive(Default)]
struct Contacts {
    rows: BTreeMap<String, Contact>,
}

impl Contacts {
    fn build_fields(&self, factory: &mut FieldsFactory<'_>) {
        factory
            .declare("email", "email", "Email")
            .micro_data("http://schema.org/ContactPoint", "email")
            .is_required();
    }

    fn get_fields(&self, ctx: &mut GetContext<'_, Contact>, key: &str, field: &str) {
        if field == "email" {
            let email = ctx.object().email.clone();
            ctx.provide(key, field, email);
        }
    }

    fn set_fields(&mut self, ctx: &mut SetContext<'_, Contact>, field: &str, value: &Value) {
        if field == "email" {
            let email = value.as_str().unwrap_or_default().to_string();
            ctx.assign(field, email, |c| &mut c.email);
        }
    }
}

impl ObjectAdapter for Contacts {
    type Target = Contact;

    fn object_type(&self) -> &str {
        "ThirdParty"
    }

    fn handlers() -> HandlerRegistry<Self> {
        HandlerRegistry::new()
            .on_build(Contacts::build_fields)
            .on_get(Contacts::get_fields)
            .on_set(Contacts::set_fields)
    }

    fn load(&mut self, id: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.rows.get(id).cloned())
    }

    fn create(&mut self, _input: &FieldValues) -> anyhow::Result<Option<Contact>> {
        Ok(Some(Contact {
            id: format!("c{}", self.rows.len() + 1),
            ..Contact::default()
        }))
    }

    fn update(&mut self, target: Contact, needed: bool) -> anyhow::Result<Option<String>> {
        let id = target.id.clone();
        if needed {
            self.rows.insert(id.clone(), target);
        }
        Ok(Some(id))
    }
}

fn connector() -> Connector {
    let mut connector = Connector::new(Runtime::default());
    connector.register(Contacts::default());
    connector
}

fn run(connector: &mut Connector, tasks: Vec<Task>) -> Response {
    connector.run(tasks)
}

#[test]
fn objects_task_lists_registered_types() {
    let mut connector = connector();
    let response = run(&mut connector, vec![Task::new("1", "objects", Value::Null)]);
    assert!(response.result);
    assert_eq!(response.tasks[0].data, json!(["ThirdParty"]));
    assert_eq!(response.tasks[0].desc, "objects");
}

#[test]
fn fields_task_returns_wire_descriptors() {
    let mut connector = connector();
    let response = run(
        &mut connector,
        vec![Task::new("1", "fields", json!({"type": "ThirdParty"}))],
    );
    let data = &response.task("1").expect("task").data;
    assert_eq!(data[0]["id"], json!("email"));
    assert_eq!(data[0]["type"], json!("email"));
    assert_eq!(data[0]["required"], json!(true));
}

#[test]
fn set_then_get_round_trip() {
    let mut connector = connector();
    let response = run(
        &mut connector,
        vec![
            Task::new(
                "1",
                "set",
                json!({"type": "ThirdParty", "id": "", "fields": {"email": "ann@example.com"}}),
            ),
            Task::new(
                "2",
                "get",
                json!({"type": "ThirdParty", "id": "c1", "fields": ["email"]}),
            ),
        ],
    );
    assert!(response.result, "{response:?}");
    assert_eq!(response.tasks[0].data, json!("c1"));
    assert_eq!(
        response.tasks[1].data,
        json!({"id": "c1", "email": "ann@example.com"})
    );
    assert_eq!(response.log.msg, vec!["Object ThirdParty c1 saved.".to_string()]);
}

#[test]
fn failures_are_reported_per_task() {
    let mut connector = connector();
    let response = run(
        &mut connector,
        vec![
            Task::new("1", "objects", Value::Null),
            Task::new("2", "get", json!({"type": "Order", "id": "1", "fields": []})),
            Task::new("3", "get", json!({"type": "ThirdParty", "id": "c9", "fields": ["email"]})),
            Task::new("4", "get", json!({"type": "ThirdParty"})),
            Task::new("5", "purge", Value::Null),
        ],
    );
    assert!(!response.result);
    let results: Vec<bool> = response.tasks.iter().map(|t| t.result).collect();
    assert_eq!(results, vec![true, false, false, false, false]);
    assert_eq!(response.tasks[1].data, Value::Null);
    let errors = &response.log.err;
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0], "Unknown object type Order.");
    assert_eq!(errors[1], "ThirdParty::get() Unable to load object c9.");
    assert!(errors[2].starts_with("Task get has invalid parameters: "));
    assert_eq!(errors[3], "Unknown task purge.");
}

#[test]
fn unknown_fields_fail_the_task() {
    let mut connector = connector();
    let response = run(
        &mut connector,
        vec![Task::new(
            "1",
            "set",
            json!({"type": "ThirdParty", "fields": {"email": "a@b.c", "phone": "1"}}),
        )],
    );
    assert!(!response.result);
    assert_eq!(
        response.log.err,
        vec!["ThirdParty::set() Requested field phone was not found.".to_string()]
    );
}

#[test]
fn log_is_drained_between_batches() {
    let mut connector = connector();
    let first = run(&mut connector, vec![Task::new("1", "purge", Value::Null)]);
    assert_eq!(first.log.err.len(), 1);
    let second = run(&mut connector, vec![Task::new("1", "objects", Value::Null)]);
    assert!(second.log.err.is_empty());
}

#[test]
fn response_serializes_transport_keys() {
    let mut connector = connector();
    let response = run(&mut connector, vec![Task::new("1", "objects", Value::Null)]);
    let wire = serde_json::to_value(&response).expect("serialize");
    assert_eq!(wire["result"], json!(true));
    assert!(wire["tasks"][0].get("delayms").is_some());
    assert!(wire["tasks"][0]["delaystr"].as_str().expect("delay").ends_with(" ms"));
}
