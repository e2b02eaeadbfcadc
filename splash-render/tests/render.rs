use pretty_assertions::assert_eq;
use serde_json::json;
use splash_render::{render_console, render_fields_md, render_html, render_html_list};
use splash_types::field::FieldDescriptor;
use splash_types::log::{LogLevel, RawLog};

fn sample_log() -> RawLog {
    let mut log = RawLog::default();
    log.push(LogLevel::Error, "broken");
    log.push(LogLevel::Message, "saved");
    log
}

#[test]
fn console_log_is_coloured_and_reset() {
    assert_eq!(
        render_console(&sample_log()),
        "\n\x1b[31m - Error    => broken\n\x1b[32m - Messages => saved\x1b[0m"
    );
    assert_eq!(render_console(&RawLog::default()), "\x1b[0m");
}

#[test]
fn html_log_has_one_block_per_level() {
    let html = render_html(&sample_log());
    assert!(html.starts_with("<font color=\"#FF3300\"><u><b>Errors</b></u></br> broken</br></font>"));
    assert!(html.contains("<font color=\"#FF9933\"></font>"));
    assert!(html.contains("<u><b>Messages</b></u></br> saved</br>"));
    assert_eq!(html.matches("<font").count(), 4);
}

#[test]
fn html_list_marks_each_entry() {
    let html = render_html_list(&sample_log());
    assert!(html.contains("&nbsp;KO&nbsp;</font>]&nbsp;&nbsp;&nbsp;broken"));
    assert!(html.contains("&nbsp;OK&nbsp;</font>]&nbsp;&nbsp;&nbsp;saved"));
    assert_eq!(html.matches("</br>").count(), 2);
}

#[test]
fn fields_table_lists_every_field() {
    let fields: Vec<FieldDescriptor> = serde_json::from_value(json!([
        {"id": "ref", "type": "varchar", "name": "Reference", "desc": "Ref", "required": true, "inlist": true},
        {"id": "status", "type": "varchar", "name": "Status", "desc": "Status", "write": false,
         "choices": [{"key": "draft", "value": "Draft"}]}
    ]))
    .expect("fields");
    let md = render_fields_md("Product", &fields);
    assert!(md.starts_with("# Product fields\n\n"));
    assert!(md.contains("| `ref` | `varchar` | Reference | - | required, listed | - |"));
    assert!(md.contains("| `status` | `varchar` | Status | - | read-only | - |"));
    assert!(md.contains("- `status`: `draft` (Draft)"));
}

#[test]
fn empty_schema_renders_placeholder() {
    assert_eq!(
        render_fields_md("Order", &[]),
        "# Order fields\n\n_No fields declared._\n"
    );
}
