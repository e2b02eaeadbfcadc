//! Rendering helpers (console, HTML, markdown) for protocol logs and schemas.

use splash_types::field::FieldDescriptor;
use splash_types::log::{LogLevel, RawLog};

const RESET: &str = "\x1b[0m";

fn console_style(level: LogLevel) -> (&'static str, &'static str) {
    match level {
        LogLevel::Error => ("\x1b[31m", " - Error    => "),
        LogLevel::Warning => ("\x1b[33m", " - Warning  => "),
        LogLevel::Message => ("\x1b[32m", " - Messages => "),
        LogLevel::Debug => ("\x1b[97m", " - Debug    => "),
    }
}

fn html_style(level: LogLevel) -> (&'static str, &'static str) {
    match level {
        LogLevel::Error => ("#FF3300", "Errors"),
        LogLevel::Warning => ("#FF9933", "Warning"),
        LogLevel::Message => ("#006600", "Messages"),
        LogLevel::Debug => ("#003399", "Debug"),
    }
}

/// ANSI coloured log, one entry per line, ending with a colour reset.
pub fn render_console(log: &RawLog) -> String {
    let mut out = String::new();
    for level in LogLevel::ALL {
        let (color, title) = console_style(level);
        for text in log.entries(level) {
            out.push('\n');
            out.push_str(color);
            out.push_str(title);
            out.push_str(text);
        }
    }
    out.push_str(RESET);
    out
}

/// One coloured block per level. Empty levels render an empty `<font>` pair.
pub fn render_html(log: &RawLog) -> String {
    let mut out = String::new();
    for level in LogLevel::ALL {
        let (color, title) = html_style(level);
        let entries = log.entries(level);
        out.push_str(&format!("<font color=\"{}\">", color));
        if !entries.is_empty() {
            out.push_str(&format!("<u><b>{}</b></u></br> ", title));
            for text in entries {
                out.push_str(&format!("{}</br>", text));
            }
        }
        out.push_str("</font>");
    }
    out
}

/// Checklist view: `[KO]` errors, `[WAR]` warnings, `[OK]` for the rest.
pub fn render_html_list(log: &RawLog) -> String {
    let mut out = String::new();
    for level in LogLevel::ALL {
        let (color, mark) = match level {
            LogLevel::Error => ("#FF3300", "KO"),
            LogLevel::Warning => ("#FF9933", "WAR"),
            LogLevel::Message | LogLevel::Debug => ("#006600", "OK"),
        };
        for text in log.entries(level) {
            out.push_str(&format!(
                "[<font color=\"{}\">&nbsp;{}&nbsp;</font>]&nbsp;&nbsp;&nbsp;{}\n</br>",
                color, mark, text
            ));
        }
    }
    out
}

fn flags(field: &FieldDescriptor) -> String {
    let mut flags = Vec::new();
    if field.required {
        flags.push("required");
    }
    match (field.read, field.write) {
        (true, false) => flags.push("read-only"),
        (false, true) => flags.push("write-only"),
        _ => {}
    }
    if field.in_list {
        flags.push("listed");
    }
    if field.log {
        flags.push("logged");
    }
    if field.notest {
        flags.push("notest");
    }
    flags.join(", ")
}

/// Markdown table of a published schema.
pub fn render_fields_md(object_type: &str, fields: &[FieldDescriptor]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} fields\n\n", object_type));
    if fields.is_empty() {
        out.push_str("_No fields declared._\n");
        return out;
    }
    out.push_str("| id | type | name | group | flags | tag |\n");
    out.push_str("|----|------|------|-------|-------|-----|\n");
    for field in fields {
        out.push_str(&format!(
            "| `{}` | `{}` | {} | {} | {} | {} |\n",
            field.id,
            field.field_type,
            field.name,
            field.group.as_deref().unwrap_or("-"),
            flags(field),
            field.tag.as_deref().unwrap_or("-"),
        ));
    }

    let with_choices: Vec<&FieldDescriptor> =
        fields.iter().filter(|f| !f.choices.is_empty()).collect();
    if !with_choices.is_empty() {
        out.push_str("\n## Choices\n\n");
        for field in with_choices {
            out.push_str(&format!("- `{}`:", field.id));
            for choice in &field.choices {
                out.push_str(&format!(" `{}` ({})", choice.key, choice.value));
            }
            out.push('\n');
        }
    }
    out
}
