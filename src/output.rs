//! @ai:module:intent Format catalogs and event streams for output (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_catalog, format_events, to_json
//! @ai:module:depends_on record, event, error
//! @ai:module:stateless true

use crate::error::Result;
use crate::event::Event;
use crate::record::{Catalog, Namespace, Param, Record};
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    #[default]
    Json,
    JsonPretty,
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// @ai:intent Format a catalog as a string
/// @ai:effects pure
pub fn format_catalog(catalog: &Catalog, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(catalog, false),
        OutputFormat::JsonPretty => to_json(catalog, true),
        OutputFormat::Text => Ok(format_catalog_text(catalog)),
    }
}

/// @ai:intent Format a catalog as a human-readable outline
/// @ai:effects pure
fn format_catalog_text(catalog: &Catalog) -> String {
    let mut output = String::new();

    match catalog {
        Catalog::Tree(root) => write_namespace(&mut output, root, "", 0),
        Catalog::Flat(records) => {
            for record in records {
                write_record(&mut output, record, true, 0);
            }
        }
    }

    if output.is_empty() {
        output.push_str(&format!("{}\n", "No documented entities found".dimmed()));
    } else {
        output.push_str(&format!("\n{} entities\n", catalog.len()));
    }

    output
}

fn write_namespace(output: &mut String, namespace: &Namespace, path: &str, depth: usize) {
    for (name, entry) in &namespace.entries {
        let mut record_depth = depth;
        if entry.is_overloaded() {
            let count = format!("({} overloads)", entry.records().len());
            output.push_str(&format!(
                "{}{} {}\n",
                indent(depth),
                name.cyan().bold(),
                count.dimmed()
            ));
            record_depth += 1;
        }
        for record in entry.records() {
            write_record(output, record, false, record_depth);
        }
    }

    for (segment, child) in &namespace.namespaces {
        let child_path = if path.is_empty() {
            segment.clone()
        } else {
            format!("{}.{}", path, segment)
        };

        output.push_str(&format!(
            "{}{}\n",
            indent(depth),
            child_path.bold().magenta()
        ));
        write_namespace(output, child, &child_path, depth + 1);
    }
}

fn write_record(output: &mut String, record: &Record, qualified: bool, depth: usize) {
    let pad = indent(depth);
    let name = (if qualified {
        record.qualified_name()
    } else {
        record.name.clone()
    })
    .unwrap_or_default();

    let mut header = format!("{}{}", pad, name.cyan().bold());
    let kinds = record.kinds();
    if !kinds.is_empty() {
        header.push_str(&format!(" ({})", kinds.join(", ")));
    }
    if record.private {
        header.push_str(&format!(" {}", "private".yellow()));
    }
    if record.deprecated {
        header.push_str(&format!(" {}", "deprecated".red()));
    }
    output.push_str(&header);
    output.push('\n');

    if !record.description.is_empty() {
        for line in record.description.lines() {
            output.push_str(&format!("{}  {}\n", pad, line.dimmed()));
        }
    }

    for param in &record.param {
        output.push_str(&format!("{}  {} {}\n", pad, "param".green(), describe_param(param)));
    }

    if let Some(returns) = &record.returns {
        let mut line = format!("{}  {}", pad, "returns".green());
        if let Some(type_name) = &returns.type_name {
            line.push_str(&format!(" {{{}}}", type_name));
        }
        if let Some(description) = &returns.description {
            line.push_str(&format!(" {}", description));
        }
        output.push_str(&line);
        output.push('\n');
    }

    for (tag, values) in &record.tags {
        for value in values {
            output.push_str(&format!("{}  {} {}\n", pad, format!("@{}", tag).blue(), value));
        }
    }
}

/// Render a param in its source form, e.g. `{string} [x="a"] desc`.
fn describe_param(param: &Param) -> String {
    let mut parts = Vec::new();

    if let Some(type_name) = &param.type_name {
        parts.push(format!("{{{}}}", type_name));
    }

    if let Some(name) = &param.name {
        parts.push(match (&param.default_value, param.optional) {
            (Some(default_value), _) => format!("[{}={}]", name, default_value),
            (None, true) => format!("[{}]", name),
            (None, false) => name.clone(),
        });
    }

    if let Some(description) = &param.description {
        if !description.is_empty() {
            parts.push(description.clone());
        }
    }

    parts.join(" ")
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// @ai:intent Format the raw event stream, one `tag<TAB>value` line per event
/// @ai:post newlines inside values are escaped so each event stays on one line
/// @ai:effects pure
pub fn format_events(events: &[Event]) -> String {
    let mut output = String::new();
    for event in events {
        output.push_str(event.tag.name());
        output.push('\t');
        output.push_str(&event.value.replace('\n', "\\n"));
        output.push('\n');
    }
    output
}
