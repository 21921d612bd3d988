//! Configuration parsing for dashboards.
//!
//! A configuration file is JSON or YAML; JSON is tried first since every
//! JSON document is also valid YAML. The parsed tree is validated
//! strictly: every option is consumed as it is read, and anything left
//! over is an error that names the offending key.

use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::query::QueryType;
use crate::widget::{Dashboard, NumberValue, Section, TableField, Widget};

/// Result of loading a configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error produced while parsing or validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The input was neither valid JSON nor valid YAML.
    Parse { message: String },
    /// A required option was absent.
    MissingOption { context: Option<String>, key: String },
    /// An option was present that the context does not define.
    UnexpectedOption { context: Option<String>, key: String },
    /// None of a set of alternative options was present.
    ExpectedOneOf { context: Option<String>, keys: Vec<String> },
    /// More than one mutually exclusive option was present.
    ConflictingOptions { context: Option<String>, keys: Vec<String> },
    /// An option had the wrong shape or an unsupported value.
    Invalid { context: Option<String>, message: String },
}

fn location(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" for {}", context),
        None => String::new(),
    }
}

fn key_list(keys: &[String], conjunction: &str) -> String {
    let mut result = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            if i == keys.len() - 1 {
                result.push_str(&format!(" {} ", conjunction));
            } else {
                result.push_str(", ");
            }
        }
        result.push_str(&format!("'{}'", key));
    }
    result
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { message } => {
                write!(f, "invalid configuration: {}", message)
            }
            ConfigError::MissingOption { context, key } => {
                write!(
                    f,
                    "invalid configuration{}: missing required option '{}'",
                    location(context),
                    key
                )
            }
            ConfigError::UnexpectedOption { context, key } => {
                write!(
                    f,
                    "invalid configuration{}: unexpected option '{}'",
                    location(context),
                    key
                )
            }
            ConfigError::ExpectedOneOf { context, keys } => {
                write!(
                    f,
                    "invalid configuration{}: expected one of: {}",
                    location(context),
                    key_list(keys, "or")
                )
            }
            ConfigError::ConflictingOptions { context, keys } => {
                write!(
                    f,
                    "invalid configuration{}: expected only one of: {}",
                    location(context),
                    key_list(keys, "or")
                )
            }
            ConfigError::Invalid { context, message } => {
                write!(
                    f,
                    "invalid configuration{}: {}",
                    location(context),
                    message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where and how the evaluated dashboard is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub filename: Option<String>,
}

/// The renderer to run on the evaluated dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Html,
    Slack,
}

/// A parsed configuration: the unevaluated dashboard plus its output
/// settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub dashboard: Dashboard,
    pub output: OutputConfig,
}

impl DashboardConfig {
    /// Loads a configuration from a JSON or YAML string.
    pub fn load(input: &str) -> ConfigResult<Self> {
        let parsed: JsonValue = match serde_json::from_str(input) {
            Ok(value) => value,
            Err(_) => serde_yaml::from_str(input).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?,
        };

        load_dashboard(parsed)
    }
}

fn invalid(context: Option<&str>, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        context: context.map(str::to_string),
        message: message.into(),
    }
}

/// Removes and returns an option, so leftovers can be detected.
fn take(map: &mut Map<String, JsonValue>, key: &str) -> Option<JsonValue> {
    let value = map.remove(key);
    match value {
        Some(JsonValue::Null) => None,
        other => other,
    }
}

fn take_required(
    map: &mut Map<String, JsonValue>,
    context: Option<&str>,
    key: &str,
) -> ConfigResult<JsonValue> {
    take(map, key).ok_or_else(|| ConfigError::MissingOption {
        context: context.map(str::to_string),
        key: key.to_string(),
    })
}

/// Takes an option that must be a scalar, returned as a string.
///
/// YAML happily parses `title: 42` as a number, so numbers and booleans
/// stringify instead of erroring.
fn take_string(
    map: &mut Map<String, JsonValue>,
    context: Option<&str>,
    key: &str,
) -> ConfigResult<Option<String>> {
    match take(map, key) {
        None => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| invalid(context, format!("'{}' is not a string", key))),
    }
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn ensure_empty(map: &Map<String, JsonValue>, context: Option<&str>) -> ConfigResult<()> {
    match map.keys().next() {
        None => Ok(()),
        Some(key) => Err(ConfigError::UnexpectedOption {
            context: context.map(str::to_string),
            key: key.clone(),
        }),
    }
}

/// Requires exactly one of `keys` to be present (and not null).
fn ensure_one_of(
    map: &Map<String, JsonValue>,
    context: Option<&str>,
    keys: &[&str],
) -> ConfigResult<()> {
    let found: Vec<String> = keys
        .iter()
        .filter(|key| !matches!(map.get(**key), None | Some(JsonValue::Null)))
        .map(|key| key.to_string())
        .collect();

    match found.len() {
        0 => Err(ConfigError::ExpectedOneOf {
            context: context.map(str::to_string),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }),
        1 => Ok(()),
        _ => Err(ConfigError::ConflictingOptions {
            context: context.map(str::to_string),
            keys: found,
        }),
    }
}

fn as_object(
    value: JsonValue,
    context: Option<&str>,
) -> ConfigResult<Map<String, JsonValue>> {
    match value {
        JsonValue::Object(map) => Ok(map),
        _ => Err(invalid(context, "expected a mapping")),
    }
}

fn load_string_widget(config: JsonValue) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("string widget");

    // A bare string is shorthand for `{ value: ... }`.
    let mut map = match config {
        JsonValue::String(s) => {
            let mut map = Map::new();
            map.insert("value".to_string(), JsonValue::String(s));
            map
        }
        other => as_object(other, CONTEXT)?,
    };

    ensure_one_of(&map, CONTEXT, &["value", "script"])?;

    let title = take_string(&mut map, CONTEXT, "title")?;
    let url = take_string(&mut map, CONTEXT, "url")?;
    let color = take_string(&mut map, CONTEXT, "color")?;
    let align = take_string(&mut map, CONTEXT, "align")?;
    let value = take_string(&mut map, CONTEXT, "value")?;
    let script = take_string(&mut map, CONTEXT, "script")?;

    ensure_empty(&map, CONTEXT)?;

    Ok(match script {
        Some(script) => Widget::ScriptString {
            title,
            url,
            script,
            align,
            color,
        },
        None => Widget::String {
            title,
            url,
            value: value.unwrap_or_default(),
            align,
            color,
        },
    })
}

fn number_value(value: JsonValue, context: Option<&str>) -> ConfigResult<NumberValue> {
    match value {
        JsonValue::Number(n) => Ok(NumberValue::Static(n.as_f64().unwrap_or(f64::NAN))),
        JsonValue::String(s) => Ok(NumberValue::Template(s)),
        _ => Err(invalid(context, "'value' is not a number or string")),
    }
}

fn load_number_widget(config: JsonValue) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("number widget");

    let mut map = as_object(config, CONTEXT)?;
    ensure_one_of(&map, CONTEXT, &["issue_query", "value", "script"])?;

    let title = take_string(&mut map, CONTEXT, "title")?;
    let url = take_string(&mut map, CONTEXT, "url")?;
    let color = take_string(&mut map, CONTEXT, "color")?;
    let value = take(&mut map, "value");
    let script = take_string(&mut map, CONTEXT, "script")?;
    let query = take_string(&mut map, CONTEXT, "issue_query")?;

    ensure_empty(&map, CONTEXT)?;

    Ok(if let Some(query) = query {
        Widget::QueryNumber {
            title,
            url,
            query_type: QueryType::Issue,
            query,
            color,
        }
    } else if let Some(script) = script {
        Widget::ScriptNumber {
            title,
            url,
            script,
            color,
        }
    } else {
        Widget::Number {
            title,
            url,
            value: number_value(value.unwrap_or(JsonValue::Null), CONTEXT)?,
            color,
        }
    })
}

fn load_graph_widget(config: JsonValue) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("graph widget");
    const ELEMENT: Option<&str> = Some("graph widget element");

    let mut map = as_object(config, CONTEXT)?;

    let title = take_string(&mut map, CONTEXT, "title")?;
    let url = take_string(&mut map, CONTEXT, "url")?;
    let elements_config = take_required(&mut map, CONTEXT, "elements")?;

    ensure_empty(&map, CONTEXT)?;

    let elements_config = match elements_config {
        JsonValue::Array(elements) => elements,
        _ => return Err(invalid(CONTEXT, "'elements' is not an array")),
    };

    let mut elements = Vec::with_capacity(elements_config.len());
    for element in elements_config {
        let mut map = as_object(element, ELEMENT)?;
        ensure_one_of(&map, ELEMENT, &["issue_query", "value"])?;

        let title = take_string(&mut map, ELEMENT, "title")?;
        let url = take_string(&mut map, ELEMENT, "url")?;
        let color = take_string(&mut map, ELEMENT, "color")?;
        let query = take_string(&mut map, ELEMENT, "issue_query")?;
        let value = take(&mut map, "value");

        ensure_empty(&map, ELEMENT)?;

        elements.push(match query {
            Some(query) => Widget::QueryNumber {
                title,
                url,
                query_type: QueryType::Issue,
                query,
                color,
            },
            None => Widget::Number {
                title,
                url,
                value: number_value(value.unwrap_or(JsonValue::Null), ELEMENT)?,
                color,
            },
        });
    }

    Ok(Widget::Graph {
        title,
        url,
        elements,
    })
}

fn load_table_field(config: JsonValue) -> ConfigResult<TableField> {
    const CONTEXT: Option<&str> = Some("table widget field");

    // A bare string names a property.
    let mut map = match config {
        JsonValue::String(property) => {
            return Ok(TableField {
                title: None,
                property: Some(property),
                value: None,
            })
        }
        other => as_object(other, CONTEXT)?,
    };

    let field = TableField {
        title: take_string(&mut map, CONTEXT, "title")?,
        property: take_string(&mut map, CONTEXT, "property")?,
        value: take_string(&mut map, CONTEXT, "value")?,
    };

    ensure_empty(&map, CONTEXT)?;
    Ok(field)
}

fn load_query_table_widget(mut map: Map<String, JsonValue>) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("table widget");

    let title = take_string(&mut map, CONTEXT, "title")?;
    let url = take_string(&mut map, CONTEXT, "url")?;
    let fields_config = take(&mut map, "fields");
    let query = take_string(&mut map, CONTEXT, "issue_query")?
        .ok_or_else(|| ConfigError::MissingOption {
            context: CONTEXT.map(str::to_string),
            key: "issue_query".to_string(),
        })?;
    let limit = match take(&mut map, "limit") {
        None => None,
        Some(JsonValue::Number(n)) => match n.as_u64() {
            Some(limit) => Some(limit as usize),
            None => return Err(invalid(CONTEXT, "'limit' is not a non-negative integer")),
        },
        Some(_) => return Err(invalid(CONTEXT, "'limit' is not a non-negative integer")),
    };

    ensure_empty(&map, CONTEXT)?;

    let fields = match fields_config {
        None => None,
        Some(JsonValue::Array(fields)) => Some(
            fields
                .into_iter()
                .map(load_table_field)
                .collect::<ConfigResult<Vec<_>>>()?,
        ),
        Some(_) => return Err(invalid(CONTEXT, "'fields' is not an array")),
    };

    Ok(Widget::QueryTable {
        title,
        url,
        query_type: QueryType::Issue,
        query,
        limit,
        fields,
    })
}

fn load_static_table_widget(mut map: Map<String, JsonValue>) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("table widget");

    let title = take_string(&mut map, CONTEXT, "title")?;
    let url = take_string(&mut map, CONTEXT, "url")?;
    let headers_config = take(&mut map, "headers");
    let elements_config = take_required(&mut map, CONTEXT, "elements")?;

    ensure_empty(&map, CONTEXT)?;

    // A single header is accepted in place of a one-element list.
    let headers = match headers_config {
        None => Vec::new(),
        Some(JsonValue::Array(headers)) => headers
            .into_iter()
            .map(load_string_widget)
            .collect::<ConfigResult<Vec<_>>>()?,
        Some(single) => vec![load_string_widget(single)?],
    };

    let elements_config = match elements_config {
        JsonValue::Array(rows) => rows,
        _ => return Err(invalid(CONTEXT, "'elements' is not an array")),
    };

    let mut elements = Vec::with_capacity(elements_config.len());
    for row in elements_config {
        elements.push(match row {
            JsonValue::Array(cells) => cells
                .into_iter()
                .map(load_string_widget)
                .collect::<ConfigResult<Vec<_>>>()?,
            single => vec![load_string_widget(single)?],
        });
    }

    Ok(Widget::Table {
        title,
        url,
        headers,
        elements,
    })
}

fn load_table_widget(config: JsonValue) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("table widget");

    let map = as_object(config, CONTEXT)?;
    ensure_one_of(&map, CONTEXT, &["issue_query", "elements"])?;

    if matches!(map.get("issue_query"), Some(v) if !v.is_null()) {
        load_query_table_widget(map)
    } else {
        load_static_table_widget(map)
    }
}

fn load_widget(config: JsonValue) -> ConfigResult<Widget> {
    const CONTEXT: Option<&str> = Some("widget");

    let mut map = as_object(config, CONTEXT)?;
    let widget_type = take_required(&mut map, CONTEXT, "type")?;
    let widget_type = scalar_to_string(&widget_type)
        .ok_or_else(|| invalid(CONTEXT, "'type' is not a string"))?;

    match widget_type.as_str() {
        "number" => load_number_widget(JsonValue::Object(map)),
        "string" => load_string_widget(JsonValue::Object(map)),
        "graph" => load_graph_widget(JsonValue::Object(map)),
        "table" => load_table_widget(JsonValue::Object(map)),
        other => Err(invalid(CONTEXT, format!("invalid type '{}'", other))),
    }
}

fn load_section(config: JsonValue) -> ConfigResult<Section> {
    const CONTEXT: Option<&str> = Some("section");

    let mut map = as_object(config, CONTEXT)?;

    let title = take_string(&mut map, CONTEXT, "title")?;
    let description = take_string(&mut map, CONTEXT, "description")?;
    let widgets_config = take(&mut map, "widgets");

    ensure_empty(&map, CONTEXT)?;

    let widgets = match widgets_config {
        None => Vec::new(),
        Some(JsonValue::Array(widgets)) => widgets
            .into_iter()
            .map(load_widget)
            .collect::<ConfigResult<Vec<_>>>()?,
        Some(_) => return Err(invalid(CONTEXT, "'widgets' is not an array")),
    };

    Ok(Section {
        title,
        description,
        widgets,
    })
}

fn load_output(config: JsonValue) -> ConfigResult<OutputConfig> {
    const CONTEXT: Option<&str> = Some("output");

    let mut map = as_object(config, CONTEXT)?;

    let format = take_required(&mut map, CONTEXT, "format")?;
    let format = scalar_to_string(&format)
        .ok_or_else(|| invalid(CONTEXT, "'format' is not a string"))?;
    let format = match format.as_str() {
        "markdown" => OutputFormat::Markdown,
        "html" => OutputFormat::Html,
        // "json" is the historical name for the Slack webhook payload.
        "slack" | "json" => OutputFormat::Slack,
        other => return Err(invalid(CONTEXT, format!("invalid format '{}'", other))),
    };

    let filename = take_string(&mut map, CONTEXT, "filename")?;

    ensure_empty(&map, CONTEXT)?;

    Ok(OutputConfig { format, filename })
}

fn load_dashboard(config: JsonValue) -> ConfigResult<DashboardConfig> {
    let mut map = as_object(config, None)?;

    let title = take_string(&mut map, None, "title")?;
    let description = take_string(&mut map, None, "description")?;
    let setup = take_string(&mut map, None, "setup")?;
    let shutdown = take_string(&mut map, None, "shutdown")?;
    let output_config = take_required(&mut map, None, "output")?;
    let sections_config = take(&mut map, "sections");

    ensure_empty(&map, None)?;

    let sections = match sections_config {
        None => Vec::new(),
        Some(JsonValue::Array(sections)) => sections
            .into_iter()
            .map(load_section)
            .collect::<ConfigResult<Vec<_>>>()?,
        Some(_) => return Err(invalid(None, "'sections' is not an array")),
    };

    Ok(DashboardConfig {
        dashboard: Dashboard {
            title,
            description,
            sections,
            setup,
            shutdown,
        },
        output: load_output(output_config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = "\
title: 'Project health'
output:
  format: markdown
sections:
  - title: 'Issues'
    widgets:
      - type: number
        title: 'Open'
        issue_query: 'repo:foo/bar is:open'
";

    #[test]
    fn test_load_yaml_config() {
        let config = DashboardConfig::load(MINIMAL_YAML).unwrap();

        assert_eq!(config.dashboard.title.as_deref(), Some("Project health"));
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert_eq!(config.output.filename, None);

        let section = &config.dashboard.sections[0];
        assert_eq!(section.title.as_deref(), Some("Issues"));
        assert_eq!(
            section.widgets[0],
            Widget::QueryNumber {
                title: Some("Open".to_string()),
                url: None,
                query_type: QueryType::Issue,
                query: "repo:foo/bar is:open".to_string(),
                color: None,
            }
        );
    }

    #[test]
    fn test_load_json_config() {
        let config = DashboardConfig::load(
            r#"{
                "output": { "format": "html", "filename": "dashboard.html" },
                "sections": [
                    { "widgets": [ { "type": "number", "value": 42 } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output.format, OutputFormat::Html);
        assert_eq!(config.output.filename.as_deref(), Some("dashboard.html"));
        assert_eq!(
            config.dashboard.sections[0].widgets[0],
            Widget::Number {
                title: None,
                url: None,
                value: NumberValue::Static(42.0),
                color: None,
            }
        );
    }

    #[test]
    fn test_number_value_string_becomes_template() {
        let config = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: number\n",
            "    value: '{{ userdata.count }}'\n",
        ))
        .unwrap();

        assert_eq!(
            config.dashboard.sections[0].widgets[0],
            Widget::Number {
                title: None,
                url: None,
                value: NumberValue::Template("{{ userdata.count }}".to_string()),
                color: None,
            }
        );
    }

    #[test]
    fn test_string_widget_shorthand() {
        let widget = load_string_widget(JsonValue::String("hello".to_string())).unwrap();
        assert_eq!(
            widget,
            Widget::String {
                title: None,
                url: None,
                value: "hello".to_string(),
                align: None,
                color: None,
            }
        );
    }

    #[test]
    fn test_missing_output_is_error() {
        let err = DashboardConfig::load("title: 'x'").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingOption {
                context: None,
                key: "output".to_string()
            }
        );
    }

    #[test]
    fn test_unexpected_option_is_error() {
        let err = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: number\n",
            "    value: 1\n",
            "    bogus: true\n",
        ))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnexpectedOption {
                context: Some("number widget".to_string()),
                key: "bogus".to_string()
            }
        );
    }

    #[test]
    fn test_conflicting_widget_sources_is_error() {
        let err = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: number\n",
            "    value: 1\n",
            "    issue_query: 'is:open'\n",
        ))
        .unwrap_err();

        assert!(matches!(err, ConfigError::ConflictingOptions { .. }));
    }

    #[test]
    fn test_widget_requires_a_source() {
        let err = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: number\n",
            "    title: 'no value'\n",
        ))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::ExpectedOneOf {
                context: Some("number widget".to_string()),
                keys: vec![
                    "issue_query".to_string(),
                    "value".to_string(),
                    "script".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_invalid_widget_type_is_error() {
        let err = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: gauge\n",
            "    value: 1\n",
        ))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                context: Some("widget".to_string()),
                message: "invalid type 'gauge'".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_output_format_is_error() {
        let err = DashboardConfig::load("output: { format: pdf }").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                context: Some("output".to_string()),
                message: "invalid format 'pdf'".to_string()
            }
        );
    }

    #[test]
    fn test_load_table_widgets() {
        let config = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: table\n",
            "    issue_query: 'is:open'\n",
            "    limit: 5\n",
            "    fields:\n",
            "    - title: 'Issue'\n",
            "      property: number\n",
            "    - title: 'Summary'\n",
            "      value: '{{ item.title }}'\n",
            "  - type: table\n",
            "    headers: 'Name'\n",
            "    elements:\n",
            "    - 'row one'\n",
            "    - [ 'row two' ]\n",
        ))
        .unwrap();

        let widgets = &config.dashboard.sections[0].widgets;

        match &widgets[0] {
            Widget::QueryTable { limit, fields, .. } => {
                assert_eq!(*limit, Some(5));
                let fields = fields.as_ref().unwrap();
                assert_eq!(fields[0].property.as_deref(), Some("number"));
                assert_eq!(fields[1].value.as_deref(), Some("{{ item.title }}"));
            }
            other => panic!("expected query table, got {:?}", other),
        }

        match &widgets[1] {
            Widget::Table {
                headers, elements, ..
            } => {
                assert_eq!(headers.len(), 1);
                assert_eq!(elements.len(), 2);
                assert_eq!(elements[1].len(), 1);
            }
            other => panic!("expected static table, got {:?}", other),
        }
    }

    #[test]
    fn test_graph_widget_elements() {
        let config = DashboardConfig::load(concat!(
            "output: { format: markdown }\n",
            "sections:\n",
            "- widgets:\n",
            "  - type: graph\n",
            "    title: 'Breakdown'\n",
            "    elements:\n",
            "    - title: 'Bugs'\n",
            "      issue_query: 'is:open label:bug'\n",
            "    - title: 'Fixed'\n",
            "      value: 3\n",
        ))
        .unwrap();

        match &config.dashboard.sections[0].widgets[0] {
            Widget::Graph { elements, .. } => {
                assert!(matches!(elements[0], Widget::QueryNumber { .. }));
                assert!(matches!(elements[1], Widget::Number { .. }));
            }
            other => panic!("expected graph widget, got {:?}", other),
        }
    }

    #[test]
    fn test_error_messages_name_context_and_key() {
        let err = ConfigError::MissingOption {
            context: Some("table widget".to_string()),
            key: "issue_query".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration for table widget: missing required option 'issue_query'"
        );

        let err = ConfigError::ExpectedOneOf {
            context: Some("number widget".to_string()),
            keys: vec![
                "issue_query".to_string(),
                "value".to_string(),
                "script".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration for number widget: expected one of: 'issue_query', 'value' or 'script'"
        );
    }
}
