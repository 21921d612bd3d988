//! The widget tree and its evaluation.
//!
//! A configured dashboard is a tree of unevaluated widgets: templated
//! values, queries and scripts. Evaluation reduces every widget to a
//! static `Number`, `String`, `Graph` or `Table` widget that a renderer
//! can emit without further work.

use futures::future::BoxFuture;
use serde_json::Value as JsonValue;

use crate::context::EvaluationContext;
use crate::error::{EvaluateError, EvaluateResult};
use crate::query::QueryType;
use crate::script::Value;

/// Query tables show ten rows unless the configuration says otherwise.
const DEFAULT_TABLE_LIMIT: usize = 10;

/// A number widget's value: either a literal from the configuration or
/// a template still to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    Static(f64),
    Template(String),
}

/// One column of a query table.
///
/// A field renders either a `value` template (with the query item bound
/// as `item`) or a raw `property` of the item. The header label falls
/// back from `title` to `value` to `property`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableField {
    pub title: Option<String>,
    pub property: Option<String>,
    pub value: Option<String>,
}

impl TableField {
    fn header_label(&self) -> String {
        self.title
            .as_deref()
            .or(self.value.as_deref())
            .or(self.property.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// A dashboard widget.
///
/// `Number`, `String`, `Graph` and `Table` are the static forms that
/// renderers understand; the other variants carry queries or scripts
/// and evaluate down to a static form.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// A numeric value, literal or templated.
    Number {
        title: Option<String>,
        url: Option<String>,
        value: NumberValue,
        color: Option<String>,
    },

    /// The total count of a search query, shown as a number.
    QueryNumber {
        title: Option<String>,
        url: Option<String>,
        query_type: QueryType,
        query: String,
        color: Option<String>,
    },

    /// A script whose result is shown as a number.
    ScriptNumber {
        title: Option<String>,
        url: Option<String>,
        script: String,
        color: Option<String>,
    },

    /// A string value, possibly templated.
    String {
        title: Option<String>,
        url: Option<String>,
        value: String,
        align: Option<String>,
        color: Option<String>,
    },

    /// A script whose result is shown as a string.
    ScriptString {
        title: Option<String>,
        url: Option<String>,
        script: String,
        align: Option<String>,
        color: Option<String>,
    },

    /// A bar graph of number widgets.
    Graph {
        title: Option<String>,
        url: Option<String>,
        elements: Vec<Widget>,
    },

    /// A table with explicit headers and cell widgets.
    Table {
        title: Option<String>,
        url: Option<String>,
        headers: Vec<Widget>,
        elements: Vec<Vec<Widget>>,
    },

    /// A table whose rows come from a search query.
    QueryTable {
        title: Option<String>,
        url: Option<String>,
        query_type: QueryType,
        query: String,
        limit: Option<usize>,
        fields: Option<Vec<TableField>>,
    },
}

/// Number templates coerce leniently: surrounding whitespace is ignored,
/// an empty result is zero, anything non-numeric is NaN.
fn coerce_template_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse().unwrap_or(f64::NAN)
    }
}

/// Script results coerce strictly: a number passes through, anything
/// else must stringify to plain digits or it becomes NaN.
fn coerce_script_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        other => {
            let text = other.to_string();
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                text.parse().unwrap_or(f64::NAN)
            } else {
                f64::NAN
            }
        }
    }
}

/// Metadata a script can supply alongside its value by returning an
/// object with a truthy `value` key.
struct ScriptOverrides {
    title: Option<String>,
    url: Option<String>,
    color: Option<String>,
}

/// Splits a script result into its value and any metadata overrides.
fn split_script_result(result: Value) -> (Value, ScriptOverrides) {
    let mut overrides = ScriptOverrides {
        title: None,
        url: None,
        color: None,
    };

    if result.get("value").is_some_and(Value::truthy) {
        let stringify = |v: Option<&Value>| match v {
            Some(Value::Null) | None => None,
            Some(v) => Some(v.to_string()),
        };

        overrides.title = stringify(result.get("title"));
        overrides.url = stringify(result.get("url"));
        overrides.color = stringify(result.get("color"));

        let value = result.get("value").cloned().unwrap_or(Value::Null);
        return (value, overrides);
    }

    (result, overrides)
}

fn require_number(widget: Widget) -> EvaluateResult<Widget> {
    match widget {
        Widget::Number { .. } => Ok(widget),
        _ => Err(EvaluateError::GraphElementNotNumber),
    }
}

fn require_scalar(widget: Widget) -> EvaluateResult<Widget> {
    match widget {
        Widget::Number { .. } | Widget::String { .. } => Ok(widget),
        _ => Err(EvaluateError::TableElementNotScalar),
    }
}

impl Widget {
    /// Reduces this widget to its static form: queries run, scripts
    /// execute, templates resolve.
    ///
    /// Composite widgets evaluate their children sequentially, so
    /// query caching and `userdata` behave deterministically.
    pub fn evaluate<'a, 'b: 'a>(
        &'a self,
        ctx: &'a mut EvaluationContext<'b>,
    ) -> BoxFuture<'a, EvaluateResult<Widget>> {
        Box::pin(async move {
            match self {
                Widget::Number {
                    title,
                    url,
                    value,
                    color,
                } => {
                    let value = match value {
                        NumberValue::Static(n) => *n,
                        NumberValue::Template(template) => {
                            coerce_template_number(&ctx.resolve(template)?)
                        }
                    };
                    let bound = Value::Number(value);

                    Ok(Widget::Number {
                        title: ctx.resolve_metadata(title.as_deref(), &bound)?,
                        url: ctx.resolve_metadata(url.as_deref(), &bound)?,
                        value: NumberValue::Static(value),
                        color: ctx.resolve_metadata(color.as_deref(), &bound)?,
                    })
                }

                Widget::QueryNumber {
                    title,
                    url,
                    query_type,
                    query,
                    color,
                } => {
                    let results = ctx.run_query(*query_type, query, 0).await?;
                    let value = results.total_count as f64;
                    let bound = Value::Number(value);

                    let url = match url {
                        Some(url) => ctx.resolve_metadata(Some(url), &bound)?,
                        None => Some(results.url),
                    };

                    Ok(Widget::Number {
                        title: ctx.resolve_metadata(title.as_deref(), &bound)?,
                        url,
                        value: NumberValue::Static(value),
                        color: ctx.resolve_metadata(color.as_deref(), &bound)?,
                    })
                }

                Widget::ScriptNumber {
                    title,
                    url,
                    script,
                    color,
                } => {
                    let result = ctx.run_script(script)?;
                    let (result, overrides) = split_script_result(result);

                    let value = coerce_script_number(&result);
                    let bound = Value::Number(value);

                    let title = match overrides.title {
                        Some(title) => Some(title),
                        None => ctx.resolve_metadata(title.as_deref(), &bound)?,
                    };
                    let url = match overrides.url {
                        Some(url) => Some(url),
                        None => ctx.resolve_metadata(url.as_deref(), &bound)?,
                    };
                    let color = match overrides.color {
                        Some(color) => Some(color),
                        None => ctx.resolve_metadata(color.as_deref(), &bound)?,
                    };

                    Ok(Widget::Number {
                        title,
                        url,
                        value: NumberValue::Static(value),
                        color,
                    })
                }

                Widget::String {
                    title,
                    url,
                    value,
                    align,
                    color,
                } => {
                    let value = ctx.resolve(value)?;
                    let bound = Value::String(value.clone());

                    Ok(Widget::String {
                        title: ctx.resolve_metadata(title.as_deref(), &bound)?,
                        url: ctx.resolve_metadata(url.as_deref(), &bound)?,
                        value,
                        align: ctx.resolve_metadata(align.as_deref(), &bound)?,
                        color: ctx.resolve_metadata(color.as_deref(), &bound)?,
                    })
                }

                Widget::ScriptString {
                    title,
                    url,
                    script,
                    align,
                    color,
                } => {
                    let result = ctx.run_script(script)?;
                    let (result, overrides) = split_script_result(result);

                    let value = result.to_string();
                    let bound = Value::String(value.clone());

                    let title = match overrides.title {
                        Some(title) => Some(title),
                        None => ctx.resolve_metadata(title.as_deref(), &bound)?,
                    };
                    let url = match overrides.url {
                        Some(url) => Some(url),
                        None => ctx.resolve_metadata(url.as_deref(), &bound)?,
                    };
                    let color = match overrides.color {
                        Some(color) => Some(color),
                        None => ctx.resolve_metadata(color.as_deref(), &bound)?,
                    };

                    Ok(Widget::String {
                        title,
                        url,
                        value,
                        align: ctx.resolve_metadata(align.as_deref(), &bound)?,
                        color,
                    })
                }

                Widget::Graph {
                    title,
                    url,
                    elements,
                } => {
                    let mut evaluated = Vec::with_capacity(elements.len());
                    for element in elements {
                        evaluated.push(require_number(element.evaluate(ctx).await?)?);
                    }

                    Ok(Widget::Graph {
                        title: ctx.resolve_optional(title.as_deref())?,
                        url: ctx.resolve_optional(url.as_deref())?,
                        elements: evaluated,
                    })
                }

                Widget::Table {
                    title,
                    url,
                    headers,
                    elements,
                } => {
                    let mut evaluated_headers = Vec::with_capacity(headers.len());
                    for header in headers {
                        evaluated_headers.push(require_scalar(header.evaluate(ctx).await?)?);
                    }

                    let mut rows = Vec::with_capacity(elements.len());
                    for row in elements {
                        let mut cells = Vec::with_capacity(row.len());
                        for cell in row {
                            cells.push(require_scalar(cell.evaluate(ctx).await?)?);
                        }
                        rows.push(cells);
                    }

                    Ok(Widget::Table {
                        title: ctx.resolve_optional(title.as_deref())?,
                        url: ctx.resolve_optional(url.as_deref())?,
                        headers: evaluated_headers,
                        elements: rows,
                    })
                }

                Widget::QueryTable {
                    title,
                    url,
                    query_type,
                    query,
                    limit,
                    fields,
                } => {
                    let limit = limit.unwrap_or(DEFAULT_TABLE_LIMIT);
                    let fields = match fields {
                        Some(fields) => fields.clone(),
                        None => default_fields(*query_type),
                    };

                    let results = ctx.run_query(*query_type, query, limit).await?;

                    let headers = fields
                        .iter()
                        .map(|field| string_cell(field.header_label(), None))
                        .collect();

                    let mut rows = Vec::with_capacity(results.items.len());
                    for item in &results.items {
                        rows.push(table_row(ctx, &fields, item)?);
                    }

                    let url = match url {
                        Some(url) => Some(ctx.resolve(url)?),
                        None => Some(results.url),
                    };

                    Ok(Widget::Table {
                        title: ctx.resolve_optional(title.as_deref())?,
                        url,
                        headers,
                        elements: rows,
                    })
                }
            }
        })
    }
}

/// Default query table columns per query type.
fn default_fields(query_type: QueryType) -> Vec<TableField> {
    match query_type {
        QueryType::Issue => vec![
            TableField {
                title: Some("Issue".to_string()),
                property: Some("number".to_string()),
                value: None,
            },
            TableField {
                title: Some("Title".to_string()),
                property: Some("title".to_string()),
                value: None,
            },
        ],
    }
}

fn string_cell(value: String, url: Option<String>) -> Widget {
    Widget::String {
        title: None,
        url,
        value,
        align: None,
        color: None,
    }
}

/// Builds one table row: each cell links to the item it came from.
fn table_row(
    ctx: &EvaluationContext<'_>,
    fields: &[TableField],
    item: &JsonValue,
) -> EvaluateResult<Vec<Widget>> {
    let item_url = dashboard_api::SearchResults::item_url(item).map(str::to_string);

    let mut cells = Vec::with_capacity(fields.len());
    for field in fields {
        let text = match &field.value {
            Some(template) => ctx.resolve_item_value(template, item)?,
            None => {
                let property = field.property.as_deref().unwrap_or_default();
                // A property the item lacks renders as an empty cell.
                item.get(property)
                    .map(|v| Value::from(v).to_string())
                    .unwrap_or_default()
            }
        };

        cells.push(string_cell(text, item_url.clone()));
    }

    Ok(cells)
}

/// A titled group of widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: Option<String>,
    pub description: Option<String>,
    pub widgets: Vec<Widget>,
}

impl Section {
    pub async fn evaluate(
        &self,
        ctx: &mut EvaluationContext<'_>,
    ) -> EvaluateResult<Section> {
        let mut widgets = Vec::with_capacity(self.widgets.len());
        for widget in &self.widgets {
            widgets.push(widget.evaluate(ctx).await?);
        }

        Ok(Section {
            title: ctx.resolve_optional(self.title.as_deref())?,
            description: ctx.resolve_optional(self.description.as_deref())?,
            widgets,
        })
    }
}

/// A full dashboard: optional setup and shutdown scripts bracketing a
/// list of sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<Section>,
    pub setup: Option<String>,
    pub shutdown: Option<String>,
}

impl Dashboard {
    /// Evaluates the whole tree: setup script, then each section in
    /// order, then the dashboard's own metadata, then the shutdown
    /// script. The result carries no scripts.
    pub async fn evaluate(
        &self,
        ctx: &mut EvaluationContext<'_>,
    ) -> EvaluateResult<Dashboard> {
        if let Some(setup) = &self.setup {
            ctx.run_script(setup)?;
        }

        let mut sections = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            sections.push(section.evaluate(ctx).await?);
        }

        let title = ctx.resolve_optional(self.title.as_deref())?;
        let description = ctx.resolve_optional(self.description.as_deref())?;

        if let Some(shutdown) = &self.shutdown {
            ctx.run_script(shutdown)?;
        }

        Ok(Dashboard {
            title,
            description,
            sections,
            setup: None,
            shutdown: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ItemSearcher;
    use crate::script::FormulaHost;
    use async_trait::async_trait;
    use dashboard_api::SearchResults;
    use serde_json::json;

    struct FixedSearcher {
        total_count: u64,
        items: Vec<JsonValue>,
    }

    #[async_trait]
    impl ItemSearcher for FixedSearcher {
        async fn search(
            &self,
            _query_type: QueryType,
            _query: &str,
            _per_page: u32,
            _page: u32,
        ) -> dashboard_api::Result<SearchResults> {
            Ok(SearchResults {
                total_count: self.total_count,
                incomplete_results: false,
                items: self.items.clone(),
            })
        }
    }

    const HOST: FormulaHost = FormulaHost;

    fn empty_searcher() -> FixedSearcher {
        FixedSearcher {
            total_count: 0,
            items: Vec::new(),
        }
    }

    fn number(value: NumberValue) -> Widget {
        Widget::Number {
            title: None,
            url: None,
            value,
            color: None,
        }
    }

    #[tokio::test]
    async fn test_number_widget_static_value() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = number(NumberValue::Static(5.0));
        let result = widget.evaluate(&mut ctx).await.unwrap();

        assert_eq!(result, number(NumberValue::Static(5.0)));
    }

    #[tokio::test]
    async fn test_number_widget_template_coercion() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let cases = [
            ("{{ 21 * 2 }}", 42.0),
            ("  17  ", 17.0),
            ("", 0.0),
        ];

        for (template, expected) in cases {
            let widget = number(NumberValue::Template(template.to_string()));
            match widget.evaluate(&mut ctx).await.unwrap() {
                Widget::Number {
                    value: NumberValue::Static(n),
                    ..
                } => assert_eq!(n, expected, "template {:?}", template),
                other => panic!("expected number widget, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_number_widget_bad_template_is_nan() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = number(NumberValue::Template("not a number".to_string()));
        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number {
                value: NumberValue::Static(n),
                ..
            } => assert!(n.is_nan()),
            other => panic!("expected number widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_number_widget_color_sees_value() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::Number {
            title: None,
            url: None,
            value: NumberValue::Static(12.0),
            color: Some("{{ value > 10 ? 'red' : 'green' }}".to_string()),
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number { color, .. } => assert_eq!(color.as_deref(), Some("red")),
            other => panic!("expected number widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_number_widget_uses_total_count() {
        let searcher = FixedSearcher {
            total_count: 38,
            items: Vec::new(),
        };
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::QueryNumber {
            title: Some("Open issues".to_string()),
            url: None,
            query_type: QueryType::Issue,
            query: "repo:foo/bar is:open".to_string(),
            color: None,
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number {
                title, url, value, ..
            } => {
                assert_eq!(title.as_deref(), Some("Open issues"));
                assert_eq!(value, NumberValue::Static(38.0));
                // Without an explicit url the widget links to the search.
                assert_eq!(
                    url.as_deref(),
                    Some("https://github.com/foo/bar/issues?q=is%3Aopen")
                );
            }
            other => panic!("expected number widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_script_number_widget_coercion() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::ScriptNumber {
            title: None,
            url: None,
            script: "6 * 7".to_string(),
            color: None,
        };
        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number { value, .. } => assert_eq!(value, NumberValue::Static(42.0)),
            other => panic!("expected number widget, got {:?}", other),
        }

        let widget = Widget::ScriptNumber {
            title: None,
            url: None,
            script: "'123'".to_string(),
            color: None,
        };
        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number { value, .. } => assert_eq!(value, NumberValue::Static(123.0)),
            other => panic!("expected number widget, got {:?}", other),
        }

        let widget = Widget::ScriptNumber {
            title: None,
            url: None,
            script: "'12 monkeys'".to_string(),
            color: None,
        };
        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number {
                value: NumberValue::Static(n),
                ..
            } => assert!(n.is_nan()),
            other => panic!("expected number widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_script_widget_object_result_overrides_metadata() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::ScriptNumber {
            title: Some("configured title".to_string()),
            url: None,
            script: "{ value: 7, title: 'scripted title', color: 'blue' }".to_string(),
            color: Some("red".to_string()),
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Number {
                title,
                value,
                color,
                ..
            } => {
                assert_eq!(title.as_deref(), Some("scripted title"));
                assert_eq!(value, NumberValue::Static(7.0));
                assert_eq!(color.as_deref(), Some("blue"));
            }
            other => panic!("expected number widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_string_widget_resolves_template() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);
        ctx.run_script("userdata.name = 'world'").unwrap();

        let widget = Widget::String {
            title: None,
            url: None,
            value: "hello {{ userdata.name }}".to_string(),
            align: Some("center".to_string()),
            color: None,
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::String { value, align, .. } => {
                assert_eq!(value, "hello world");
                assert_eq!(align.as_deref(), Some("center"));
            }
            other => panic!("expected string widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_script_string_widget_stringifies_result() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::ScriptString {
            title: None,
            url: None,
            script: "6 * 7".to_string(),
            align: None,
            color: None,
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::String { value, .. } => assert_eq!(value, "42"),
            other => panic!("expected string widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_graph_widget_requires_number_elements() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::Graph {
            title: Some("Counts".to_string()),
            url: None,
            elements: vec![
                number(NumberValue::Static(1.0)),
                number(NumberValue::Template("{{ 2 * 2 }}".to_string())),
            ],
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Graph {
                title, elements, ..
            } => {
                assert_eq!(title.as_deref(), Some("Counts"));
                assert_eq!(elements.len(), 2);
                assert_eq!(elements[1], number(NumberValue::Static(4.0)));
            }
            other => panic!("expected graph widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_graph_rejects_string_elements() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::Graph {
            title: None,
            url: None,
            elements: vec![
                number(NumberValue::Static(1.0)),
                Widget::String {
                    title: None,
                    url: None,
                    value: "not a number".to_string(),
                    align: None,
                    color: None,
                },
            ],
        };

        let err = widget.evaluate(&mut ctx).await.unwrap_err();
        assert!(matches!(err, EvaluateError::GraphElementNotNumber));
    }

    #[tokio::test]
    async fn test_table_rejects_graph_cells() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::Table {
            title: None,
            url: None,
            headers: Vec::new(),
            elements: vec![vec![Widget::Graph {
                title: None,
                url: None,
                elements: Vec::new(),
            }]],
        };

        let err = widget.evaluate(&mut ctx).await.unwrap_err();
        assert!(matches!(err, EvaluateError::TableElementNotScalar));
    }

    #[tokio::test]
    async fn test_query_table_default_fields_and_item_links() {
        let searcher = FixedSearcher {
            total_count: 2,
            items: vec![
                json!({
                    "number": 4,
                    "title": "Crash on startup",
                    "html_url": "https://github.com/foo/bar/issues/4"
                }),
                json!({
                    "number": 9,
                    "title": "Slow render",
                    "html_url": "https://github.com/foo/bar/issues/9"
                }),
            ],
        };
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::QueryTable {
            title: None,
            url: None,
            query_type: QueryType::Issue,
            query: "repo:foo/bar is:open".to_string(),
            limit: None,
            fields: None,
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Table {
                headers, elements, ..
            } => {
                assert_eq!(headers.len(), 2);
                assert_eq!(headers[0], string_cell("Issue".to_string(), None));
                assert_eq!(headers[1], string_cell("Title".to_string(), None));

                assert_eq!(elements.len(), 2);
                assert_eq!(
                    elements[0][0],
                    string_cell(
                        "4".to_string(),
                        Some("https://github.com/foo/bar/issues/4".to_string())
                    )
                );
                assert_eq!(
                    elements[1][1],
                    string_cell(
                        "Slow render".to_string(),
                        Some("https://github.com/foo/bar/issues/9".to_string())
                    )
                );
            }
            other => panic!("expected table widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_table_value_fields_bind_item() {
        let searcher = FixedSearcher {
            total_count: 1,
            items: vec![json!({
                "number": 12,
                "title": "Leaky abstraction",
                "html_url": "https://github.com/foo/bar/issues/12"
            })],
        };
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::QueryTable {
            title: None,
            url: None,
            query_type: QueryType::Issue,
            query: "repo:foo/bar is:open".to_string(),
            limit: Some(5),
            fields: Some(vec![TableField {
                title: Some("Summary".to_string()),
                property: None,
                value: Some("#{{ item.number }} {{ item.title }}".to_string()),
            }]),
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Table { elements, .. } => {
                assert_eq!(
                    elements[0][0],
                    string_cell(
                        "#12 Leaky abstraction".to_string(),
                        Some("https://github.com/foo/bar/issues/12".to_string())
                    )
                );
            }
            other => panic!("expected table widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_table_missing_property_is_empty_cell() {
        let searcher = FixedSearcher {
            total_count: 1,
            items: vec![json!({ "number": 3 })],
        };
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let widget = Widget::QueryTable {
            title: None,
            url: None,
            query_type: QueryType::Issue,
            query: "is:open".to_string(),
            limit: None,
            fields: Some(vec![TableField {
                title: None,
                property: Some("milestone".to_string()),
                value: None,
            }]),
        };

        match widget.evaluate(&mut ctx).await.unwrap() {
            Widget::Table { elements, .. } => {
                assert_eq!(elements[0][0], string_cell(String::new(), None));
            }
            other => panic!("expected table widget, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dashboard_setup_runs_before_widgets() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let dashboard = Dashboard {
            title: Some("{{ userdata.name }} dashboard".to_string()),
            description: None,
            sections: vec![Section {
                title: None,
                description: None,
                widgets: vec![number(NumberValue::Template(
                    "{{ userdata.threshold }}".to_string(),
                ))],
            }],
            setup: Some("userdata.name = 'Build'; userdata.threshold = 3".to_string()),
            shutdown: None,
        };

        let evaluated = dashboard.evaluate(&mut ctx).await.unwrap();

        assert_eq!(evaluated.title.as_deref(), Some("Build dashboard"));
        assert_eq!(
            evaluated.sections[0].widgets[0],
            number(NumberValue::Static(3.0))
        );
        assert_eq!(evaluated.setup, None);
        assert_eq!(evaluated.shutdown, None);
    }

    #[tokio::test]
    async fn test_dashboard_fails_fast_on_bad_widget() {
        let searcher = empty_searcher();
        let mut ctx = EvaluationContext::new(&searcher, &HOST);

        let dashboard = Dashboard {
            title: None,
            description: None,
            sections: vec![Section {
                title: None,
                description: None,
                widgets: vec![
                    number(NumberValue::Template("{{ undefined_var }}".to_string())),
                    number(NumberValue::Static(1.0)),
                ],
            }],
            setup: None,
            shutdown: None,
        };

        assert!(matches!(
            dashboard.evaluate(&mut ctx).await.unwrap_err(),
            EvaluateError::Script(_)
        ));
    }
}
