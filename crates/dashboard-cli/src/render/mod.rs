//! Renderers for evaluated dashboards.
//!
//! Every renderer takes a fully evaluated widget tree and produces one
//! output string:
//!
//! - [`markdown`] - GitHub-flavored markdown, number widgets grouped
//!   into tables and graphs drawn with block glyphs
//! - [`html`] - a standalone page referencing `dashboard.css`
//! - [`slack`] - a Slack webhook payload carrying the number widgets
//!
//! Renderers only accept static widgets; an unevaluated query or script
//! widget in the tree is an error, not something to silently skip.

mod html;
mod markdown;
mod slack;

use dashboard_engine::{Dashboard, NumberValue, OutputFormat, Widget};
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A widget color is not one of the recognized names.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A graph element was not a number widget.
    #[error("graph element did not evaluate to a number widget")]
    GraphElementNotNumber,

    /// The tree still contains a query, script or templated widget.
    #[error("cannot render an unevaluated widget")]
    UnevaluatedWidget,

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders an evaluated dashboard in the requested format.
pub fn render(dashboard: &Dashboard, format: OutputFormat) -> RenderResult<String> {
    match format {
        OutputFormat::Markdown => markdown::render(dashboard),
        OutputFormat::Html => html::render(dashboard),
        OutputFormat::Slack => slack::render(dashboard),
    }
}

/// The recognized widget colors, as emoji for text output.
pub(crate) fn render_color(color: &str) -> RenderResult<&'static str> {
    match color {
        "red" => Ok("\u{1f534}"),
        "yellow" => Ok("\u{1f49b}"),
        "green" => Ok("\u{2705}"),
        "blue" => Ok("\u{1f537}"),
        "black" => Ok("\u{2b1b}\u{fe0f}"),
        other => Err(RenderError::InvalidColor(other.to_string())),
    }
}

/// Extracts the static value from an evaluated number widget.
pub(crate) fn static_number(value: &NumberValue) -> RenderResult<f64> {
    match value {
        NumberValue::Static(n) => Ok(*n),
        NumberValue::Template(_) => Err(RenderError::UnevaluatedWidget),
    }
}

/// A static table cell: number and string widgets render the same way
/// once evaluated, modulo alignment.
pub(crate) struct Cell<'a> {
    pub value: String,
    pub url: Option<&'a str>,
    pub color: Option<&'a str>,
    pub align: Option<&'a str>,
}

pub(crate) fn scalar_cell(widget: &Widget) -> RenderResult<Cell<'_>> {
    match widget {
        Widget::Number {
            url, value, color, ..
        } => Ok(Cell {
            value: dashboard_engine::script::format_number(static_number(value)?),
            url: url.as_deref(),
            color: color.as_deref(),
            align: None,
        }),
        Widget::String {
            url,
            value,
            align,
            color,
            ..
        } => Ok(Cell {
            value: value.clone(),
            url: url.as_deref(),
            color: color.as_deref(),
            align: align.as_deref(),
        }),
        _ => Err(RenderError::UnevaluatedWidget),
    }
}
