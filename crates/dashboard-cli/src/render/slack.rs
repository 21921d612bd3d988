//! Slack renderer. Builds a webhook payload of block kit sections
//! carrying the number widgets; the other static widget types have no
//! sensible Slack form and are skipped.

use dashboard_engine::{Dashboard, Widget};
use serde_json::{json, Value};

use super::{render_color, scalar_cell, RenderError, RenderResult};

pub fn render(dashboard: &Dashboard) -> RenderResult<String> {
    let mut blocks: Vec<Value> = Vec::new();

    blocks.push(mrkdwn_block(&format!(
        "*{}*",
        dashboard.title.as_deref().unwrap_or("Dashboard")
    )));

    let mut first = true;
    for section in &dashboard.sections {
        if !first {
            blocks.push(json!({ "type": "divider" }));
        }
        first = false;

        blocks.push(mrkdwn_block(&format!(
            "*{}*",
            section.title.as_deref().unwrap_or_default()
        )));

        let mut lines: Vec<String> = Vec::new();
        for widget in &section.widgets {
            match widget {
                Widget::Number { title, .. } => lines.push(format!(
                    "{}: {}",
                    title.as_deref().unwrap_or_default(),
                    render_number_inline(widget)?
                )),
                Widget::String { .. } | Widget::Graph { .. } | Widget::Table { .. } => {}
                _ => return Err(RenderError::UnevaluatedWidget),
            }
        }

        blocks.push(mrkdwn_block(&lines.join("\n")));
    }

    Ok(serde_json::to_string_pretty(&json!({ "blocks": blocks }))?)
}

fn mrkdwn_block(text: &str) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text,
        }
    })
}

/// A number widget as Slack mrkdwn: colored value, linked with the
/// `<url | text>` form.
fn render_number_inline(widget: &Widget) -> RenderResult<String> {
    let cell = scalar_cell(widget)?;
    let mut out = cell.value;

    if let Some(color) = cell.color {
        out = format!("{} {}", render_color(color)?, out);
    }

    if let Some(url) = cell.url {
        out = format!("<{} | {}>", url, out);
    }

    Ok(out)
}
