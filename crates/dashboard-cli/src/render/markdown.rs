//! Markdown renderer.

use dashboard_engine::script::format_number;
use dashboard_engine::{Dashboard, Section, Widget};

use super::{render_color, scalar_cell, static_number, RenderError, RenderResult};

/// On-screen length of the longest graph bar.
const BAR_LENGTH: usize = 35;

pub fn render(dashboard: &Dashboard) -> RenderResult<String> {
    let mut md: Vec<String> = Vec::new();

    if let Some(title) = &dashboard.title {
        md.push(format!("# {}", title));
        md.push(String::new());
    }

    if let Some(description) = &dashboard.description {
        md.push(description.clone());
        md.push(String::new());
    }

    for section in &dashboard.sections {
        render_section(&mut md, section)?;
    }

    md.push(String::new());
    Ok(md.join("\n"))
}

fn render_section(md: &mut Vec<String>, section: &Section) -> RenderResult<()> {
    if let Some(title) = &section.title {
        md.push(format!("## {}", title));
        md.push(String::new());
    }

    if let Some(description) = &section.description {
        md.push(description.clone());
        md.push(String::new());
    }

    // Consecutive number widgets group into a single two-column table.
    let mut in_number_group = false;
    for widget in &section.widgets {
        if let Widget::Number { title, .. } = widget {
            if !in_number_group {
                md.push("| Query |  |".to_string());
                md.push("|:------|-:|".to_string());
                in_number_group = true;
            }

            md.push(format!(
                "| {} | {} |",
                title.as_deref().unwrap_or_default(),
                render_number_inline(widget)?
            ));
            continue;
        }

        if in_number_group {
            md.push(String::new());
            in_number_group = false;
        }

        match widget {
            Widget::String { .. } => md.push(render_string_widget(widget)?),
            Widget::Graph { .. } => md.push(render_graph_widget(widget)?),
            Widget::Table { .. } => md.push(render_table_widget(widget)?),
            _ => return Err(RenderError::UnevaluatedWidget),
        }
    }

    Ok(())
}

/// A number widget as inline markdown: colored, linked value.
fn render_number_inline(widget: &Widget) -> RenderResult<String> {
    let cell = scalar_cell(widget)?;
    let mut out = cell.value;

    if let Some(color) = cell.color {
        out = format!("{} {}", render_color(color)?, out);
    }

    if let Some(url) = cell.url {
        out = format!("[{}]({})", out, url);
    }

    Ok(out)
}

fn render_string_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::String {
        title,
        url,
        value,
        color,
        ..
    } = widget
    else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let mut out = String::new();

    if let Some(title) = title {
        out.push_str(&format!("#### {}\n\n", title));
    }

    if url.is_some() {
        out.push('[');
    }

    if let Some(color) = color {
        out.push_str(&format!("{} ", render_color(color)?));
    }

    out.push_str(value);

    if let Some(url) = url {
        out.push_str(&format!("]({})", url));
    }

    out.push('\n');
    Ok(out)
}

fn render_graph_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::Graph {
        title, elements, ..
    } = widget
    else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let mut max = 0f64;
    for element in elements {
        let Widget::Number { value, .. } = element else {
            return Err(RenderError::GraphElementNotNumber);
        };
        let value = static_number(value)?;
        if value > max {
            max = value;
        }
    }

    let min_label = format_number(0.0);
    let max_label = format_number(max);

    // The value labels sit left- and right-aligned in one column,
    // spaced apart with non-breaking spaces sized against the bar.
    let spacer_len = ((BAR_LENGTH as f64
        - (min_label.len() as f64 - max_label.len() as f64))
        * 3.75)
        .floor() as usize;
    let spacer = "&nbsp;".repeat(spacer_len);

    let mut md: Vec<String> = Vec::new();

    if let Some(title) = title {
        md.push(format!("#### {}", title));
        md.push(String::new());
    }

    md.push(format!(
        "| {} |  | {}{}{} |",
        title.as_deref().unwrap_or_default(),
        min_label,
        spacer,
        max_label
    ));
    md.push("|:------------------------------------|-:|:-------|".to_string());

    for element in elements {
        let Widget::Number { title, value, .. } = element else {
            return Err(RenderError::GraphElementNotNumber);
        };

        let value = static_number(value)?;
        let bar_len = if max > 0.0 {
            ((value / max) * BAR_LENGTH as f64).floor() as usize
        } else {
            0
        };

        md.push(format!(
            "| {} | {} | {} |",
            title.as_deref().unwrap_or_default(),
            render_number_inline(element)?,
            "\u{2588}".repeat(bar_len)
        ));
    }

    md.push(String::new());
    Ok(md.join("\n"))
}

fn render_table_cell(widget: &Widget) -> RenderResult<String> {
    let cell = scalar_cell(widget)?;
    let mut out = cell.value;

    if let Some(color) = cell.color {
        out = format!("{} {}", render_color(color)?, out);
    }

    if let Some(url) = cell.url {
        out = format!("[{}]({})", out, url);
    }

    Ok(out)
}

fn render_table_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::Table {
        title,
        headers,
        elements,
        ..
    } = widget
    else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let columns = elements
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(headers.len());

    if columns == 0 {
        return Ok(String::new());
    }

    let mut md: Vec<String> = Vec::new();

    if let Some(title) = title {
        md.push(format!("#### {}", title));
        md.push(String::new());
    }

    let mut line = String::from("|");
    for i in 0..columns {
        line.push(' ');
        if let Some(header) = headers.get(i) {
            line.push_str(&render_table_cell(header)?);
        }
        line.push_str(" |");
    }
    md.push(line);

    let mut line = String::from("|");
    for i in 0..columns {
        let align = headers.get(i).and_then(|header| match header {
            Widget::String { align, .. } => align.as_deref(),
            _ => None,
        });

        line.push_str(match align {
            Some("left") => ":--",
            Some("center") => ":-:",
            Some("right") => "--:",
            _ => "---",
        });
        line.push('|');
    }
    md.push(line);

    for row in elements {
        let mut line = String::from("|");
        for i in 0..columns {
            line.push(' ');
            if let Some(cell) = row.get(i) {
                line.push_str(&render_table_cell(cell)?);
            }
            line.push_str(" |");
        }
        md.push(line);
    }

    Ok(md.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_engine::NumberValue;

    fn number(title: &str, value: f64, color: Option<&str>) -> Widget {
        Widget::Number {
            title: Some(title.to_string()),
            url: None,
            value: NumberValue::Static(value),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn test_render_number_widgets_group_into_table() {
        let dashboard = Dashboard {
            title: Some("Health".to_string()),
            description: None,
            sections: vec![Section {
                title: Some("Issues".to_string()),
                description: None,
                widgets: vec![
                    number("Open", 12.0, Some("red")),
                    number("Closed", 3.0, None),
                ],
            }],
            setup: None,
            shutdown: None,
        };

        let md = render(&dashboard).unwrap();

        assert!(md.starts_with("# Health\n"));
        assert!(md.contains("## Issues\n"));
        assert!(md.contains("| Query |  |\n|:------|-:|\n"));
        assert!(md.contains("| Open | \u{1f534} 12 |\n| Closed | 3 |"));
    }

    #[test]
    fn test_render_number_with_url_links() {
        let widget = Widget::Number {
            title: None,
            url: Some("https://github.com/search?q=x".to_string()),
            value: NumberValue::Static(7.0),
            color: None,
        };

        assert_eq!(
            render_number_inline(&widget).unwrap(),
            "[7](https://github.com/search?q=x)"
        );
    }

    #[test]
    fn test_render_graph_bars_scale_to_max() {
        let widget = Widget::Graph {
            title: Some("Breakdown".to_string()),
            url: None,
            elements: vec![number("Bugs", 35.0, None), number("Features", 7.0, None)],
        };

        let md = render_graph_widget(&widget).unwrap();

        // The largest value fills the bar; others scale down.
        assert!(md.contains(&format!("| Bugs | 35 | {} |", "\u{2588}".repeat(35))));
        assert!(md.contains(&format!("| Features | 7 | {} |", "\u{2588}".repeat(7))));
        assert!(md.contains("#### Breakdown"));
    }

    #[test]
    fn test_render_graph_all_zero_has_no_bars() {
        let widget = Widget::Graph {
            title: None,
            url: None,
            elements: vec![number("None", 0.0, None)],
        };

        let md = render_graph_widget(&widget).unwrap();
        assert!(md.contains("| None | 0 |  |"));
    }

    #[test]
    fn test_render_table_with_alignment() {
        let header = |text: &str, align: Option<&str>| Widget::String {
            title: None,
            url: None,
            value: text.to_string(),
            align: align.map(str::to_string),
            color: None,
        };

        let widget = Widget::Table {
            title: None,
            url: None,
            headers: vec![header("Issue", Some("right")), header("Title", None)],
            elements: vec![vec![
                header("4", None),
                header("Crash on startup", None),
            ]],
        };

        let md = render_table_widget(&widget).unwrap();
        assert_eq!(md, "| Issue | Title |\n|--:|---|\n| 4 | Crash on startup |");
    }

    #[test]
    fn test_render_empty_table_is_empty() {
        let widget = Widget::Table {
            title: Some("Nothing".to_string()),
            url: None,
            headers: Vec::new(),
            elements: Vec::new(),
        };

        assert_eq!(render_table_widget(&widget).unwrap(), "");
    }

    #[test]
    fn test_render_rejects_unevaluated_widget() {
        let dashboard = Dashboard {
            title: None,
            description: None,
            sections: vec![Section {
                title: None,
                description: None,
                widgets: vec![Widget::ScriptNumber {
                    title: None,
                    url: None,
                    script: "1".to_string(),
                    color: None,
                }],
            }],
            setup: None,
            shutdown: None,
        };

        assert!(matches!(
            render(&dashboard).unwrap_err(),
            RenderError::UnevaluatedWidget
        ));
    }

    #[test]
    fn test_render_unknown_color_is_error() {
        let widget = number("Open", 1.0, Some("chartreuse"));
        assert!(matches!(
            render_number_inline(&widget).unwrap_err(),
            RenderError::InvalidColor(_)
        ));
    }
}
