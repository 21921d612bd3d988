//! HTML renderer. Emits a standalone page that expects `dashboard.css`
//! and `dashboard.js` to live next to it.

use dashboard_engine::{Dashboard, Section, Widget};

use super::{scalar_cell, static_number, RenderError, RenderResult};

/// Turns a title into a fragment anchor: spaces become dashes, anything
/// outside `[A-Za-z0-9_-]` is dropped, the rest lowercased.
fn anchor(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            'A'..='Z' => Some(c.to_ascii_lowercase()),
            'a'..='z' | '0'..='9' | '_' | '-' => Some(c),
            _ => None,
        })
        .collect()
}

pub fn render(dashboard: &Dashboard) -> RenderResult<String> {
    let mut html: Vec<String> = Vec::new();

    html.push(format!(
        "\n<html>\n<head>\n<title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"dashboard.css\" type=\"text/css\" media=\"all\">\n\
         <script src=\"dashboard.js\"></script>\n\
         </head>\n<body>\n<div id=\"dashboard\">\n",
        dashboard.title.as_deref().unwrap_or("Dashboard")
    ));

    if let Some(title) = &dashboard.title {
        html.push(format!("<h1>{}</h1>", title));
        html.push(String::new());
    }

    if let Some(description) = &dashboard.description {
        html.push("<div id=\"main_description\" class=\"description\">".to_string());
        html.push(description.clone());
        html.push("</div>".to_string());
        html.push(String::new());
    }

    html.push("<div class=\"sections\">".to_string());

    for section in &dashboard.sections {
        render_section(&mut html, section)?;
    }

    html.push(
        "\n</div> <!-- sections -->\n\
         <div id=\"footer\">\n\
         Generated by <a href=\"https://github.com/issue-dashboard/issue-dashboard-rs\" \
         target=\"_blank\" rel=\"noopener noreferrer\">ghdash</a>\n\
         </div>\n\
         </div> <!-- dashboard -->\n\
         </body>\n</html>\n"
            .to_string(),
    );

    Ok(html.join("\n"))
}

fn render_section(html: &mut Vec<String>, section: &Section) -> RenderResult<()> {
    html.push("<div class=\"section\">".to_string());
    html.push("<div class=\"section_metadata\">".to_string());

    if let Some(title) = &section.title {
        html.push(format!("<a name=\"{}\"></a>", anchor(title)));
        html.push(format!("<h2 class=\"section_title\">{}</h2>", title));
        html.push(String::new());
    }

    if let Some(description) = &section.description {
        html.push("<div class=\"description\">".to_string());
        html.push(description.clone());
        html.push("</div>".to_string());
        html.push(String::new());
    }

    html.push("</div> <!-- section_metadata -->".to_string());
    html.push("<div class=\"section_widgets\">".to_string());

    // Consecutive number widgets share one flexbox container.
    let mut in_number_group = false;
    for widget in &section.widgets {
        if matches!(widget, Widget::Number { .. }) {
            if !in_number_group {
                html.push("<div class=\"number_widgets\">".to_string());
                in_number_group = true;
            }

            html.push(render_number_widget(widget)?);
            continue;
        }

        if in_number_group {
            html.push("</div> <!-- number_widgets -->".to_string());
            in_number_group = false;
        }

        match widget {
            Widget::String { .. } => html.push(render_string_widget(widget)?),
            Widget::Graph { .. } => html.push(render_graph_widget(widget)?),
            Widget::Table { .. } => html.push(render_table_widget(widget)?),
            _ => return Err(RenderError::UnevaluatedWidget),
        }
    }

    if in_number_group {
        html.push("</div> <!-- number_widgets -->".to_string());
    }

    html.push("</div> <!-- section_widgets -->".to_string());
    html.push("</div> <!-- section -->".to_string());

    Ok(())
}

fn render_number_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::Number { title, .. } = widget else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let cell = scalar_cell(widget)?;
    let mut out: Vec<String> = Vec::new();

    if let Some(title) = title {
        out.push(format!("<a name=\"{}\"></a>", anchor(title)));
    }

    if let Some(url) = cell.url {
        out.push(format!("<a href=\"{}\">", url));
    }

    out.push(format!(
        "<div class=\"number_widget{}\">",
        color_suffix(cell.color)
    ));

    if let Some(title) = title {
        out.push(format!("<span class=\"title\">{}</span>", title));
    }

    out.push(format!("<span class=\"value\">{}</span>", cell.value));
    out.push("</div>".to_string());

    if cell.url.is_some() {
        out.push("</a>".to_string());
    }

    Ok(out.join("\n"))
}

fn render_string_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::String { title, .. } = widget else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let cell = scalar_cell(widget)?;
    let mut out: Vec<String> = Vec::new();

    if let Some(title) = title {
        out.push(format!("<a name=\"{}\"></a>", anchor(title)));
    }

    if let Some(url) = cell.url {
        out.push(format!("<a href=\"{}\">", url));
    }

    out.push(format!(
        "<div class=\"string_widget{}\">",
        color_suffix(cell.color)
    ));

    if let Some(title) = title {
        out.push(format!("<h3 class=\"title\">{}</h3>", title));
    }

    out.push(format!("<span class=\"value\">{}</span>", cell.value));
    out.push("</div> <!-- string_widget -->".to_string());

    if cell.url.is_some() {
        out.push("</a>".to_string());
    }

    Ok(out.join("\n"))
}

fn render_graph_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::Graph {
        title,
        url,
        elements,
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

    let mut html: Vec<String> = Vec::new();

    html.push("<div class=\"graph_widget\">".to_string());

    if let Some(title) = title {
        let linked_title = match url {
            Some(url) => format!("<a href=\"{}\">{}</a>", url, title),
            None => title.clone(),
        };
        html.push(format!("<a name=\"{}\"></a>", anchor(title)));
        html.push(format!("<h3 class=\"graph_title\">{}</h3>", linked_title));
    }

    html.push("<div class=\"graph\">".to_string());

    for element in elements {
        let Widget::Number { title, value, .. } = element else {
            return Err(RenderError::GraphElementNotNumber);
        };

        let cell = scalar_cell(element)?;
        let value = static_number(value)?;
        let scaled = if max > 0.0 {
            ((value / max) * 100.0).floor() as u32
        } else {
            0
        };

        html.push(format!(
            "<div class=\"graph_item{}\">",
            color_suffix(cell.color)
        ));
        html.push("<span class=\"graph_item_title\">".to_string());

        if let Some(title) = title {
            if let Some(url) = cell.url {
                html.push(format!("<a href=\"{}\">", url));
            }

            html.push(format!("<span class=\"title\">{}</span>", title));

            if cell.url.is_some() {
                html.push("</a>".to_string());
            }
        }

        html.push("</span>".to_string());
        html.push("<span class=\"graph_item_value\">".to_string());

        if let Some(url) = cell.url {
            html.push(format!("<a href=\"{}\">", url));
        }

        // A bar too small to hold its label stays empty.
        let value_class = if scaled > 0 { "value" } else { "value empty_value" };
        let value_display = if scaled >= 5 { cell.value.as_str() } else { "" };
        html.push(format!(
            "<span class=\"{}\" style=\"width: {}%;\">{}</span>",
            value_class, scaled, value_display
        ));

        if cell.url.is_some() {
            html.push("</a>".to_string());
        }

        html.push("</span>".to_string());
        html.push("</div>".to_string());
    }

    html.push("</div>".to_string());
    html.push("</div>".to_string());

    Ok(html.join("\n"))
}

fn render_table_cell(tag: &str, widget: &Widget) -> RenderResult<String> {
    let cell = scalar_cell(widget)?;
    let mut html = String::new();

    let color = match cell.color {
        Some(color) => format!(" class=\"{}\"", color),
        None => String::new(),
    };
    let align = match cell.align {
        Some(align) => format!(" style=\"text-align: {}\"", align),
        None => String::new(),
    };

    html.push_str(&format!("<{}{}{}>", tag, color, align));

    if let Some(url) = cell.url {
        html.push_str(&format!("<a href=\"{}\">", url));
    }

    html.push_str(&cell.value);

    if cell.url.is_some() {
        html.push_str("</a>");
    }

    html.push_str(&format!("</{}>", tag));

    Ok(html)
}

fn render_table_widget(widget: &Widget) -> RenderResult<String> {
    let Widget::Table {
        title,
        url,
        headers,
        elements,
    } = widget
    else {
        return Err(RenderError::UnevaluatedWidget);
    };

    let mut html: Vec<String> = Vec::new();

    html.push("<div class=\"table_widget\">".to_string());

    if let Some(title) = title {
        let linked_title = match url {
            Some(url) => format!("<a href=\"{}\">{}</a>", url, title),
            None => title.clone(),
        };
        html.push(format!("<a name=\"{}\"></a>", anchor(title)));
        html.push(format!("<h3 class=\"table_title\">{}</h3>", linked_title));
    }

    html.push("<table class=\"table\">".to_string());

    if !headers.is_empty() {
        html.push("<tr class=\"table_header\">".to_string());

        for cell in headers {
            html.push(render_table_cell("th", cell)?);
        }

        html.push("</tr>".to_string());
    }

    for row in elements {
        html.push("<tr class=\"table_element\">".to_string());

        for cell in row {
            html.push(render_table_cell("td", cell)?);
        }

        html.push("</tr>".to_string());
    }

    html.push("</table>".to_string());
    html.push("</div>".to_string());

    Ok(html.join("\n"))
}

fn color_suffix(color: Option<&str>) -> String {
    match color {
        Some(color) => format!(" {}", color),
        None => String::new(),
    }
}
