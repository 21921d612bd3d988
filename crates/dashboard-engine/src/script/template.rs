//! Template resolution for `{{ ... }}` expression spans.

use super::error::ScriptResult;
use super::eval::Scope;
use super::ScriptHost;

/// Resolves every `{{ ... }}` span in a template string.
///
/// Each span body is evaluated as an expression against the scope and
/// stringified into the output. Text outside spans passes through
/// untouched, and a string with no spans is returned as-is. A `{{`
/// that is never closed is treated as literal text.
///
/// Inside a span, a backslash escapes the following character, so a
/// string literal can contain `\}` without closing the span.
pub fn resolve(host: &dyn ScriptHost, template: &str, scope: &Scope) -> ScriptResult<String> {
    let mut output = String::new();
    let mut rest = template;
    let mut resolved_any = false;

    while let Some(open) = rest.find("{{") {
        let body_start = open + 2;
        let Some(close) = find_close(rest, body_start) else {
            break;
        };

        resolved_any = true;
        output.push_str(&rest[..open]);

        let value = host.eval_expression(&rest[body_start..close], scope)?;
        output.push_str(&value.to_string());

        rest = &rest[close + 2..];
    }

    if !resolved_any {
        return Ok(template.to_string());
    }

    output.push_str(rest);
    Ok(output)
}

/// Finds the byte offset of the first unescaped `}}` at or after `from`.
fn find_close(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            // A backslash consumes the next byte. Continuation bytes of a
            // multi-byte character are all >= 0x80, so skipping into one
            // can never produce a false '}' match.
            b'\\' => i += 2,
            b'}' if bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => i += 1,
        }
    }

    None
}
