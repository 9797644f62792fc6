//! Escaping of renderer-hazardous syntax.
//!
//! Inline hazards (`{…}` expressions and empty tags) are wrapped in inline
//! literals. Block hazards (raw HTML table markup) are wrapped in fenced
//! `html` blocks. Both functions are idempotent.

use crate::header::split_header;
use crate::scan::{is_fence, map_prose};

const TABLE_TAGS: &[&str] = &[
    "<table", "<tbody", "<thead", "<tr>", "<th", "<td", "</table>", "</tbody>", "</thead>",
    "</tr>", "</th>", "</td>",
];

/// Escape inline hazards in a whole document, leaving any header alone.
pub fn escape_inline_hazards(content: &str) -> String {
    on_body(content, |body| wrap_angle_brackets(&wrap_braces(body)))
}

/// Escape block hazards in a whole document, leaving any header alone.
pub fn escape_block_hazards(content: &str) -> String {
    on_body(content, wrap_raw_html)
}

/// Wrap each same-line `{…}` span of prose in backticks.
///
/// A span runs from `{` to the first `}` on its line. Spans inside code,
/// link targets, and object values such as `"key": {…}` are kept.
pub fn wrap_braces(body: &str) -> String {
    map_prose(body, |prose| {
        let mut out = String::with_capacity(prose.len() + 8);
        let mut copied = 0;
        while let Some(offset) = prose[copied..].find('{') {
            let open = copied + offset;
            let Some(len) = prose[open..].find('}') else {
                break;
            };
            let close = open + len;
            out.push_str(&prose[copied..open]);
            let span = &prose[open..=close];
            if follows_object_key(&prose[..open]) {
                out.push_str(span);
            } else {
                out.push('`');
                out.push_str(span);
                out.push('`');
            }
            copied = close + 1;
        }
        out.push_str(&prose[copied..]);
        out
    })
}

// True when `before` ends with a quoted key and a colon, blanks allowed
// around the colon.
fn follows_object_key(before: &str) -> bool {
    before
        .trim_end_matches([' ', '\t'])
        .strip_suffix(':')
        .is_some_and(|key| key.trim_end_matches([' ', '\t']).ends_with(['"', '\'']))
}

/// Wrap empty tags (`<>` and `</>`) in prose in backticks.
pub fn wrap_angle_brackets(body: &str) -> String {
    map_prose(body, |prose| prose.replace("</>", "`</>`").replace("<>", "`<>`"))
}

/// Wrap each run of raw table markup lines in an ```` ```html ```` fence.
pub fn wrap_raw_html(body: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut run: Vec<&str> = Vec::new();

    for line in body.split('\n') {
        if is_fence(line) {
            flush_html(&mut run, &mut out);
            in_fence = !in_fence;
        } else if !in_fence && is_table_markup(line) {
            run.push(line);
            continue;
        } else {
            flush_html(&mut run, &mut out);
        }
        out.push(line);
    }
    flush_html(&mut run, &mut out);
    out.join("\n")
}

fn flush_html<'a>(run: &mut Vec<&'a str>, out: &mut Vec<&'a str>) {
    if run.is_empty() {
        return;
    }
    out.push("```html");
    out.append(run);
    out.push("```");
}

fn is_table_markup(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    TABLE_TAGS.iter().any(|tag| lower.contains(tag))
}

fn on_body(content: &str, f: impl Fn(&str) -> String) -> String {
    let (header, body) = split_header(content);
    let mut out = header.unwrap_or_default().to_string();
    out.push_str(&f(body));
    out
}
