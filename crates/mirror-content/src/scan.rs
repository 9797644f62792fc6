//! Splits markdown into prose and literal spans.
//!
//! Literal spans are fenced blocks, inline code and link targets. Inline
//! code is matched by backtick run length, so ``` ``a`b`` ``` is a single
//! span. An unclosed run turns the rest of its line literal. Inline state
//! never carries across lines.

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span<'a> {
    Prose(&'a str),
    Literal(&'a str),
}

/// Returns true if `line` opens or closes a fenced block.
pub(crate) fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

/// Rewrite every prose span of `body` with `f`, copying literals verbatim.
pub(crate) fn map_prose(body: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_fence = false;
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if is_fence(line) {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence {
            out.push_str(line);
            continue;
        }
        for span in spans(line) {
            match span {
                Span::Prose(text) => out.push_str(&f(text)),
                Span::Literal(text) => out.push_str(text),
            }
        }
    }
    out
}

/// Split one line outside a fenced block into spans.
pub(crate) fn spans(line: &str) -> Vec<Span<'_>> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut prose_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i);
            if let Some(close) = find_closing_run(bytes, i + run, run) {
                push_prose(&mut out, &line[prose_start..i]);
                out.push(Span::Literal(&line[i..close + run]));
                i = close + run;
                prose_start = i;
            } else {
                push_prose(&mut out, &line[prose_start..i]);
                out.push(Span::Literal(&line[i..]));
                return out;
            }
            continue;
        }
        if bytes[i] == b']' && bytes.get(i + 1) == Some(&b'(') {
            let target_start = i + 2;
            let target_end = line[target_start..]
                .find(')')
                .map(|offset| target_start + offset + 1)
                .unwrap_or(line.len());
            push_prose(&mut out, &line[prose_start..target_start]);
            out.push(Span::Literal(&line[target_start..target_end]));
            i = target_end;
            prose_start = i;
            continue;
        }
        i += 1;
    }
    push_prose(&mut out, &line[prose_start..]);
    out
}

fn push_prose<'a>(out: &mut Vec<Span<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Span::Prose(text));
    }
}

fn run_length(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i);
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_inline_code_by_run_length() {
        assert_eq!(
            spans("a ``x`y`` b"),
            vec![Span::Prose("a "), Span::Literal("``x`y``"), Span::Prose(" b")]
        );
    }

    #[test]
    fn unclosed_backtick_runs_to_end_of_line() {
        assert_eq!(
            spans("it`s {x}"),
            vec![Span::Prose("it"), Span::Literal("`s {x}")]
        );
    }

    #[test]
    fn link_target_is_literal() {
        assert_eq!(
            spans("[a](b{c}) d"),
            vec![Span::Prose("[a]("), Span::Literal("b{c})"), Span::Prose(" d")]
        );
    }

    #[test]
    fn fenced_lines_are_untouched() {
        let out = map_prose("x\n```\ny\n```\nz", |t| t.to_uppercase());
        assert_eq!(out, "X\n```\ny\n```\nZ");
    }
}
