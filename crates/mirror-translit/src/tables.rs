//! Character deletion and substitution tables.

/// Characters removed outright.
pub const DELETED: &[char] = &[
    '(', ')', '[', ']', '{', '}', '\'', '"', ',', ';', '!', '$', '^', '`', '~',
];

/// Characters spelled out as a hyphen-delimited word.
pub const SUBSTITUTED: &[(char, &str)] = &[
    ('&', "-and-"),
    ('+', "-plus-"),
    ('@', "-at-"),
    ('#', "-num-"),
    ('%', "-pct-"),
    ('=', "-eq-"),
];

/// Returns the replacement for `c` if it is in the substitution table.
pub fn substitution(c: char) -> Option<&'static str> {
    SUBSTITUTED
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Returns true if `c` is handled by either table.
pub fn is_unsafe(c: char) -> bool {
    DELETED.contains(&c) || substitution(c).is_some()
}

/// Push the table mapping of `c` onto `out`.
///
/// Deleted characters push nothing; characters in neither table are pushed
/// unchanged.
pub fn apply(c: char, out: &mut String) {
    if DELETED.contains(&c) {
        return;
    }
    match substitution(c) {
        Some(word) => out.push_str(word),
        None => out.push(c),
    }
}

/// Apply both tables to every character of `text`.
pub fn apply_all(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        apply(c, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_do_not_overlap() {
        for (c, _) in SUBSTITUTED {
            assert!(!DELETED.contains(c), "{c} is in both tables");
        }
    }

    #[test]
    fn passthrough_characters() {
        assert_eq!(apply_all("a-b_c.d"), "a-b_c.d");
        assert_eq!(apply_all("こんにちは"), "こんにちは");
    }
}
