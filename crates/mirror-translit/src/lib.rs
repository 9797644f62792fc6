//! Transliteration engine for docmirror
//!
//! Maps arbitrary Unicode titles to ASCII-safe names. Hangul syllables are
//! romanized by arithmetic decomposition; a fixed set of punctuation is
//! deleted or spelled out; everything else passes through untouched.
//!
//! All lookup tables are immutable static data, so every function in this
//! crate is pure.

pub mod hangul;
pub mod naming;
pub mod tables;

pub use hangul::contains_hangul;
pub use naming::{
    collapse_hyphens, is_markdown, is_name_safe, page_file_stem, sanitize_name, space_dir_name,
    split_markdown, transliterate_name, transliterate_segment,
};

/// Transliterate `text` into an ASCII-safe string.
///
/// ASCII letters, digits and spaces are kept. Hangul syllables are romanized.
/// Characters in the deletion table are dropped and characters in the
/// substitution table are replaced by their hyphen-delimited word. Anything
/// else passes through unchanged.
///
/// Distinct inputs may collide (`"A(B)"` and `"AB"` both give `"AB"`).
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == ' ' {
            out.push(c);
        } else if let Some(syllable) = hangul::decompose(c) {
            syllable.write_to(&mut out);
        } else {
            tables::apply(c, &mut out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ascii_words() {
        assert_eq!(transliterate("Google"), "Google");
        assert_eq!(transliterate("123"), "123");
    }

    #[test]
    fn romanizes_syllables() {
        assert_eq!(transliterate("하이"), "hai");
        assert_eq!(transliterate("안녕"), "annyeong");
    }

    #[test]
    fn applies_tables() {
        assert_eq!(transliterate("A & B"), "A -and- B");
        assert_eq!(transliterate("A(B)"), "AB");
    }
}
