//! Hangul syllable decomposition.
//!
//! A precomposed syllable `c` in U+AC00..=U+D7A3 encodes
//! `(lead * 21 + vowel) * 28 + trail` as its offset from U+AC00.

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const VOWEL_COUNT: u32 = 21;
const TRAIL_COUNT: u32 = 28;

const LEADS: [&str; 19] = [
    "g", "kk", "n", "d", "tt", "r", "m", "b", "pp", "s", "ss", "", "j", "jj", "ch", "k", "t", "p",
    "h",
];

const VOWELS: [&str; 21] = [
    "a", "ae", "ya", "yae", "eo", "e", "yeo", "ye", "o", "wa", "wae", "oe", "yo", "u", "wo", "we",
    "wi", "yu", "eu", "ui", "i",
];

// Index 0 is "no trailing consonant".
const TRAILS: [&str; 28] = [
    "", "k", "k", "ks", "n", "nj", "nh", "d", "l", "lg", "lm", "lb", "ls", "lt", "lp", "lh", "m",
    "b", "bs", "s", "ss", "ng", "j", "ch", "k", "t", "p", "h",
];

/// Component indices of one precomposed syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub lead: usize,
    pub vowel: usize,
    pub trail: Option<usize>,
}

impl Syllable {
    /// Append the romanization of this syllable to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(LEADS[self.lead]);
        out.push_str(VOWELS[self.vowel]);
        if let Some(trail) = self.trail {
            out.push_str(TRAILS[trail]);
        }
    }
}

/// Decompose `c` if it is a precomposed Hangul syllable.
pub fn decompose(c: char) -> Option<Syllable> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let offset = code - SYLLABLE_BASE;
    let trail = (offset % TRAIL_COUNT) as usize;
    Some(Syllable {
        lead: (offset / (VOWEL_COUNT * TRAIL_COUNT)) as usize,
        vowel: ((offset % (VOWEL_COUNT * TRAIL_COUNT)) / TRAIL_COUNT) as usize,
        trail: (trail != 0).then_some(trail),
    })
}

/// Returns true if `text` contains any Hangul syllable or jamo.
///
/// Covers precomposed syllables, conjoining jamo and compatibility jamo.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0xAC00..=0xD7AF | 0x1100..=0x11FF | 0x3130..=0x318F)
    })
}
