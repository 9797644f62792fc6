//! Behavioral tests for transliteration and name helpers

use mirror_translit::{
    contains_hangul, is_name_safe, page_file_stem, sanitize_name, space_dir_name, transliterate,
    transliterate_name, transliterate_segment,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::simple("하이", "hai")]
#[case::with_final("안녕", "annyeong")]
#[case::double_trail("값", "gabs")]
#[case::cluster_trail("닭", "dalg")]
#[case::tense_lead("빵", "ppang")]
#[case::sequence("가나다라마바사", "ganadaramabasa")]
#[case::spaces_kept("안녕 하세요", "annyeong haseyo")]
#[case::mixed("Hello안녕", "Helloannyeong")]
fn romanizes_hangul(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(transliterate(input), expected);
}

#[rstest]
#[case::english("Google")]
#[case::digits("123")]
#[case::japanese("こんにちは")]
#[case::hyphen("A-B")]
#[case::dots_and_underscores("v1.2_final")]
fn passes_through(#[case] input: &str) {
    assert_eq!(transliterate(input), input);
}

#[rstest]
#[case::ampersand("A & B", "A -and- B")]
#[case::parens("A(B)", "AB")]
#[case::brackets("A[B]", "AB")]
#[case::plus("C++", "C-plus--plus-")]
#[case::at("me@host", "me-at-host")]
#[case::hash("#1", "-num-1")]
#[case::percent("50%", "50-pct-")]
#[case::equals("a=b", "a-eq-b")]
#[case::quotes("\"it's\"", "its")]
fn applies_character_tables(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(transliterate(input), expected);
}

#[test]
fn empty_input_is_empty() {
    assert_eq!(transliterate(""), "");
}

#[test]
fn segment_tidies_hyphens() {
    assert_eq!(transliterate_segment("C++"), "C-plus-plus");
    assert_eq!(transliterate_segment("인증"), "injeung");
}

#[rstest]
#[case::document("안녕.md", "annyeong.md")]
#[case::extension_case_kept("안녕.MD", "annyeong.MD")]
#[case::directory("환경 설정", "hwangyeong seoljeong")]
#[case::attachment("사진.png", "sajin.png")]
fn transliterates_names(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(transliterate_name(input), expected);
}

#[test]
fn slash_title_segments_join() {
    let title = "Security365 환경 인증/인가 관련 공통 에러 페이지";
    let joined = title
        .split('/')
        .map(|part| transliterate_segment(part.trim()))
        .collect::<Vec<_>>()
        .join("-");
    assert_eq!(
        joined,
        "Security365 hwangyeong injeung-inga gwanryeon gongtong ereo peiji"
    );
}

#[rstest]
#[case("안녕", true)]
#[case("ㄱ", true)]
#[case("ᄀ", true)]
#[case("hello", false)]
#[case("こんにちは", false)]
fn detects_hangul(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(contains_hangul(input), expected);
}

#[rstest]
#[case::ampersand("Q&A.md", "Q-and-A.md")]
#[case::parens("Intro (draft)", "Intro draft")]
#[case::space_kept("hello world.md", "hello world.md")]
#[case::edge_hyphens("(#)", "num")]
#[case::extension_case_kept("A+B.MD", "A-plus-B.MD")]
fn sanitizes_names(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_name(input), expected);
}

#[rstest]
#[case("plain-name.md", true)]
#[case("with space.md", true)]
#[case("Q&A.md", false)]
#[case("draft (1)", false)]
fn reports_name_safety(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_name_safe(input), expected);
}

#[rstest]
#[case::separators("Team/Docs: 2024", "Team-Docs- 2024")]
#[case::illegal("What? <now> | \"here\"*", "What now  here")]
#[case::trimmed("  Space  ", "Space")]
fn builds_space_dir_names(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(space_dir_name(input), expected);
}

#[test]
fn page_stem_matches_space_rules() {
    assert_eq!(page_file_stem("a/b"), "a-b");
}
