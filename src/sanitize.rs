use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Strips markup and decodes HTML entities.
///
/// Text holding both `<` and `>` is parsed as an HTML fragment and only its
/// text nodes are kept; entities are decoded afterwards either way, including
/// the legacy ones written without a trailing `;` (`&amp`, `&nbsp`, ...).
pub fn clean_html(raw: &str) -> String {
    if raw.contains('<') && raw.contains('>') {
        let frag = Html::parse_fragment(raw);
        let text = frag.root_element().text().collect::<String>();
        return htmlize::unescape(text).into_owned();
    }
    htmlize::unescape(raw).into_owned()
}

/// Drops every character that is neither a word character nor whitespace, then trims.
pub fn clean_text(text: &str) -> String {
    NON_WORD.replace_all(text, "").trim().to_string()
}

pub fn sanitize(raw: &str) -> String {
    clean_text(&clean_html(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_from_markup() {
        let out = sanitize("<b>SK하이닉스</b>, HBM <i>공급</i> 확대");
        assert_eq!(out, "SK하이닉스 HBM 공급 확대");
        assert!(!out.contains('<') && !out.contains('>'));
    }

    #[test]
    fn decodes_entities_without_markup() {
        assert_eq!(clean_html("&quot;AI&quot; 반도체 &amp; 메모리"), "\"AI\" 반도체 & 메모리");
        assert_eq!(sanitize("&quot;AI&quot; 반도체 &amp; 메모리"), "AI 반도체  메모리");
    }

    #[test]
    fn escaped_markup_never_survives() {
        // entities decoded inside markup are parsed as text, then decoded again
        let out = sanitize("<p>&amp;lt;script&amp;gt; 주가 &lt;급등&gt;</p>");
        assert!(!out.contains('<') && !out.contains('>'));
        assert_eq!(out, "script 주가 급등");
    }

    #[test]
    fn single_angle_bracket_is_not_markup() {
        assert_eq!(clean_html("3 < 5 배"), "3 < 5 배");
        assert_eq!(sanitize("3 < 5 배"), "3  5 배");
    }

    #[test]
    fn output_is_word_chars_and_whitespace_only() {
        let inputs = [
            "  Samsung's Q3: +12.5% (YoY)!  ",
            "<a href=\"x\">link</a> — “quoted” … ©2024",
            "\t日本語テキスト、句読点。\n",
            "under_score stays",
        ];
        for input in inputs {
            let out = sanitize(input);
            assert_eq!(out, out.trim());
            assert!(
                out.chars().all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace()),
                "unexpected char in {:?}",
                out
            );
        }
        assert_eq!(sanitize("under_score stays"), "under_score stays");
        assert_eq!(sanitize("  Samsung's Q3: +12.5% (YoY)!  "), "Samsungs Q3 125 YoY");
    }

    #[test]
    fn legacy_entities_without_semicolon_are_decoded() {
        assert_eq!(sanitize("R&amp D"), "R D");
        assert_eq!(sanitize("a&nbspb"), "a\u{a0}b");
        assert_eq!(sanitize("&lt3 &copy 2024"), "3  2024");
        assert_eq!(sanitize("<p>R&amp D</p>"), "R D");
    }

    #[test]
    fn whitespace_runs_are_kept() {
        // only the ends are trimmed; removed symbols leave their spaces behind
        assert_eq!(sanitize("A & B"), "A  B");
        assert_eq!(sanitize(" 삼성\t전자 \n"), "삼성\t전자");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("<br/>"), "");
    }
}
