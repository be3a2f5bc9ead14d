//! Regex-based HTML markup stripping.
//!
//! Two independent passes are offered: [`remove_tags`] drops script/style blocks and every
//! remaining tag, [`collapse_to_plain_text`] turns paragraph and line-break tags into
//! `\r\n` before dropping the rest. Entities such as `&nbsp;` are left as-is.

use std::sync::LazyLock;

use regex::Regex;

/// Line break inserted by [`collapse_to_plain_text`].
pub const LINE_BREAK: &str = "\r\n";

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<script[^>]*?>.*?</script\s*>"));
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<style[^>]*?>.*?</style\s*>"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]+>"));

// Case-sensitive; a paragraph tag needs a space before its attributes.
static PARAGRAPH_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"<p .*?>"));
static LINE_BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<br\s*/?>"));
// `.` stops at newlines: a tag split across lines survives this pass.
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<.*?>"));

// The patterns are literals; a failure here is a bug caught by the unit tests.
#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markup pattern must compile")
}

/// Remove `<script>`/`<style>` blocks (tags and bodies), then every other tag, then trim.
///
/// Matching of the blocks is case-insensitive, non-greedy and spans newlines.
///
/// ```rust
/// use sql_helper::markup::remove_tags;
///
/// assert_eq!(remove_tags("<p>asd</p><style x>y</style>"), "asd");
/// assert_eq!(remove_tags(""), "");
/// ```
#[must_use]
pub fn remove_tags(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_scripts = SCRIPT_BLOCK.replace_all(text, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let without_tags = ANY_TAG.replace_all(&without_styles, "");
    without_tags.trim().to_owned()
}

/// [`remove_tags`] for input that may be absent; `None` yields an empty string.
#[must_use]
pub fn remove_tags_opt(text: Option<&str>) -> String {
    text.map(remove_tags).unwrap_or_default()
}

/// Replace `<p ...>` and `<br>`/`<br/>` with `\r\n`, then strip the remaining tags.
///
/// Only lowercase tags are converted, and a bare `<p>` is stripped like any other tag.
/// Whitespace is preserved and HTML entities are not decoded.
///
/// ```rust
/// use sql_helper::markup::collapse_to_plain_text;
///
/// assert_eq!(collapse_to_plain_text("<p class=\"a\">x<br/>y</p>"), "\r\nx\r\ny");
/// assert_eq!(collapse_to_plain_text("<p>asd</p>"), "asd");
/// ```
#[must_use]
pub fn collapse_to_plain_text(text: &str) -> String {
    let paragraphs = PARAGRAPH_OPEN.replace_all(text, LINE_BREAK);
    let breaks = LINE_BREAK_TAG.replace_all(&paragraphs, LINE_BREAK);
    INLINE_TAG.replace_all(&breaks, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for re in [
            &SCRIPT_BLOCK,
            &STYLE_BLOCK,
            &ANY_TAG,
            &PARAGRAPH_OPEN,
            &LINE_BREAK_TAG,
            &INLINE_TAG,
        ] {
            let _ = LazyLock::force(re);
        }
    }

    #[test]
    fn strips_paragraph_and_style_block() {
        assert_eq!(remove_tags("<p>asd</p><style x>y</style>"), "asd");
    }

    #[test]
    fn empty_and_absent_input() {
        assert_eq!(remove_tags(""), "");
        assert_eq!(remove_tags_opt(None), "");
        assert_eq!(remove_tags_opt(Some("")), "");
        assert_eq!(remove_tags_opt(Some(" <b>x</b> ")), "x");
    }

    #[test]
    fn script_blocks_span_lines_and_ignore_case() {
        let html = "before<SCRIPT type=\"text/javascript\">\nvar a = 1 < 2;\nalert(a);\n</Script>after";
        assert_eq!(remove_tags(html), "beforeafter");
    }

    #[test]
    fn script_match_is_not_greedy() {
        let html = "<script>a()</script>keep<script>b()</script>";
        assert_eq!(remove_tags(html), "keep");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(remove_tags("\n  <div>\n hello <em>world</em>\n</div>\t"), "hello world");
    }

    #[test]
    fn unterminated_script_falls_back_to_tag_removal() {
        // No closing tag: only the opening tag itself goes.
        assert_eq!(remove_tags("<script>oops"), "oops");
    }

    #[test]
    fn collapse_replaces_paragraphs_and_breaks() {
        let html = "<p class=\"a\">one<br>two<br/>three<br />four</p>";
        assert_eq!(collapse_to_plain_text(html), "\r\none\r\ntwo\r\nthree\r\nfour");
    }

    #[test]
    fn collapse_only_converts_lowercase_paragraphs_with_attributes() {
        assert_eq!(collapse_to_plain_text("<p>asd</p>"), "asd");
        assert_eq!(collapse_to_plain_text("<P class=\"a\">x</P>"), "x");
        assert_eq!(collapse_to_plain_text("x<BR>y<Br/>z"), "xyz");
    }

    #[test]
    fn collapse_keeps_entities_and_other_text() {
        assert_eq!(
            collapse_to_plain_text("<b>a&nbsp;b</b> &amp;"),
            "a&nbsp;b &amp;"
        );
    }

    #[test]
    fn collapse_does_not_touch_similar_tags() {
        assert_eq!(collapse_to_plain_text("<pre>x</pre><param>"), "x");
    }
}
