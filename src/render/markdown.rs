//! Markdown-subset renderer for note previews.
//!
//! Supported constructs: headings 1-3, bold, italic, inline code, fenced
//! code blocks, unordered lists, paragraphs with line breaks. The passes run
//! in a fixed order so later substitutions cannot corrupt earlier ones;
//! HTML-relevant characters are escaped before anything else, which makes
//! the output injection-safe for this restricted subset (it is not a
//! general sanitizer).
//!
//! Malformed constructs degrade gracefully: an unterminated fence or span
//! simply fails to match and passes through as escaped paragraph text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static H3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:-|\*) (.*)$").unwrap());
static LIST_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<li>.*</li>\n?)+").unwrap());
static BLOCK_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Renders a markdown-subset string to HTML.
///
/// Pure and deterministic: the same input always yields byte-identical
/// output. Empty input yields empty output.
///
/// # Examples
///
/// ```
/// use reef::render::render;
///
/// assert_eq!(render("# Title"), "<h1>Title</h1>");
/// assert!(render("**bold**").contains("<strong>bold</strong>"));
/// assert_eq!(render("<script>"), "<p>&lt;script&gt;</p>");
/// ```
pub fn render(src: &str) -> String {
    if src.is_empty() {
        return String::new();
    }

    // 1. Escape. Ampersand first so entity forms are not double-escaped.
    let text = src
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    // 2. Code fences. Replacement built via closure so `$` in code bodies is
    // taken literally. Language tags after the opening fence are left as
    // plain text; no styling is applied to them.
    let text = FENCE_RE.replace_all(&text, |caps: &Captures| {
        format!(
            "<pre class=\"code\"><code>{}</code></pre>",
            caps[1].trim()
        )
    });

    // 3. Headings, most specific marker first.
    let text = H3_RE.replace_all(&text, "<h3>$1</h3>");
    let text = H2_RE.replace_all(&text, "<h2>$1</h2>");
    let text = H1_RE.replace_all(&text, "<h1>$1</h1>");

    // 4. Bold before italic, so `**` spans are consumed before `*` matches.
    let text = BOLD_RE.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>$1</em>");

    // 5. Inline code.
    let text = INLINE_CODE_RE.replace_all(&text, "<code>$1</code>");

    // 6. List items, then coalesce adjacent items into one list.
    let text = LIST_ITEM_RE.replace_all(&text, "<li>$1</li>");
    let text = LIST_RUN_RE.replace_all(&text, |caps: &Captures| {
        format!("<ul>{}</ul>", caps[0].replace('\n', ""))
    });

    // 7. Paragraphs and line breaks.
    BLOCK_SPLIT_RE
        .split(&text)
        .map(|block| {
            if block.starts_with("<h1>")
                || block.starts_with("<h2>")
                || block.starts_with("<h3>")
                || block.starts_with("<ul>")
                || block.starts_with("<pre")
            {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br/>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
