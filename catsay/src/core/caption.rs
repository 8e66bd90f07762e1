//! Turning raw fortune output into a URL path segment.

use textwrap::{Options, WordSeparator, WrapAlgorithm};

/// Column width used when reflowing fortune text.
pub const DEFAULT_WRAP_WIDTH: usize = 70;

/// Tab stops used when expanding tabs before wrapping.
pub const TAB_SIZE: usize = 8;

/// Replace each tab with spaces up to the next multiple of `tab_size`.
///
/// The column restarts after `\n` and `\r`; columns are counted in chars.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = tab_size - column % tab_size;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            other => {
                out.push(other);
                column += 1;
            }
        }
    }
    out
}

/// Reflow `text` into lines no wider than `width` columns.
///
/// Tabs are expanded to [`TAB_SIZE`] stops, then every remaining whitespace
/// control character becomes one space, so line breaks in the input never
/// survive; the output breaks only where the width demands it. Width counts
/// chars, not display columns. Lines are filled greedily, breaking at spaces
/// or after hyphens, and words longer than `width` are split.
pub fn wrap_fortune(text: &str, width: usize) -> Vec<String> {
    let flattened: String = expand_tabs(text, TAB_SIZE)
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\x0b' | '\x0c' => ' ',
            other => other,
        })
        .collect();
    if flattened.trim().is_empty() {
        return Vec::new();
    }

    let options = Options::new(width)
        .word_separator(WordSeparator::AsciiSpace)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .break_words(true);

    textwrap::wrap(&flattened, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Join wrapped lines with `\n` and percent-encode the result.
///
/// Everything outside the unreserved set is escaped, including `/`, so the
/// caption is always a single path segment.
pub fn encode_caption(lines: &[String]) -> String {
    urlencoding::encode(&lines.join("\n")).into_owned()
}

/// Trim, wrap at [`DEFAULT_WRAP_WIDTH`], and encode raw fortune output.
pub fn caption_for(raw: &str) -> String {
    encode_caption(&wrap_fortune(raw.trim(), DEFAULT_WRAP_WIDTH))
}
