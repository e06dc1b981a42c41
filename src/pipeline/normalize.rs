//! Text normalisation applied before either extraction strategy runs.
//!
//! pdfium returns page text with `\r\n` line endings and the occasional
//! zero-width character from ligature or kerning tricks in the source PDF.
//! Both strategies work line by line on whitespace-separated tokens, so
//! those artefacts must be gone first or a code like `CS\u{200B}201` never
//! matches.

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalise a whole document: line endings, then invisible characters.
pub fn normalise_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    remove_invisible_chars(&s)
}

/// Collapse every whitespace run in a line to one space and trim it.
pub fn clean_line(line: &str) -> String {
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    RE_WS.replace_all(line, " ").trim().to_string()
}

/// Non-empty cleaned lines of a normalised document.
pub fn clean_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('\n').map(clean_line).filter(|l| !l.is_empty())
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}
