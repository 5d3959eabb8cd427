//! Text normalization for trope names.
//!
//! User input arrives as free text ("haunted-house", "Nausicaä", "SHOUT OUT").
//! [`normalize`] turns it into the PascalCase key the association store is
//! indexed by; [`display_form`] turns a key back into something readable.

use trope_corpus::Trope;

/// Canonicalize free text into a trope key.
///
/// Non-ASCII characters are transliterated, hyphens become word breaks, other
/// punctuation is dropped, and the words are title-cased and concatenated:
/// `"You're not my father"` becomes `YoureNotMyFather`.
///
/// Words that already carry lowercase letters keep their internal capitals,
/// so a canonical key normalizes to itself. Blank input gives an empty trope.
pub fn normalize(text: &str) -> Trope {
    let ascii = deunicode::deunicode(text);

    let cleaned: String = ascii
        .chars()
        .map(|c| if c == '-' { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .collect();

    let joined: String = cleaned.split_ascii_whitespace().map(title_word).collect();

    if joined.chars().any(|c| c.is_ascii_lowercase()) {
        Trope(joined)
    } else {
        Trope(title_case(&joined))
    }
}

/// Insert a space before each capital that follows a word character.
///
/// `ShoutOut` becomes `Shout Out`. Acronyms come out spaced letter by letter.
pub fn display_form(trope: &Trope) -> String {
    let mut out = String::with_capacity(trope.as_str().len() + 8);
    let mut prev: Option<char> = None;

    for c in trope.as_str().chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(is_word_char) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Split comma-separated input, trimming each segment.
///
/// Order, duplicates and empty segments are kept.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn title_word(word: &str) -> String {
    if word.chars().any(|c| c.is_ascii_lowercase()) {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut out = String::with_capacity(word.len());
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
                out
            }
            None => String::new(),
        }
    } else {
        title_case(word)
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            out.push(if in_run {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            });
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}
