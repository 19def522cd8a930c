//! URL slug generation for organizations and projects.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Build a URL-friendly slug from a display name.
///
/// Text is decomposed (NFD) and combining marks are removed, so accented
/// letters keep their base letter. Characters other than ASCII letters,
/// digits, `_`, `-` and whitespace are then dropped, whitespace runs
/// become a single `-`, repeated dashes collapse and leading/trailing dashes
/// are trimmed. The result is lowercase.
///
/// # Examples
///
/// ```
/// use saas_org::create_slug;
///
/// assert_eq!(create_slug("Acme Corp"), "acme-corp");
/// assert_eq!(create_slug("  Café -- Olé! "), "cafe-ole");
/// ```
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)).map(fold_stroke) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// Latin letters with a stroke have no canonical decomposition.
fn fold_stroke(c: char) -> char {
    match c {
        'ł' => 'l',
        'Ł' => 'L',
        'ø' => 'o',
        'Ø' => 'O',
        'đ' => 'd',
        'Đ' => 'D',
        'ħ' => 'h',
        'Ħ' => 'H',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(create_slug("Marketing Docs"), "marketing-docs");
        assert_eq!(create_slug("API v2"), "api-v2");
    }

    #[test]
    fn test_accents_are_folded() {
        assert_eq!(create_slug("São Paulo Ação"), "sao-paulo-acao");
        assert_eq!(create_slug("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_caron_letters_keep_their_base() {
        assert_eq!(create_slug("Škoda"), "skoda");
        assert_eq!(create_slug("Škoda Žilina Łódź"), "skoda-zilina-lodz");
        assert_eq!(create_slug("Dvořák Øresund"), "dvorak-oresund");
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(create_slug("Rocket & Co."), "rocket-co");
        assert_eq!(create_slug("hello_world!"), "hello_world");
    }

    #[test]
    fn test_dashes_collapse_and_trim() {
        assert_eq!(create_slug("--a   --  b--"), "a-b");
        assert_eq!(create_slug("   "), "");
    }
}
