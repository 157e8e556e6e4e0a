//! Cleanup of patterns written for a host regex engine before they reach the
//! postfix converter, which would otherwise read unsupported syntax as
//! literal characters.

use crate::error::SanitizeError;
use crate::postfix::{CLOSE, CONCAT, OPEN, STAR, UNION};

const UNSUPPORTED: &[char] = &['[', ']', '+', '?', '\\', '{', '}', '^', '$', CONCAT];

/// Strips the `^...$` anchors, turns non-capturing groups `(?:` into plain
/// groups and drops whitespace. Any remaining character must be one of
/// `|*()` or a plain literal; when `alphabet` is given, literals must belong
/// to it.
///
/// Positions in errors refer to the cleaned pattern.
pub fn sanitize(pattern: &str, alphabet: Option<&str>) -> Result<String, SanitizeError> {
    let mut body = pattern.trim();
    if body.starts_with('^') {
        body = &body[1..];
    }
    if body.ends_with('$') {
        body = &body[..body.len() - 1];
    }
    let body: String = body
        .replace("(?:", "(")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    for (position, ch) in body.chars().enumerate() {
        if ch == OPEN || ch == CLOSE || ch == UNION || ch == STAR {
            continue;
        }
        if UNSUPPORTED.contains(&ch) {
            return Err(SanitizeError::UnsupportedChar { ch, position });
        }
        if let Some(alphabet) = alphabet {
            if !alphabet.contains(ch) {
                return Err(SanitizeError::OutsideAlphabet { ch });
            }
        }
    }
    Ok(body)
}

#[test]
fn strips_anchors_groups_and_whitespace() {
    assert_eq!(sanitize("^a(?:a|b)*a$", None).unwrap(), "a(a|b)*a");
    assert_eq!(sanitize("  a b | c ", None).unwrap(), "ab|c");
    assert_eq!(sanitize("ab", Some("ab")).unwrap(), "ab");
    assert_eq!(sanitize("^$", None).unwrap(), "");
}

#[test]
fn rejects_unsupported_syntax() {
    assert_eq!(
        sanitize("a[bc]", None),
        Err(SanitizeError::UnsupportedChar {
            ch: '[',
            position: 1
        })
    );
    assert_eq!(
        sanitize("^ab+$", None),
        Err(SanitizeError::UnsupportedChar {
            ch: '+',
            position: 2
        })
    );
    assert_eq!(
        sanitize("a.b", None),
        Err(SanitizeError::UnsupportedChar {
            ch: '.',
            position: 1
        })
    );
    assert!(sanitize("a^b", None).is_err());
}

#[test]
fn rejects_literals_outside_alphabet() {
    assert_eq!(
        sanitize("abc", Some("ab")),
        Err(SanitizeError::OutsideAlphabet { ch: 'c' })
    );
}
