//! Infix to postfix conversion.
//!
//! Patterns are made of single-character literals and the metacharacters
//! `|`, `*`, `(` and `)`. Concatenation is implicit in the input and is made
//! explicit with [`CONCAT`] before the operator-precedence pass.

use std::collections::HashMap;

use crate::error::PatternError;

pub const CONCAT: char = '.';
pub const UNION: char = '|';
pub const STAR: char = '*';
pub const OPEN: char = '(';
pub const CLOSE: char = ')';

/// Longest pattern `regex_to_postfix` will look at.
pub const MAX_PATTERN_LEN: usize = 4096;

lazy_static! {
    static ref PRECEDENCE: HashMap<char, u8> = {
        let mut m = HashMap::new();
        m.insert(UNION, 1);
        m.insert(CONCAT, 2);
        m.insert(STAR, 3);
        m
    };
}

#[derive(Debug, Clone, Copy)]
struct Token {
    ch: char,
    // position in the caller's pattern; a concat marker takes the position
    // of the operand that follows it
    position: usize,
}

fn explicit_tokens(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len() * 2);
    let mut prev: Option<char> = None;
    for (position, d) in pattern.chars().enumerate() {
        if let Some(c) = prev {
            let joins_left = c != OPEN && c != UNION;
            let starts_operand = d != STAR && d != UNION && d != CLOSE;
            if joins_left && starts_operand {
                tokens.push(Token {
                    ch: CONCAT,
                    position,
                });
            }
        }
        tokens.push(Token { ch: d, position });
        prev = Some(d);
    }
    tokens
}

/// Inserts an explicit [`CONCAT`] marker wherever concatenation is implied.
///
/// Parentheses are not checked here.
pub fn insert_concat(pattern: &str) -> String {
    explicit_tokens(pattern).iter().map(|t| t.ch).collect()
}

/// Converts an infix pattern to postfix (reverse polish) order using the
/// shunting-yard algorithm. All operators are left-associative.
pub fn regex_to_postfix(pattern: &str) -> Result<String, PatternError> {
    let len = pattern.chars().count();
    if len > MAX_PATTERN_LEN {
        return Err(PatternError::TooLong {
            len,
            max: MAX_PATTERN_LEN,
        });
    }

    let mut output = String::with_capacity(len * 2);
    let mut stack: Vec<Token> = Vec::new();

    for token in explicit_tokens(pattern) {
        match token.ch {
            OPEN => stack.push(token),
            CLOSE => loop {
                match stack.pop() {
                    Some(Token { ch: OPEN, .. }) => break,
                    Some(op) => output.push(op.ch),
                    None => {
                        return Err(PatternError::UnmatchedClose {
                            position: token.position,
                        })
                    }
                }
            },
            c => match PRECEDENCE.get(&c) {
                Some(&prec) => {
                    while let Some(top) = stack.last() {
                        match PRECEDENCE.get(&top.ch) {
                            Some(&top_prec) if top_prec >= prec => {
                                output.push(top.ch);
                                stack.pop();
                            }
                            _ => break,
                        }
                    }
                    stack.push(token);
                }
                None => output.push(c),
            },
        }
    }

    while let Some(token) = stack.pop() {
        if token.ch == OPEN {
            return Err(PatternError::UnclosedGroup {
                position: token.position,
            });
        }
        output.push(token.ch);
    }

    debug!("postfix of {:?} is {:?}", pattern, output);
    Ok(output)
}

#[test]
fn concat_inserted_between_operands() {
    assert_eq!(insert_concat("ab"), "a.b");
    assert_eq!(insert_concat("a*b"), "a*.b");
    assert_eq!(insert_concat("(a|b)c"), "(a|b).c");
    assert_eq!(insert_concat("a(b)"), "a.(b)");
    assert_eq!(insert_concat(")("), ").(");
}

#[test]
fn concat_not_inserted_around_operators() {
    assert_eq!(insert_concat("a|b"), "a|b");
    assert_eq!(insert_concat("a*"), "a*");
    assert_eq!(insert_concat("(a)"), "(a)");
    assert_eq!(insert_concat(""), "");
}

#[test]
fn postfix_of_known_patterns() {
    assert_eq!(regex_to_postfix("a|b").unwrap(), "ab|");
    assert_eq!(regex_to_postfix("ab*").unwrap(), "ab*.");
    assert_eq!(regex_to_postfix("(a|b)*abb").unwrap(), "ab|*a.b.b.");
    assert_eq!(regex_to_postfix("a|bc").unwrap(), "abc.|");
    assert_eq!(regex_to_postfix("abc").unwrap(), "ab.c.");
    assert_eq!(regex_to_postfix("a**").unwrap(), "a**");
    assert_eq!(regex_to_postfix("").unwrap(), "");
}

#[test]
fn postfix_rejects_unbalanced_parentheses() {
    assert_eq!(
        regex_to_postfix("a)b"),
        Err(PatternError::UnmatchedClose { position: 1 })
    );
    assert_eq!(
        regex_to_postfix("x(ab"),
        Err(PatternError::UnclosedGroup { position: 1 })
    );
    assert_eq!(
        regex_to_postfix("(a|b))"),
        Err(PatternError::UnmatchedClose { position: 5 })
    );
}

#[test]
fn postfix_rejects_oversized_pattern() {
    let pattern: String = std::iter::repeat('a').take(MAX_PATTERN_LEN + 1).collect();
    match regex_to_postfix(&pattern) {
        Err(PatternError::TooLong { len, max }) => {
            assert_eq!(len, MAX_PATTERN_LEN + 1);
            assert_eq!(max, MAX_PATTERN_LEN);
        }
        other => panic!("unexpected {:?}", other),
    }
}
