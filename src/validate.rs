//! Structural checks of a DFA and its fit against labelled example strings.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use crate::dfa::Dfa;
use crate::nfa::{Label, StateId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingTransition { state: StateId, symbol: char },
    UnknownTarget { from: StateId, to: StateId },
    Unreachable { state: StateId },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Issue::MissingTransition { state, symbol } => {
                write!(f, "missing transition: δ({}, {})", state, symbol)
            }
            Issue::UnknownTarget { from, to } => {
                write!(f, "transition from {} to unknown state {}", from, to)
            }
            Issue::Unreachable { state } => write!(f, "unreachable state {}", state),
        }
    }
}

/// Reports missing transitions, dangling targets and states the start state
/// cannot reach. An empty result means the DFA is total and trim.
pub fn check_structure(dfa: &Dfa) -> Vec<Issue> {
    let mut issues = Vec::new();
    for &state in dfa.states() {
        for &symbol in dfa.alphabet() {
            if dfa.next_state(state, symbol).is_none() {
                issues.push(Issue::MissingTransition { state, symbol });
            }
        }
    }
    for t in dfa.transitions() {
        if !dfa.states().contains(&t.to) {
            issues.push(Issue::UnknownTarget {
                from: t.from,
                to: t.to,
            });
        }
    }

    let mut reachable = BTreeSet::new();
    let mut queue = VecDeque::new();
    reachable.insert(dfa.start());
    queue.push_back(dfa.start());
    while let Some(state) = queue.pop_front() {
        for t in dfa.transitions().iter().filter(|t| t.from == state) {
            if let Label::Input(_) = t.label {
                if reachable.insert(t.to) {
                    queue.push_back(t.to);
                }
            }
        }
    }
    for &state in dfa.states() {
        if !reachable.contains(&state) {
            issues.push(Issue::Unreachable { state });
        }
    }
    issues
}

/// Confusion matrix of a DFA used as a classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub true_pos: usize,
    pub false_pos: usize,
    pub false_neg: usize,
    pub true_neg: usize,
}

impl Metrics {
    pub fn precision(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_neg)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.true_pos + self.false_pos + self.false_neg + self.true_neg;
        (self.true_pos + self.true_neg) as f64 / total.max(1) as f64
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn evaluate<S: AsRef<str>>(dfa: &Dfa, positives: &[S], negatives: &[S]) -> Metrics {
    let mut m = Metrics::default();
    for s in positives {
        if dfa.accept(s.as_ref()) {
            m.true_pos += 1;
        } else {
            m.false_neg += 1;
        }
    }
    for s in negatives {
        if dfa.accept(s.as_ref()) {
            m.false_pos += 1;
        } else {
            m.true_neg += 1;
        }
    }
    m
}

#[cfg(test)]
fn compile(regex: &str) -> Dfa {
    let mut ctx = crate::nfa::BuildContext::new();
    Dfa::nfa2dfa(&crate::nfa::Nfa::re2nfa(&mut ctx, regex).unwrap())
}

#[test]
fn partial_dfa_reports_missing_transitions() {
    let issues = check_structure(&compile("ab"));
    assert_eq!(issues.len(), 4);
    assert!(issues.contains(&Issue::MissingTransition {
        state: 0,
        symbol: 'b'
    }));
    assert!(issues
        .iter()
        .all(|i| matches!(i, Issue::MissingTransition { .. })));
    assert!(check_structure(&compile("ab").to_total()).is_empty());
}

#[test]
fn metrics_from_examples() {
    let dfa = compile("a(a|b)*a");
    let m = evaluate(&dfa, &["aa", "aba", "ab"], &["b", "ba", "aab"]);
    assert_eq!(
        m,
        Metrics {
            true_pos: 2,
            false_pos: 0,
            false_neg: 1,
            true_neg: 3,
        }
    );
    assert_eq!(m.precision(), 1.0);
    assert!((m.recall() - 2.0 / 3.0).abs() < 1e-9);
    assert!((m.f1() - 0.8).abs() < 1e-9);
    assert!((m.accuracy() - 5.0 / 6.0).abs() < 1e-9);
}

#[test]
fn empty_metrics_are_zero() {
    let m = Metrics::default();
    assert_eq!(m.f1(), 0.0);
    assert_eq!(m.accuracy(), 0.0);
}

#[test]
fn issue_display() {
    let issue = Issue::MissingTransition {
        state: 2,
        symbol: 'a',
    };
    assert_eq!(issue.to_string(), "missing transition: δ(2, a)");
}
