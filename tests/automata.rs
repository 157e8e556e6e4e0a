extern crate quickcheck;
extern crate regraph;

use std::collections::HashSet;

use quickcheck::{quickcheck, Arbitrary, Gen};
use regraph::{
    dfa_to_dot, nfa_to_dfa, nfa_to_dot, postfix_to_nfa, regex_to_postfix, BuildContext,
    BuildError, Nfa, PatternError,
};

/// A well-formed pattern over `a` and `b`.
#[derive(Clone, Debug)]
struct Pattern(String);

fn gen_pattern(g: &mut Gen, depth: usize) -> String {
    let choice = if depth == 0 {
        0
    } else {
        *g.choose(&[0u8, 0, 1, 2, 3]).unwrap()
    };
    match choice {
        0 => g.choose(&['a', 'b']).unwrap().to_string(),
        1 => format!("{}{}", gen_pattern(g, depth - 1), gen_pattern(g, depth - 1)),
        2 => format!("({}|{})", gen_pattern(g, depth - 1), gen_pattern(g, depth - 1)),
        _ => format!("({})*", gen_pattern(g, depth - 1)),
    }
}

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = *g.choose(&[1usize, 2, 3, 4]).unwrap();
        Pattern(gen_pattern(g, depth))
    }
}

fn strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for s in &frontier {
            for &c in alphabet {
                let mut t = s.clone();
                t.push(c);
                next.push(t);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn build(pattern: &str) -> Nfa {
    let mut ctx = BuildContext::new();
    Nfa::re2nfa(&mut ctx, pattern).unwrap()
}

quickcheck! {
    fn dfa_agrees_with_nfa(p: Pattern) -> bool {
        let nfa = build(&p.0);
        let dfa = nfa_to_dfa(&nfa);
        let alphabet: Vec<char> = nfa.alphabet().into_iter().collect();
        strings(&alphabet, 6)
            .iter()
            .all(|s| dfa.accept(s) == nfa.accept(s))
    }

    fn dfa_is_deterministic(p: Pattern) -> bool {
        let dfa = nfa_to_dfa(&build(&p.0));
        let mut seen = HashSet::new();
        dfa.transitions()
            .iter()
            .all(|t| !t.label.is_epsilon() && seen.insert((t.from, t.label)))
    }

    fn reset_builds_are_identical(p: Pattern) -> bool {
        let mut ctx = BuildContext::new();
        let first = Nfa::re2nfa(&mut ctx, &p.0).unwrap();
        ctx.reset();
        let second = Nfa::re2nfa(&mut ctx, &p.0).unwrap();
        first == second && nfa_to_dot(&first) == nfa_to_dot(&second)
    }

    fn total_dfa_is_equivalent(p: Pattern) -> bool {
        let dfa = nfa_to_dfa(&build(&p.0));
        let total = dfa.to_total();
        total.is_total() && total.equivalent(&dfa) && dfa.equivalent(&total)
    }
}

#[test]
fn postfix_examples() {
    assert_eq!(regex_to_postfix("a|b").unwrap(), "ab|");
    assert_eq!(regex_to_postfix("ab*").unwrap(), "ab*.");
    assert_eq!(regex_to_postfix("(a|b)*abb").unwrap(), "ab|*a.b.b.");
}

#[test]
fn single_literal_nfa() {
    for c in &['a', 'z', '0', '#'] {
        let nfa = build(&c.to_string());
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.transitions().len(), 1);
    }
}

#[test]
fn textbook_pattern_accepts_suffix_abb() {
    let mut ctx = BuildContext::new();
    let postfix = regex_to_postfix("(a|b)*abb").unwrap();
    let nfa = postfix_to_nfa(&mut ctx, &postfix).unwrap();
    let dfa = nfa_to_dfa(&nfa);
    for s in &["abb", "aabb", "babb", "aaaabb"] {
        assert!(dfa.accept(s), "{:?} should be accepted", s);
    }
    for s in &["", "ab", "abbb", "abba", "c", "abbc"] {
        assert!(!dfa.accept(s), "{:?} should be rejected", s);
    }
    for s in strings(&['a', 'b'], 8) {
        assert_eq!(dfa.accept(&s), s.ends_with("abb"), "{:?}", s);
    }
}

#[test]
fn builds_without_reset_are_isomorphic() {
    let mut ctx = BuildContext::new();
    let first = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
    let second = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
    let offset = first.states().len();
    assert_ne!(first, second);
    let shifted: Vec<usize> = second.states().iter().map(|id| id - offset).collect();
    let original: Vec<usize> = first.states().iter().cloned().collect();
    assert_eq!(shifted, original);
    assert_eq!(second.start() - offset, first.start());
    assert_eq!(second.accept_state() - offset, first.accept_state());
    for (a, b) in first.transitions().iter().zip(second.transitions()) {
        assert_eq!((a.from, a.to, a.label), (b.from - offset, b.to - offset, b.label));
    }
}

#[test]
fn exported_graphs_declare_each_state_once() {
    let nfa = build("(a|b)*a(b|a)b*");
    let dfa = nfa_to_dfa(&nfa);
    let nfa_dot = nfa_to_dot(&nfa);
    let dfa_dot = dfa_to_dot(&dfa);

    let declared = |dot: &str, id: usize| {
        let decl = format!("s{} [shape", id);
        dot.lines().filter(|l| l.starts_with(&decl)).count()
    };
    for t in nfa.transitions() {
        assert_eq!(declared(&nfa_dot, t.from), 1);
        assert_eq!(declared(&nfa_dot, t.to), 1);
    }
    for t in dfa.transitions() {
        assert_eq!(declared(&dfa_dot, t.from), 1);
        assert_eq!(declared(&dfa_dot, t.to), 1);
    }
    assert_eq!(nfa_dot.matches("doublecircle").count(), 1);
    assert_eq!(
        dfa_dot.matches("doublecircle").count(),
        dfa.accept_states().len()
    );
    for id in dfa.accept_states() {
        assert!(dfa_dot.contains(&format!("s{} [shape = doublecircle];", id)));
    }
    assert_eq!(nfa_dot.matches("[label = \"start\"]").count(), 1);
    assert!(nfa_dot.contains("ε"));
    assert!(!dfa_dot.contains("ε"));
}

#[test]
fn malformed_patterns_fail_whole_build() {
    let mut ctx = BuildContext::new();
    assert_eq!(
        Nfa::re2nfa(&mut ctx, "(a|b"),
        Err(BuildError::Pattern(PatternError::UnclosedGroup { position: 0 }))
    );
    assert_eq!(
        Nfa::re2nfa(&mut ctx, "a)"),
        Err(BuildError::Pattern(PatternError::UnmatchedClose { position: 1 }))
    );
    for pattern in &["", "|", "a|", "*", "()", "(|a)"] {
        match Nfa::re2nfa(&mut ctx, pattern) {
            Err(BuildError::BuildFailed(_)) => {}
            other => panic!("{:?} gave {:?}", pattern, other),
        }
    }
}
