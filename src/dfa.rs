use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::iter::FromIterator;

use indexmap::IndexMap;

use crate::nfa::{Label, Nfa, StateId, StateSet, Transition};

/// A deterministic automaton produced by subset construction.
///
/// The DFA is partial: a missing transition rejects the input. Use
/// [`Dfa::to_total`] for a variant with an explicit trap state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    start: StateId,
    accept_states: BTreeSet<StateId>,
    states: BTreeSet<StateId>,
    transitions: Vec<Transition>,
    alphabet: Vec<char>,
    // NFA states behind each DFA state, indexed by DFA id
    subsets: Vec<StateSet>,
    table: HashMap<StateId, HashMap<char, StateId>>,
}

impl Dfa {
    pub fn nfa2dfa(nfa: &Nfa) -> Self {
        let alphabet: Vec<char> = nfa.alphabet().into_iter().collect();
        let start_set = nfa.epsilon_expand(&StateSet::from_iter(Some(nfa.start())));

        // canonical key -> subset; the index of an entry is its DFA id
        let mut subsets: IndexMap<String, StateSet> = IndexMap::new();
        subsets.insert(start_set.key(), start_set);
        let mut transitions = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(0);

        while let Some(from) = queue.pop_front() {
            let current = subsets[from].clone();
            for &c in &alphabet {
                let moved = nfa.step(&current, c);
                if moved.is_empty() {
                    continue;
                }
                let next = nfa.epsilon_expand(&moved);
                let key = next.key();
                let to = match subsets.get_index_of(&key) {
                    Some(id) => id,
                    None => {
                        let (id, _) = subsets.insert_full(key, next);
                        trace!("dfa state {} = {{{}}}", id, subsets[id].key());
                        queue.push_back(id);
                        id
                    }
                };
                transitions.push(Transition {
                    from,
                    to,
                    label: Label::Input(c),
                });
            }
        }

        let subsets: Vec<StateSet> = subsets.into_values().collect();
        let accept_states = subsets
            .iter()
            .enumerate()
            .filter(|(_, set)| set.contains(&nfa.accept_state()))
            .map(|(id, _)| id)
            .collect();
        let dfa = Dfa::new(accept_states, alphabet, subsets, transitions);
        debug!(
            "built dfa with {} states, {} accepting, {} transitions",
            dfa.states.len(),
            dfa.accept_states.len(),
            dfa.transitions.len()
        );
        dfa
    }

    fn new(
        accept_states: BTreeSet<StateId>,
        alphabet: Vec<char>,
        subsets: Vec<StateSet>,
        transitions: Vec<Transition>,
    ) -> Self {
        let mut table: HashMap<StateId, HashMap<char, StateId>> = HashMap::new();
        for t in &transitions {
            if let Label::Input(c) = t.label {
                table.entry(t.from).or_insert_with(HashMap::new).insert(c, t.to);
            }
        }
        Dfa {
            start: 0,
            accept_states,
            states: (0..subsets.len()).collect(),
            transitions,
            alphabet,
            subsets,
            table,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept_states(&self) -> &BTreeSet<StateId> {
        &self.accept_states
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The NFA states a DFA state stands for. Empty for a trap state.
    pub fn subset(&self, state: StateId) -> Option<&StateSet> {
        self.subsets.get(state)
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accept_states.contains(&state)
    }

    pub fn next_state(&self, state: StateId, c: char) -> Option<StateId> {
        self.table.get(&state).and_then(|row| row.get(&c)).cloned()
    }

    pub fn accept(&self, s: &str) -> bool {
        let mut state = self.start;
        for c in s.chars() {
            match self.next_state(state, c) {
                Some(next_state) => state = next_state,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    /// True when every state has a transition for every alphabet symbol.
    pub fn is_total(&self) -> bool {
        self.transitions.len() == self.states.len() * self.alphabet.len()
    }

    /// Returns a copy in which every missing transition leads to a single
    /// non-accepting trap state that loops on every symbol.
    pub fn to_total(&self) -> Dfa {
        if self.is_total() {
            return self.clone();
        }
        let trap = self.states.len();
        let mut transitions = self.transitions.clone();
        for state in 0..=trap {
            for &c in &self.alphabet {
                if state == trap || self.next_state(state, c).is_none() {
                    transitions.push(Transition {
                        from: state,
                        to: trap,
                        label: Label::Input(c),
                    });
                }
            }
        }
        let mut subsets = self.subsets.clone();
        subsets.push(StateSet::new());
        Dfa::new(
            self.accept_states.clone(),
            self.alphabet.clone(),
            subsets,
            transitions,
        )
    }

    /// Language equality, checked by walking the product automaton. A
    /// missing transition on either side is treated as a trap.
    pub fn equivalent(&self, other: &Dfa) -> bool {
        let alphabet: BTreeSet<char> = self
            .alphabet
            .iter()
            .chain(other.alphabet.iter())
            .cloned()
            .collect();
        let accepting =
            |dfa: &Dfa, state: Option<StateId>| state.map_or(false, |s| dfa.is_accepting(s));

        let start = (Some(self.start), Some(other.start));
        let mut seen = HashSet::new();
        seen.insert(start);
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some((p, q)) = queue.pop_front() {
            if accepting(self, p) != accepting(other, q) {
                return false;
            }
            for &c in &alphabet {
                let next = (
                    p.and_then(|p| self.next_state(p, c)),
                    q.and_then(|q| other.next_state(q, c)),
                );
                if next == (None, None) {
                    continue;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        true
    }
}

#[cfg(test)]
fn compile(regex: &str) -> Dfa {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, regex).unwrap();
    Dfa::nfa2dfa(&nfa)
}

#[test]
fn regex_accept_char() {
    let dfa = compile("a");
    assert!(dfa.accept("a"));
    assert!(!dfa.accept(""));
    assert!(!dfa.accept("aa"));
}

#[test]
fn regex_accept_union() {
    let dfa = compile("a|b");
    assert!(dfa.accept("a"));
    assert!(dfa.accept("b"));
    assert!(!dfa.accept("ab"));
}

#[test]
fn regex_accept_concat() {
    let dfa = compile("ab");
    assert!(dfa.accept("ab"));
    assert!(!dfa.accept("a"));
    assert!(!dfa.accept("ba"));
}

#[test]
fn regex_accept_star() {
    let dfa = compile("a*");
    assert!(dfa.accept(""));
    assert!(dfa.accept("a"));
    assert!(dfa.accept("aaaaaaaaaaaaaaaa"));
    assert!(!dfa.accept("b"));
}

#[test]
fn regex_accept_01() {
    let dfa = compile("(a|b)c");
    assert!(dfa.accept("ac"));
    assert!(dfa.accept("bc"));
    assert!(!dfa.accept("c"));
}

#[test]
fn regex_accept_02() {
    let dfa = compile("a*c");
    assert!(dfa.accept("c"));
    assert!(dfa.accept("ac"));
    assert!(dfa.accept("aaaaac"));
    assert!(!dfa.accept(""));
}

#[test]
fn regex_accept_03() {
    let dfa = compile("(a|c)*");
    assert!(dfa.accept(""));
    assert!(dfa.accept("accccc"));
    assert!(dfa.accept("aaaaac"));
    assert!(dfa.accept("aaaaaaaaaaaaaaaa"));
    assert!(!dfa.accept("ab"));
}

#[test]
fn start_is_zero_and_closure_of_nfa_start() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, "a*").unwrap();
    let dfa = Dfa::nfa2dfa(&nfa);
    assert_eq!(dfa.start(), 0);
    let expected = nfa.epsilon_expand(&StateSet::from_iter(Some(nfa.start())));
    assert_eq!(dfa.subset(0), Some(&expected));
    assert!(dfa.is_accepting(0));
}

#[test]
fn one_transition_per_state_and_symbol() {
    let dfa = compile("(a|b)*abb");
    let mut seen = HashSet::new();
    for t in dfa.transitions() {
        assert!(!t.label.is_epsilon());
        assert!(seen.insert((t.from, t.label)));
    }
}

#[test]
fn textbook_dfa_shape() {
    let dfa = compile("(a|b)*abb");
    assert_eq!(dfa.states().len(), 5);
    assert_eq!(dfa.accept_states().len(), 1);
    assert!(dfa.is_total());
}

#[test]
fn missing_transition_rejects() {
    let dfa = compile("ab");
    assert!(!dfa.is_total());
    assert_eq!(dfa.next_state(0, 'b'), None);
    assert!(!dfa.accept("b"));
}

#[test]
fn total_variant_adds_trap() {
    let dfa = compile("ab");
    let total = dfa.to_total();
    assert!(total.is_total());
    let trap = dfa.states().len();
    assert_eq!(total.states().len(), trap + 1);
    assert!(!total.is_accepting(trap));
    assert_eq!(total.next_state(0, 'b'), Some(trap));
    assert_eq!(total.next_state(trap, 'a'), Some(trap));
    assert_eq!(total.subset(trap), Some(&StateSet::new()));
    assert!(total.equivalent(&dfa));
    for s in &["", "a", "ab", "abb", "ba"] {
        assert_eq!(total.accept(s), dfa.accept(s));
    }
}

#[test]
fn total_of_total_is_unchanged() {
    let dfa = compile("(a|b)*");
    assert!(dfa.is_total());
    assert_eq!(dfa.to_total(), dfa);
}

#[test]
fn equivalence_of_different_patterns() {
    assert!(compile("(a|b)*").equivalent(&compile("(a*b*)*")));
    assert!(compile("a|b").equivalent(&compile("b|a")));
    assert!(!compile("a*").equivalent(&compile("aa*")));
    assert!(!compile("a").equivalent(&compile("b")));
}
