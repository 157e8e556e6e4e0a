use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};

use crate::error::BuildError;
use crate::postfix::{self, CLOSE, CONCAT, OPEN, STAR, UNION};

pub type StateId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Epsilon,
    Input(char),
}

impl Label {
    pub fn is_epsilon(&self) -> bool {
        *self == Label::Epsilon
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Label::Epsilon => f.write_str("ε"),
            Label::Input(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub label: Label,
}

impl Transition {
    fn epsilon(from: StateId, to: StateId) -> Self {
        Transition {
            from,
            to,
            label: Label::Epsilon,
        }
    }
}

/// Hands out state ids for a single build.
///
/// Create a fresh context (or call [`BuildContext::reset`]) before each
/// independent compilation so that ids start at zero.
#[derive(Debug, Default)]
pub struct BuildContext {
    next: StateId,
}

impl BuildContext {
    pub fn new() -> Self {
        BuildContext { next: 0 }
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn next_id(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out since creation or the last reset.
    pub fn allocated(&self) -> usize {
        self.next
    }
}

/// An ordered set of NFA states. Its ordering makes [`StateSet::key`]
/// canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateSet(pub BTreeSet<StateId>);

impl StateSet {
    pub fn new() -> StateSet {
        StateSet(BTreeSet::new())
    }

    /// Ascending ids joined with commas, e.g. `"0,1,4"`.
    pub fn key(&self) -> String {
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        ids.join(",")
    }
}

impl Deref for StateSet {
    type Target = BTreeSet<StateId>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StateSet {
    fn deref_mut(&mut self) -> &mut BTreeSet<StateId> {
        &mut self.0
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        StateSet(iter.into_iter().collect())
    }
}

// A partial automaton with a single entry and a single exit. Only lives on
// the construction stack.
#[derive(Debug)]
struct Fragment {
    start: StateId,
    accept: StateId,
    states: Vec<StateId>,
    transitions: Vec<Transition>,
}

impl Fragment {
    fn literal(ctx: &mut BuildContext, c: char) -> Fragment {
        let s = ctx.next_id();
        let f = ctx.next_id();
        Fragment {
            start: s,
            accept: f,
            states: vec![s, f],
            transitions: vec![Transition {
                from: s,
                to: f,
                label: Label::Input(c),
            }],
        }
    }

    fn star(ctx: &mut BuildContext, inner: Fragment) -> Fragment {
        let s = ctx.next_id();
        let f = ctx.next_id();
        let mut states = inner.states;
        states.push(s);
        states.push(f);
        let mut transitions = inner.transitions;
        transitions.push(Transition::epsilon(s, inner.start));
        transitions.push(Transition::epsilon(s, f));
        transitions.push(Transition::epsilon(inner.accept, s));
        transitions.push(Transition::epsilon(inner.accept, f));
        Fragment {
            start: s,
            accept: f,
            states,
            transitions,
        }
    }

    fn concat(first: Fragment, second: Fragment) -> Fragment {
        let mut states = first.states;
        states.extend(second.states);
        let mut transitions = first.transitions;
        transitions.extend(second.transitions);
        transitions.push(Transition::epsilon(first.accept, second.start));
        Fragment {
            start: first.start,
            accept: second.accept,
            states,
            transitions,
        }
    }

    fn union(ctx: &mut BuildContext, left: Fragment, right: Fragment) -> Fragment {
        let s = ctx.next_id();
        let f = ctx.next_id();
        let mut states = left.states;
        states.extend(right.states);
        states.push(s);
        states.push(f);
        let mut transitions = left.transitions;
        transitions.extend(right.transitions);
        transitions.push(Transition::epsilon(s, left.start));
        transitions.push(Transition::epsilon(s, right.start));
        transitions.push(Transition::epsilon(left.accept, f));
        transitions.push(Transition::epsilon(right.accept, f));
        Fragment {
            start: s,
            accept: f,
            states,
            transitions,
        }
    }
}

fn pop_operand(stack: &mut Vec<Fragment>, op: char) -> Result<Fragment, BuildError> {
    stack
        .pop()
        .ok_or_else(|| BuildError::BuildFailed(format!("operator {:?} is missing an operand", op)))
}

/// A Thompson NFA with exactly one start and one accepting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    start: StateId,
    accept: StateId,
    states: BTreeSet<StateId>,
    transitions: Vec<Transition>,
    // state -> indices into `transitions` leaving it
    outgoing: HashMap<StateId, Vec<usize>>,
}

impl Nfa {
    /// Converts `regex` to postfix and runs Thompson construction on it.
    pub fn re2nfa(ctx: &mut BuildContext, regex: &str) -> Result<Nfa, BuildError> {
        let postfix = postfix::regex_to_postfix(regex)?;
        Nfa::from_postfix(ctx, &postfix)
    }

    /// Thompson construction over a postfix token string.
    pub fn from_postfix(ctx: &mut BuildContext, postfix: &str) -> Result<Nfa, BuildError> {
        let mut stack: Vec<Fragment> = Vec::new();
        for c in postfix.chars() {
            let fragment = match c {
                STAR => {
                    let inner = pop_operand(&mut stack, c)?;
                    Fragment::star(ctx, inner)
                }
                CONCAT => {
                    let second = pop_operand(&mut stack, c)?;
                    let first = pop_operand(&mut stack, c)?;
                    Fragment::concat(first, second)
                }
                UNION => {
                    let right = pop_operand(&mut stack, c)?;
                    let left = pop_operand(&mut stack, c)?;
                    Fragment::union(ctx, left, right)
                }
                OPEN | CLOSE => {
                    return Err(BuildError::BuildFailed(format!(
                        "parenthesis {:?} in postfix input",
                        c
                    )))
                }
                c => Fragment::literal(ctx, c),
            };
            stack.push(fragment);
        }

        let remaining = stack.len();
        let fragment = match stack.pop() {
            Some(fragment) if remaining == 1 => fragment,
            _ => {
                return Err(BuildError::BuildFailed(format!(
                    "postfix {:?} left {} fragments, expected 1",
                    postfix, remaining
                )))
            }
        };

        let nfa = Nfa::new(
            fragment.start,
            fragment.accept,
            fragment.states,
            fragment.transitions,
        );
        debug!(
            "built nfa with {} states and {} transitions from {:?}",
            nfa.states.len(),
            nfa.transitions.len(),
            postfix
        );
        Ok(nfa)
    }

    fn new<S>(start: StateId, accept: StateId, states: S, transitions: Vec<Transition>) -> Nfa
    where
        S: IntoIterator<Item = StateId>,
    {
        let mut outgoing: HashMap<StateId, Vec<usize>> = HashMap::new();
        for (i, t) in transitions.iter().enumerate() {
            outgoing.entry(t.from).or_insert_with(Vec::new).push(i);
        }
        Nfa {
            start,
            accept,
            states: states.into_iter().collect(),
            transitions,
            outgoing,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept_state(&self) -> StateId {
        self.accept
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Distinct non-epsilon symbols, ascending.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .filter_map(|t| match t.label {
                Label::Input(c) => Some(c),
                Label::Epsilon => None,
            })
            .collect()
    }

    fn outgoing(&self, state: StateId) -> impl Iterator<Item = &Transition> {
        self.outgoing
            .get(&state)
            .into_iter()
            .flat_map(move |ids| ids.iter().map(move |&i| &self.transitions[i]))
    }

    /// Epsilon-closure of `state_set`.
    pub fn epsilon_expand(&self, state_set: &StateSet) -> StateSet {
        let mut queue: Vec<StateId> = state_set.iter().cloned().collect();
        let mut done = state_set.clone();
        while let Some(state_id) = queue.pop() {
            for t in self.outgoing(state_id).filter(|t| t.label.is_epsilon()) {
                if done.insert(t.to) {
                    queue.push(t.to);
                }
            }
        }
        done
    }

    /// States reachable from `state_set` over one `symbol` edge. No closure
    /// is applied.
    pub fn step(&self, state_set: &StateSet, symbol: char) -> StateSet {
        state_set
            .iter()
            .flat_map(|&id| self.outgoing(id))
            .filter(|t| t.label == Label::Input(symbol))
            .map(|t| t.to)
            .collect()
    }

    /// Runs `s` through the automaton by tracking the set of live states.
    pub fn accept(&self, s: &str) -> bool {
        let mut current = self.epsilon_expand(&StateSet::from_iter(Some(self.start)));
        for c in s.chars() {
            current = self.epsilon_expand(&self.step(&current, c));
            if current.is_empty() {
                return false;
            }
        }
        current.contains(&self.accept)
    }
}

#[cfg(test)]
fn build(regex: &str) -> Nfa {
    let mut ctx = BuildContext::new();
    Nfa::re2nfa(&mut ctx, regex).unwrap()
}

#[test]
fn literal_has_two_states_and_one_transition() {
    let nfa = build("a");
    assert_eq!(nfa.states().len(), 2);
    assert_eq!(nfa.transitions().len(), 1);
    assert_eq!(nfa.start(), 0);
    assert_eq!(nfa.accept_state(), 1);
    assert_eq!(nfa.transitions()[0].label, Label::Input('a'));
}

#[test]
fn transitions_only_reference_known_states() {
    let nfa = build("(a|b)*abb");
    for t in nfa.transitions() {
        assert!(nfa.states().contains(&t.from));
        assert!(nfa.states().contains(&t.to));
    }
    assert!(nfa.states().contains(&nfa.start()));
    assert!(nfa.states().contains(&nfa.accept_state()));
}

#[test]
fn star_adds_four_epsilon_edges() {
    let nfa = build("a*");
    assert_eq!(nfa.states().len(), 4);
    let eps = nfa
        .transitions()
        .iter()
        .filter(|t| t.label.is_epsilon())
        .count();
    assert_eq!(eps, 4);
    assert_eq!(nfa.start(), 2);
    assert_eq!(nfa.accept_state(), 3);
}

#[test]
fn union_and_concat_state_counts() {
    assert_eq!(build("a|b").states().len(), 6);
    assert_eq!(build("ab").states().len(), 4);
    assert_eq!(build("ab").transitions().len(), 3);
}

#[test]
fn accept_state_has_no_outgoing_edges() {
    let nfa = build("(a|b)*abb");
    assert_eq!(nfa.outgoing(nfa.accept_state()).count(), 0);
}

#[test]
fn epsilon_expand_follows_chains() {
    let nfa = build("a*");
    let closure = nfa.epsilon_expand(&StateSet::from_iter(vec![2]));
    assert_eq!(closure, StateSet::from_iter(vec![0, 2, 3]));
    let closure = nfa.epsilon_expand(&StateSet::from_iter(vec![1]));
    assert_eq!(closure, StateSet::from_iter(vec![0, 1, 2, 3]));
    assert!(nfa.epsilon_expand(&StateSet::new()).is_empty());
}

#[test]
fn step_does_not_close() {
    let nfa = build("ab");
    let moved = nfa.step(&StateSet::from_iter(vec![0]), 'a');
    assert_eq!(moved, StateSet::from_iter(vec![1]));
    assert!(nfa.step(&StateSet::from_iter(vec![0]), 'b').is_empty());
}

#[test]
fn nfa_accept_simulates() {
    let nfa = build("(a|b)*abb");
    assert!(nfa.accept("abb"));
    assert!(nfa.accept("babb"));
    assert!(!nfa.accept("ab"));
    assert!(!nfa.accept(""));
    assert!(!nfa.accept("abc"));
}

#[test]
fn malformed_postfix_fails() {
    let mut ctx = BuildContext::new();
    for postfix in &["", "ab", "|", "a|", "*", "a.", "ab.c"] {
        match Nfa::from_postfix(&mut ctx, postfix) {
            Err(BuildError::BuildFailed(_)) => {}
            other => panic!("{:?} gave {:?}", postfix, other),
        }
    }
}

#[test]
fn malformed_pattern_is_reported() {
    let mut ctx = BuildContext::new();
    match Nfa::re2nfa(&mut ctx, "(ab") {
        Err(BuildError::Pattern(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn reset_context_reproduces_build() {
    let mut ctx = BuildContext::new();
    let first = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
    assert_eq!(ctx.allocated(), first.states().len());
    ctx.reset();
    let second = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
    assert_eq!(first, second);
}

#[test]
fn state_set_key_is_sorted() {
    let set: StateSet = vec![4, 0, 12, 1].into_iter().collect();
    assert_eq!(set.key(), "0,1,4,12");
    assert_eq!(StateSet::new().key(), "");
}
