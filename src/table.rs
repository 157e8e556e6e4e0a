//! Transition tables as CSV: `state,<symbols...>,accepting`.

use crate::dfa::Dfa;

pub fn to_csv(dfa: &Dfa) -> String {
    let mut out = String::from("state");
    for c in dfa.alphabet() {
        out.push(',');
        out.push(*c);
    }
    out.push_str(",accepting\n");

    for &state in dfa.states() {
        out.push_str(&state.to_string());
        for &c in dfa.alphabet() {
            out.push(',');
            if let Some(next) = dfa.next_state(state, c) {
                out.push_str(&next.to_string());
            }
        }
        out.push_str(if dfa.is_accepting(state) { ",1\n" } else { ",0\n" });
    }
    out
}

#[test]
fn table_leaves_missing_cells_empty() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = crate::nfa::Nfa::re2nfa(&mut ctx, "ab").unwrap();
    let csv = to_csv(&Dfa::nfa2dfa(&nfa));
    assert_eq!(csv, "state,a,b,accepting\n0,1,,0\n1,,2,0\n2,,,1\n");
}

#[test]
fn total_table_has_no_empty_cells() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = crate::nfa::Nfa::re2nfa(&mut ctx, "ab").unwrap();
    let csv = to_csv(&Dfa::nfa2dfa(&nfa).to_total());
    assert!(!csv.contains(",,"));
    assert!(csv.ends_with("3,3,3,0\n"));
}
