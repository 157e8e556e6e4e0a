//! Compiles a small regular-expression language (literals, `|`, `*` and
//! parentheses) into automata and renders them as Graphviz graphs.
//!
//! ```
//! use regraph::{BuildContext, Dfa, Nfa};
//!
//! let mut ctx = BuildContext::new();
//! let nfa = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
//! let dfa = Dfa::nfa2dfa(&nfa);
//! assert!(dfa.accept("babb"));
//! assert!(dfa.dot().starts_with("digraph G {"));
//! ```

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod config;
pub mod dfa;
pub mod dot;
pub mod error;
pub mod nfa;
pub mod postfix;
pub mod sanitize;
pub mod table;
pub mod validate;

pub use crate::dfa::Dfa;
pub use crate::dot::{dfa_to_dot, nfa_to_dot, Graph};
pub use crate::error::{BuildError, PatternError, SanitizeError};
pub use crate::nfa::{BuildContext, Label, Nfa, StateId, StateSet, Transition};
pub use crate::postfix::{insert_concat, regex_to_postfix};

/// Thompson construction over a postfix string, see [`Nfa::from_postfix`].
pub fn postfix_to_nfa(ctx: &mut BuildContext, postfix: &str) -> Result<Nfa, BuildError> {
    Nfa::from_postfix(ctx, postfix)
}

/// Subset construction, see [`Dfa::nfa2dfa`].
pub fn nfa_to_dfa(nfa: &Nfa) -> Dfa {
    Dfa::nfa2dfa(nfa)
}
