//! Graphviz export.
//!
//! Automata are first lowered to a [`Graph`] of typed nodes and edges, which
//! is then flattened to DOT text.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::dfa::Dfa;
use crate::nfa::{Label, Nfa, StateId, Transition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: StateId,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: StateId,
    pub to: StateId,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub start: StateId,
    pub nodes: Vec<Node>,
    /// In transition-list order.
    pub edges: Vec<Edge>,
}

fn edges(transitions: &[Transition]) -> Vec<Edge> {
    transitions
        .iter()
        .map(|t| Edge {
            from: t.from,
            to: t.to,
            label: t.label,
        })
        .collect()
}

impl Graph {
    pub fn from_nfa(nfa: &Nfa) -> Graph {
        Graph {
            start: nfa.start(),
            nodes: nfa
                .states()
                .iter()
                .map(|&id| Node {
                    id,
                    accepting: id == nfa.accept_state(),
                })
                .collect(),
            edges: edges(nfa.transitions()),
        }
    }

    pub fn from_dfa(dfa: &Dfa) -> Graph {
        Graph {
            start: dfa.start(),
            nodes: dfa
                .states()
                .iter()
                .map(|&id| Node {
                    id,
                    accepting: dfa.is_accepting(id),
                })
                .collect(),
            edges: edges(dfa.transitions()),
        }
    }

    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph G {\nrankdir=LR;\nempty [label = \"\" shape = plaintext];\n");
        for node in &self.nodes {
            let shape = if node.accepting {
                "doublecircle"
            } else {
                "circle"
            };
            // writing to a String cannot fail
            let _ = writeln!(dot, "s{} [shape = {}];", node.id, shape);
        }
        let _ = writeln!(dot, "empty -> s{} [label = \"start\"];", self.start);
        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "s{} -> s{} [label = \"{}\"];",
                edge.from,
                edge.to,
                escape(&edge.label.to_string())
            );
        }
        dot.push('}');
        dot.push('\n');
        dot
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn write_file<P: AsRef<Path>>(path: P, dot: &str) -> io::Result<()> {
    let mut f = BufWriter::new(fs::File::create(path)?);
    f.write_all(dot.as_bytes())?;
    f.flush()
}

pub fn nfa_to_dot(nfa: &Nfa) -> String {
    Graph::from_nfa(nfa).to_dot()
}

pub fn dfa_to_dot(dfa: &Dfa) -> String {
    Graph::from_dfa(dfa).to_dot()
}

impl Nfa {
    pub fn dot(&self) -> String {
        nfa_to_dot(self)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        write_file(path, &self.dot())
    }
}

impl Dfa {
    pub fn dot(&self) -> String {
        dfa_to_dot(self)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        write_file(path, &self.dot())
    }
}

#[cfg(test)]
fn sorted_edge_lines(dot: &str) -> Vec<String> {
    let mut lines: Vec<String> = dot
        .lines()
        .filter(|l| l.contains(" -> s") && !l.starts_with("empty"))
        .map(|l| l.to_owned())
        .collect();
    lines.sort();
    lines
}

#[test]
fn dfa_dot_for_concat() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, "ab").unwrap();
    let dot = Dfa::nfa2dfa(&nfa).dot();
    assert!(dot.starts_with("digraph G {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("empty -> s0 [label = \"start\"];"));
    assert!(dot.contains("s2 [shape = doublecircle];"));
    assert!(dot.contains("s0 [shape = circle];"));
    assert_eq!(
        sorted_edge_lines(&dot),
        vec![
            "s0 -> s1 [label = \"a\"];".to_owned(),
            "s1 -> s2 [label = \"b\"];".to_owned(),
        ]
    );
}

#[test]
fn nfa_dot_uses_epsilon_glyph() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, "ab").unwrap();
    let dot = nfa.dot();
    assert_eq!(
        sorted_edge_lines(&dot),
        vec![
            "s0 -> s1 [label = \"a\"];".to_owned(),
            "s1 -> s2 [label = \"ε\"];".to_owned(),
            "s2 -> s3 [label = \"b\"];".to_owned(),
        ]
    );
    assert!(dot.contains("s3 [shape = doublecircle];"));
}

#[test]
fn every_state_declared_once() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, "(a|b)*abb").unwrap();
    let dot = nfa.dot();
    for id in nfa.states() {
        let decl = format!("s{} [shape", id);
        assert_eq!(dot.lines().filter(|l| l.starts_with(&decl)).count(), 1);
    }
    assert_eq!(dot.matches("doublecircle").count(), 1);
}

#[test]
fn labels_are_escaped() {
    let graph = Graph {
        start: 0,
        nodes: vec![
            Node {
                id: 0,
                accepting: false,
            },
            Node {
                id: 1,
                accepting: true,
            },
        ],
        edges: vec![Edge {
            from: 0,
            to: 1,
            label: Label::Input('"'),
        }],
    };
    assert!(graph.to_dot().contains("s0 -> s1 [label = \"\\\"\"];"));
}

#[test]
fn write_creates_file() {
    let mut ctx = crate::nfa::BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, "a*").unwrap();
    let path = std::env::temp_dir().join(format!("regraph-dot-{}.dot", std::process::id()));
    nfa.write(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(text, nfa.dot());
}
