extern crate anyhow;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate regraph;

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regraph::config::Config;
use regraph::sanitize::sanitize;
use regraph::{table, validate, BuildContext, Dfa, Nfa};

fn load_lines(path: &Path) -> Result<Vec<String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_owned())
        .collect())
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args(env::args().skip(1))?;
    let regex = sanitize(&config.pattern, config.alphabet.as_deref())
        .with_context(|| format!("cannot use pattern {:?}", config.pattern))?;

    let mut ctx = BuildContext::new();
    let nfa = Nfa::re2nfa(&mut ctx, &regex)
        .with_context(|| format!("cannot compile pattern {:?}", regex))?;
    let mut dfa = Dfa::nfa2dfa(&nfa);
    if config.total {
        dfa = dfa.to_total();
    }

    nfa.write(&config.nfa_dot)
        .with_context(|| format!("writing {}", config.nfa_dot.display()))?;
    dfa.write(&config.dfa_dot)
        .with_context(|| format!("writing {}", config.dfa_dot.display()))?;
    fs::write(&config.csv, table::to_csv(&dfa))
        .with_context(|| format!("writing {}", config.csv.display()))?;

    info!("pattern: {}", regex);
    info!(
        "nfa: {} states, {} transitions",
        nfa.states().len(),
        nfa.transitions().len()
    );
    info!(
        "dfa: {} states, {} accepting, {} transitions",
        dfa.states().len(),
        dfa.accept_states().len(),
        dfa.transitions().len()
    );
    for issue in validate::check_structure(&dfa) {
        debug!("{}", issue);
    }

    if let Some((good, bad)) = &config.examples {
        let positives = load_lines(good)?;
        let negatives = load_lines(bad)?;
        let m = validate::evaluate(&dfa, &positives, &negatives);
        info!(
            "TP={} FP={} FN={} TN={}",
            m.true_pos, m.false_pos, m.false_neg, m.true_neg
        );
        info!(
            "precision={:.4} recall={:.4} f1={:.4} accuracy={:.4}",
            m.precision(),
            m.recall(),
            m.f1(),
            m.accuracy()
        );
    }

    println!("{}", config.nfa_dot.display());
    println!("{}", config.dfa_dot.display());
    println!("{}", config.csv.display());
    Ok(())
}
