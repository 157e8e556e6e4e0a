use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub const USAGE: &str = "usage: regraph <PATTERN> [--alphabet SYMBOLS] [--nfa-dot FILE] \
[--dfa-dot FILE] [--csv FILE] [--good FILE --bad FILE] [--total]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingPattern,
    MissingValue(String),
    UnknownFlag(String),
    /// `--good` and `--bad` must be given together.
    UnpairedExamples,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingPattern => write!(f, "no pattern given\n{}", USAGE),
            ConfigError::MissingValue(flag) => write!(f, "{} needs a value", flag),
            ConfigError::UnknownFlag(flag) => write!(f, "unknown argument {:?}\n{}", flag, USAGE),
            ConfigError::UnpairedExamples => f.write_str("--good and --bad must be used together"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pattern: String,
    /// Literals allowed in the pattern; any literal when unset.
    pub alphabet: Option<String>,
    pub nfa_dot: PathBuf,
    pub dfa_dot: PathBuf,
    pub csv: PathBuf,
    /// Positive and negative example files, one string per line.
    pub examples: Option<(PathBuf, PathBuf)>,
    /// Export the DFA with an explicit trap state.
    pub total: bool,
}

impl Config {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Config {
            pattern: pattern.into(),
            alphabet: None,
            nfa_dot: PathBuf::from("nfa.dot"),
            dfa_dot: PathBuf::from("dfa.dot"),
            csv: PathBuf::from("dfa_transition_table.csv"),
            examples: None,
            total: false,
        }
    }

    /// Parses arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut pattern = None;
        let mut config = Config::new(String::new());
        let mut good = None;
        let mut bad = None;

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_owned()))
            };
            match arg.as_str() {
                "--alphabet" => config.alphabet = Some(value("--alphabet")?),
                "--nfa-dot" => config.nfa_dot = PathBuf::from(value("--nfa-dot")?),
                "--dfa-dot" => config.dfa_dot = PathBuf::from(value("--dfa-dot")?),
                "--csv" => config.csv = PathBuf::from(value("--csv")?),
                "--good" => good = Some(PathBuf::from(value("--good")?)),
                "--bad" => bad = Some(PathBuf::from(value("--bad")?)),
                "--total" => config.total = true,
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownFlag(flag.to_owned()))
                }
                _ if pattern.is_none() => pattern = Some(arg.clone()),
                other => return Err(ConfigError::UnknownFlag(other.to_owned())),
            }
        }

        config.pattern = pattern.ok_or(ConfigError::MissingPattern)?;
        config.examples = match (good, bad) {
            (Some(good), Some(bad)) => Some((good, bad)),
            (None, None) => None,
            _ => return Err(ConfigError::UnpairedExamples),
        };
        Ok(config)
    }
}

#[cfg(test)]
fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults() {
    let config = Config::from_args(args(&["(a|b)*abb"])).unwrap();
    assert_eq!(config, Config::new("(a|b)*abb"));
    assert_eq!(config.dfa_dot, PathBuf::from("dfa.dot"));
}

#[test]
fn flags() {
    let config = Config::from_args(args(&[
        "--alphabet", "ab", "a*b", "--dfa-dot", "out.dot", "--total", "--good", "g.txt",
        "--bad", "b.txt",
    ]))
    .unwrap();
    assert_eq!(config.pattern, "a*b");
    assert_eq!(config.alphabet, Some("ab".to_owned()));
    assert_eq!(config.dfa_dot, PathBuf::from("out.dot"));
    assert!(config.total);
    assert_eq!(
        config.examples,
        Some((PathBuf::from("g.txt"), PathBuf::from("b.txt")))
    );
}

#[test]
fn bad_arguments() {
    assert_eq!(Config::from_args(args(&[])), Err(ConfigError::MissingPattern));
    assert_eq!(
        Config::from_args(args(&["a", "--csv"])),
        Err(ConfigError::MissingValue("--csv".to_owned()))
    );
    assert_eq!(
        Config::from_args(args(&["a", "--fast"])),
        Err(ConfigError::UnknownFlag("--fast".to_owned()))
    );
    assert_eq!(
        Config::from_args(args(&["a", "b"])),
        Err(ConfigError::UnknownFlag("b".to_owned()))
    );
    assert_eq!(
        Config::from_args(args(&["a", "--good", "g.txt"])),
        Err(ConfigError::UnpairedExamples)
    );
}
