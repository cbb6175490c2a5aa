use std::fmt;

#[derive(Debug)]
pub enum PlanError {
    /// TOML / JSON parse or deserialization error in a config file.
    ConfigParse(String),
    /// Config validation error (empty pattern, zero pack size, etc.).
    ConfigValidation(String),
    /// Input document could not be parsed, or holds an invalid item or price.
    InputParse(String),
    /// IO error (CSV writer, etc.).
    Io(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InputParse(msg) => write!(f, "input error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}
