//! Field and enum-constant default values.
//!
//! Kept as a tagged sum rather than a single numeric/string slot so that
//! `Default::Float(1.0)` and `Default::Integer(1)` compare unequal even
//! though they print identically.

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Default {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// An enum default: the bare identifier naming a constant of the
    /// field's (eventually resolved) enum type.
    Enum(String),
    Nothing,
}

impl std::fmt::Display for Default {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Default::Bool(b) => write!(f, "{b}"),
            Default::Integer(i) => write!(f, "{i}"),
            Default::Float(x) => write!(f, "{x}"),
            Default::String(s) => write!(f, "{s:?}"),
            Default::Enum(name) => write!(f, "{name}"),
            Default::Nothing => write!(f, "nothing"),
        }
    }
}
