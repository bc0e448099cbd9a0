//! Reports on the result of a solve.

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula is satisfiable, and a model is available.
    Satisfiable,

    /// The formula is unsatisfiable (under any assumptions made), and a conflict is available.
    Unsatisfiable,

    /// Satisfiability of the formula is unknown, as the solve was interrupted or ran out of time.
    Unknown,
}

impl Report {
    /// True if the report settles satisfiability.
    pub fn is_definite(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
