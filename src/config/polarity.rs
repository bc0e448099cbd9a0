use std::str::FromStr;

/// How to choose the value of an atom when making a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PolarityMode {
    /// Use the last value the atom held, initially chosen at random.
    Saved = 0,

    /// Always value the atom false.
    False,

    /// Always value the atom true.
    True,

    /// Choose a value at random.
    Random,
}

impl PolarityMode {
    /// The minimum PolarityMode.
    pub const MIN: PolarityMode = PolarityMode::Saved;

    /// The maximum PolarityMode.
    pub const MAX: PolarityMode = PolarityMode::Random;
}

impl std::fmt::Display for PolarityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Saved => write!(f, "Saved"),
            Self::False => write!(f, "False"),
            Self::True => write!(f, "True"),
            Self::Random => write!(f, "Random"),
        }
    }
}

impl FromStr for PolarityMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Saved" => Ok(Self::Saved),
            "False" => Ok(Self::False),
            "True" => Ok(Self::True),
            "Random" => Ok(Self::Random),
            _unknown_string => Err(()),
        }
    }
}
