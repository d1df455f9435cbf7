//! Fixed tokens of the METAR wind-group grammar

pub const CALM_WINDS: &str = "00000KT";
pub const DEFAULT_GROUP: &str = "/////KT";
pub const HUNDRED_AND_OVER: &str = "P99";
pub const GUST: &str = "G";
pub const KNOT: &str = "KT";
pub const MISSING_SPEED: &str = "//";
pub const MISSING_DIRECTION: &str = "///";
pub const VARIABLE: &str = "VRB";

/// A grammar token with its human-readable description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindToken {
    CalmWinds,
    Default,
    HundredAndOver,
    Gust,
    Knot,
    MissingSpeed,
    MissingDirection,
    Variable,
}

impl WindToken {
    pub const ALL: [WindToken; 8] = [
        WindToken::CalmWinds,
        WindToken::Default,
        WindToken::HundredAndOver,
        WindToken::Gust,
        WindToken::Knot,
        WindToken::MissingSpeed,
        WindToken::MissingDirection,
        WindToken::Variable,
    ];

    pub fn value(self) -> &'static str {
        match self {
            WindToken::CalmWinds => CALM_WINDS,
            WindToken::Default => DEFAULT_GROUP,
            WindToken::HundredAndOver => HUNDRED_AND_OVER,
            WindToken::Gust => GUST,
            WindToken::Knot => KNOT,
            WindToken::MissingSpeed => MISSING_SPEED,
            WindToken::MissingDirection => MISSING_DIRECTION,
            WindToken::Variable => VARIABLE,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WindToken::CalmWinds => "Calm winds",
            WindToken::Default => "Default value",
            WindToken::HundredAndOver => "Hundred and over",
            WindToken::Gust => "Gust",
            WindToken::Knot => "Knot",
            WindToken::MissingSpeed => "Missing speed",
            WindToken::MissingDirection => "Missing direction",
            WindToken::Variable => "Variable direction",
        }
    }

    /// Look up a token by its literal grammar value
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == value)
    }

    /// Look up a token by its description (exact match)
    pub fn from_description(description: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.description() == description)
    }
}
