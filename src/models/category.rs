use serde::{Deserialize, Serialize};

/// The closed set of spending categories the aggregation logic knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup. Unknown names are `None`; the set is closed.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "transport" => Some(Self::Transport),
            "shopping" => Some(Self::Shopping),
            "entertainment" => Some(Self::Entertainment),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Shopping,
            Self::Entertainment,
            Self::Other,
        ]
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "🍕",
            Self::Transport => "🚗",
            Self::Shopping => "🛍️",
            Self::Entertainment => "🎬",
            Self::Other => "📦",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
