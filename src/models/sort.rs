//! Comment sort orders (mirrors Lemmy's `CommentSortType`)

use serde::{Deserialize, Serialize};

/// How siblings in a thread are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    /// Score decayed by age
    #[default]
    Hot,
    /// Highest score first
    Top,
    /// Newest first
    New,
    /// Oldest first
    Old,
    /// Most evenly split votes first
    Controversial,
}

impl CommentSort {
    /// Get all sort orders
    pub const fn all() -> &'static [Self] {
        &[
            Self::Hot,
            Self::Top,
            Self::New,
            Self::Old,
            Self::Controversial,
        ]
    }

    /// Get the display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Top => "Top",
            Self::New => "New",
            Self::Old => "Old",
            Self::Controversial => "Controversial",
        }
    }

    /// Value sent as the `sort` query parameter
    pub const fn api_name(&self) -> &'static str {
        self.name()
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "top" => Some(Self::Top),
            "new" | "newest" => Some(Self::New),
            "old" | "oldest" => Some(Self::Old),
            "controversial" => Some(Self::Controversial),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommentSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(CommentSort::from_str("TOP"), Some(CommentSort::Top));
        assert_eq!(CommentSort::from_str("newest"), Some(CommentSort::New));
        assert_eq!(CommentSort::from_str("random"), None);
    }

    #[test]
    fn test_all_names_round_trip() {
        for sort in CommentSort::all() {
            assert_eq!(CommentSort::from_str(sort.name()), Some(*sort));
        }
    }
}
