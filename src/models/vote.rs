//! Vote state for the viewing user

use serde::{Deserialize, Serialize};

/// The viewer's vote on a single comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    /// Upvoted (+1)
    Upvoted,
    /// Downvoted (-1)
    Downvoted,
    /// No vote cast (0)
    #[default]
    NoVote,
}

impl VoteState {
    /// Get the Lemmy score for this vote (1, -1 or 0)
    pub const fn as_score(&self) -> i16 {
        match self {
            Self::Upvoted => 1,
            Self::Downvoted => -1,
            Self::NoVote => 0,
        }
    }

    /// Map a Lemmy score back to a vote. Anything other than 1 or -1 is no vote.
    pub const fn from_score(score: i64) -> Self {
        match score {
            1 => Self::Upvoted,
            -1 => Self::Downvoted,
            _ => Self::NoVote,
        }
    }

    /// Vote that results from pressing `target` while `self` is active.
    ///
    /// Pressing the arrow that is already lit clears the vote, pressing the
    /// other one switches directly.
    pub fn toggled(&self, target: Self) -> Self {
        if *self == target { Self::NoVote } else { target }
    }

    /// Get the arrow glyph for display
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Upvoted => "▲",
            Self::Downvoted => "▼",
            Self::NoVote => "·",
        }
    }
}

impl From<Option<i16>> for VoteState {
    fn from(score: Option<i16>) -> Self {
        score.map_or(Self::NoVote, |s| Self::from_score(i64::from(s)))
    }
}

impl std::fmt::Display for VoteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Upvoted => "upvoted",
            Self::Downvoted => "downvoted",
            Self::NoVote => "no vote",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_mapping() {
        assert_eq!(VoteState::Upvoted.as_score(), 1);
        assert_eq!(VoteState::Downvoted.as_score(), -1);
        assert_eq!(VoteState::NoVote.as_score(), 0);

        assert_eq!(VoteState::from_score(1), VoteState::Upvoted);
        assert_eq!(VoteState::from_score(-1), VoteState::Downvoted);
        assert_eq!(VoteState::from_score(0), VoteState::NoVote);
        assert_eq!(VoteState::from_score(7), VoteState::NoVote);
    }

    #[test]
    fn test_missing_vote_is_no_vote() {
        assert_eq!(VoteState::from(None), VoteState::NoVote);
        assert_eq!(VoteState::from(Some(-1)), VoteState::Downvoted);
        assert_eq!(VoteState::default(), VoteState::NoVote);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(
            VoteState::NoVote.toggled(VoteState::Upvoted),
            VoteState::Upvoted
        );
        assert_eq!(
            VoteState::Upvoted.toggled(VoteState::Upvoted),
            VoteState::NoVote
        );
        assert_eq!(
            VoteState::Upvoted.toggled(VoteState::Downvoted),
            VoteState::Downvoted
        );
    }
}
