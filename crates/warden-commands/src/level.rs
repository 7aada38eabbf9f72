//! Permission scale for bot commands.

use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

/// Effective weight of a chatter who holds no level at all.
///
/// Strictly above [`CommandLevel::All`] and strictly below
/// [`CommandLevel::Follower`], so plain viewers can run unrestricted
/// commands and nothing else.
pub const VIEWER_WEIGHT: i64 = 0;

/// Which chatters can execute a command.
///
/// Levels are ordered by their numeric weight; a caller may run a command
/// when their effective weight is at or above the command's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLevel {
    /// Any chatter, including ones the bot knows nothing about.
    All,
    /// Followers of the channel and above.
    Follower,
    /// Subscribers of the channel and above.
    Subscriber,
    /// Channel moderators and above.
    Moderator,
    /// The channel's broadcaster and the bot owner.
    Broadcaster,
    /// Only the bot owner.
    Owner,
    /// Nobody; soft-disables a command without removing it.
    Disabled,
}

impl CommandLevel {
    const ALL_LEVELS: [Self; 7] = [
        Self::All,
        Self::Follower,
        Self::Subscriber,
        Self::Moderator,
        Self::Broadcaster,
        Self::Owner,
        Self::Disabled,
    ];

    /// Numeric weight of the level.
    #[must_use]
    pub const fn weight(self) -> i64 {
        match self {
            Self::All => i64::MIN,
            Self::Follower => 100,
            Self::Subscriber => 200,
            Self::Moderator => 300,
            Self::Broadcaster => 9001,
            Self::Owner => i64::MAX - 1,
            Self::Disabled => i64::MAX,
        }
    }

    /// Name of the level as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Follower => "FOLLOWER",
            Self::Subscriber => "SUBSCRIBER",
            Self::Moderator => "MODERATOR",
            Self::Broadcaster => "BROADCASTER",
            Self::Owner => "OWNER",
            Self::Disabled => "DISABLED",
        }
    }

    /// Returns the level with exactly the given weight, if one exists.
    #[must_use]
    pub fn from_weight(weight: i64) -> Option<Self> {
        Self::ALL_LEVELS.into_iter().find(|l| l.weight() == weight)
    }

    /// Parses a command's *required* level from its string-encoded weight.
    ///
    /// On failure (non-numeric, or no level with that exact weight) the
    /// command is effectively disabled rather than opened up.
    #[must_use]
    pub fn parse_required(encoded: &str) -> Self {
        Self::parse_weight_string(encoded).unwrap_or(Self::Disabled)
    }

    /// Parses a *caller's* own level from its string-encoded weight.
    ///
    /// On failure the caller is granted no elevated access.
    #[must_use]
    pub fn parse_caller(encoded: &str) -> Self {
        Self::parse_weight_string(encoded).unwrap_or(Self::All)
    }

    fn parse_weight_string(encoded: &str) -> Option<Self> {
        match encoded.trim().parse::<i64>() {
            Ok(weight) => Self::from_weight(weight),
            Err(_) => {
                warn!("unparseable level weight string: {encoded:?}");
                None
            }
        }
    }

    /// Returns `true` if a caller with the given effective weight may run
    /// a command at this level.
    #[must_use]
    pub fn allows(self, caller_weight: i64) -> bool {
        caller_weight >= self.weight()
    }
}

impl PartialOrd for CommandLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommandLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl fmt::Display for CommandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
