use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Time window applied to `activity_time`, relative to the evaluation instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    All,
    Day,
    Month,
    Year,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parses a window name, treating anything unrecognized as `All`.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("day") {
            Self::Day
        } else if raw.eq_ignore_ascii_case("month") {
            Self::Month
        } else if raw.eq_ignore_ascii_case("year") {
            Self::Year
        } else {
            Self::All
        }
    }
}

// An unrecognized window value must behave like `all`, not reject the
// request, so deserialization goes through the lenient parser.
impl<'de> Deserialize<'de> for TimeFrame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// Filter hints accepted by the activity feed and applied by the leaderboard.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LeaderboardFilter {
    /// Time window relative to "now"; unrecognized values behave like `all`.
    #[serde(default)]
    pub time_frame: TimeFrame,
    /// Case-insensitive substring match on `user_name`.
    pub user_name: Option<String>,
}

/// One ranked row of the computed leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_name: String,
    pub points: i64,
    pub entries: u32,
}
