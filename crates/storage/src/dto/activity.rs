use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Activity;

/// Raw activity record as consumed by the ranking pipeline.
///
/// Timestamps deserialize leniently: a missing, null, or unparseable value
/// becomes `None` instead of failing the whole feed. The pipeline treats such
/// records as malformed and drops them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityRecord {
    pub user_name: String,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub activity_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub points: i64,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Activity> for ActivityRecord {
    fn from(activity: Activity) -> Self {
        Self {
            user_name: activity.user_name,
            activity_time: Some(activity.activity_time),
            points: activity.points,
            created_at: Some(activity.created_at),
        }
    }
}

/// Response containing one stored activity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub activity_id: Uuid,
    pub user_name: String,
    pub activity_time: DateTime<Utc>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            activity_id: activity.activity_id,
            user_name: activity.user_name,
            activity_time: activity.activity_time,
            points: activity.points,
            created_at: activity.created_at,
        }
    }
}

/// Request payload for recording a new activity
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateActivityRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "User name must be between 1 and 255 characters"
    ))]
    pub user_name: String,

    /// Defaults to the insertion time when omitted.
    pub activity_time: Option<DateTime<Utc>>,

    #[serde(default = "default_points")]
    #[validate(range(min = 0, message = "Points must be non-negative"))]
    pub points: i64,
}

fn default_points() -> i64 {
    20
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Timestamp(DateTime<Utc>),
        Malformed(#[allow(dead_code)] IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Timestamp(timestamp)) => Some(timestamp),
        _ => None,
    })
}
