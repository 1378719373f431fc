// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Records mirroring the JSON shapes returned by the Strava v3 API.
//!
//! ## Design Principles
//!
//! - **Structural mirror**: field names are the API's own snake_case names,
//!   nothing is renamed or converted beyond serde's decode
//! - **Tolerant**: every field the API may omit is an `Option`, unknown
//!   fields are ignored
//! - **Inert**: models are built on decode and handed to the caller; the
//!   library never mutates them
//!
//! ## Core Models
//!
//! - [`DetailedActivity`] / [`SummaryActivity`]: activity records
//! - [`Comment`]: a comment left on an activity
//! - [`SummaryAthlete`]: athlete profile as embedded in comments and kudos
//! - [`Lap`]: a lap of an activity
//! - [`ActivityZone`]: heart rate or power zone distribution
//! - [`Photo`]: activity photo, kept as a generic JSON record
//! - [`Fault`]: the error payload Strava returns with non-2xx answers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{ActivityType, ActivityZoneType};

/// Minimal athlete reference (`id` plus resource state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaAthlete {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_state: Option<u8>,
}

/// Minimal activity reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaActivity {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_state: Option<u8>,
}

/// Encoded route polylines for an activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineMap {
    pub id: Option<String>,
    /// Full resolution polyline, only present on detailed activities
    pub polyline: Option<String>,
    pub summary_polyline: Option<String>,
}

/// Athlete profile as returned in comments and kudoer lists
///
/// The kudoers endpoint only returns names, so even `id` is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryAthlete {
    pub id: Option<u64>,
    pub resource_state: Option<u8>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    /// URL to a 62x62 profile picture
    pub profile_medium: Option<String>,
    /// URL to a 124x124 profile picture
    pub profile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// `"M"` or `"F"`
    pub sex: Option<String>,
    pub premium: Option<bool>,
    pub summit: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Activity as listed for the logged-in athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryActivity {
    /// Unique identifier of the activity
    pub id: u64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub upload_id: Option<u64>,
    #[serde(default)]
    pub athlete: Option<MetaAthlete>,
    #[serde(default)]
    pub name: Option<String>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: Option<u64>,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub elev_high: Option<f64>,
    #[serde(default)]
    pub elev_low: Option<f64>,
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
    /// Finer-grained sport type (`"MountainBikeRide"`, `"TrailRun"`, ...)
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Start time in the athlete's local timezone, encoded with a `Z` suffix by the API
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// `[latitude, longitude]`
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub end_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub achievement_count: Option<u32>,
    #[serde(default)]
    pub kudos_count: Option<u32>,
    #[serde(default)]
    pub comment_count: Option<u32>,
    #[serde(default)]
    pub athlete_count: Option<u32>,
    #[serde(default)]
    pub photo_count: Option<u32>,
    #[serde(default)]
    pub total_photo_count: Option<u32>,
    #[serde(default)]
    pub map: Option<PolylineMap>,
    #[serde(default)]
    pub trainer: Option<bool>,
    #[serde(default)]
    pub commute: Option<bool>,
    #[serde(default)]
    pub manual: Option<bool>,
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default)]
    pub workout_type: Option<u32>,
    /// Average speed in meters per second
    #[serde(default)]
    pub average_speed: Option<f64>,
    /// Max speed in meters per second
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub has_kudoed: Option<bool>,
    #[serde(default)]
    pub hide_from_home: Option<bool>,
    #[serde(default)]
    pub gear_id: Option<String>,
    #[serde(default)]
    pub kilojoules: Option<f64>,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub device_watts: Option<bool>,
    #[serde(default)]
    pub max_watts: Option<f64>,
    #[serde(default)]
    pub weighted_average_watts: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
}

/// Full activity record returned by create, get and update
///
/// Shares every summary field through [`SummaryActivity`] and adds the
/// detail-only ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedActivity {
    #[serde(flatten)]
    pub summary: SummaryActivity,
    #[serde(default)]
    pub description: Option<String>,
    /// Kilocalories consumed
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub embed_token: Option<String>,
    #[serde(default)]
    pub splits_metric: Option<Vec<Split>>,
    #[serde(default)]
    pub splits_standard: Option<Vec<Split>>,
    #[serde(default)]
    pub laps: Option<Vec<Lap>>,
    /// Segment efforts, only with `include_all_efforts`
    #[serde(default)]
    pub segment_efforts: Option<Vec<Value>>,
    #[serde(default)]
    pub best_efforts: Option<Vec<Value>>,
    #[serde(default)]
    pub photos: Option<Value>,
    #[serde(default)]
    pub gear: Option<Value>,
}

impl DetailedActivity {
    /// Activity identifier
    #[must_use]
    pub fn id(&self) -> u64 {
        self.summary.id
    }
}

/// Per-kilometer or per-mile split
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    pub average_speed: Option<f64>,
    pub distance: Option<f64>,
    pub elapsed_time: Option<u64>,
    pub elevation_difference: Option<f64>,
    pub pace_zone: Option<u32>,
    pub moving_time: Option<u64>,
    pub split: Option<u32>,
}

/// Comment on an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub activity_id: Option<u64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub athlete: Option<SummaryAthlete>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One lap of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub id: u64,
    #[serde(default)]
    pub activity: Option<MetaActivity>,
    #[serde(default)]
    pub athlete: Option<MetaAthlete>,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    #[serde(default)]
    pub start_index: Option<u64>,
    #[serde(default)]
    pub end_index: Option<u64>,
    #[serde(default)]
    pub lap_index: Option<u32>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub moving_time: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pace_zone: Option<u32>,
    #[serde(default)]
    pub split: Option<u32>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
}

/// Time spent inside one zone range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedZoneRange {
    pub min: f64,
    /// `-1` marks an open-ended top zone
    pub max: f64,
    /// Seconds spent in this range
    pub time: f64,
}

/// Heart rate or power zone distribution of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityZone {
    #[serde(rename = "type", default)]
    pub zone_type: Option<ActivityZoneType>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub distribution_buckets: Vec<TimedZoneRange>,
    #[serde(default)]
    pub sensor_based: Option<bool>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub custom_zones: Option<bool>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Activity photo
///
/// The photos endpoint returns differently shaped records depending on the
/// photo source, so the record is kept as a JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo {
    pub fields: Map<String, Value>,
}

impl Photo {
    /// Look up a raw field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Photo identifier, which Strava sends as `unique_id` for native photos
    /// and `id` for external ones
    #[must_use]
    pub fn unique_id(&self) -> Option<String> {
        self.get("unique_id")
            .or_else(|| self.get("id"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// Photo URLs keyed by size
    #[must_use]
    pub fn urls(&self) -> Option<&Map<String, Value>> {
        self.get("urls").and_then(Value::as_object)
    }
}

/// Error payload Strava attaches to non-2xx answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FaultError>,
}

/// One entry of [`Fault::errors`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultError {
    pub resource: Option<String>,
    pub field: Option<String>,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detailed_activity_minimal() {
        let activity: DetailedActivity = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(activity.id(), 1);
        assert!(activity.summary.name.is_none());
        assert!(activity.description.is_none());
    }

    #[test]
    fn test_detailed_activity_fields() {
        let activity: DetailedActivity = serde_json::from_value(json!({
            "id": 154504250376_u64,
            "athlete": {"id": 134815, "resource_state": 1},
            "name": "Happy Friday",
            "distance": 28099.0,
            "moving_time": 4207,
            "elapsed_time": 4410,
            "type": "Ride",
            "sport_type": "MountainBikeRide",
            "start_date": "2018-02-16T14:52:54Z",
            "start_date_local": "2018-02-16T06:52:54Z",
            "start_latlng": [37.83, -122.26],
            "trainer": false,
            "commute": false,
            "description": "Lunch loop",
            "calories": 870.2,
            "splits_metric": [{"distance": 1001.5, "elapsed_time": 141, "split": 1}],
            "unknown_field": {"ignored": true}
        }))
        .unwrap();

        assert_eq!(activity.id(), 154_504_250_376);
        assert_eq!(activity.summary.activity_type, Some(ActivityType::Ride));
        assert_eq!(activity.summary.sport_type.as_deref(), Some("MountainBikeRide"));
        assert_eq!(activity.summary.athlete.as_ref().map(|a| a.id), Some(134_815));
        assert_eq!(activity.description.as_deref(), Some("Lunch loop"));
        assert_eq!(activity.splits_metric.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_comment_with_athlete() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 12345678987654321_u64,
            "activity_id": 12345678987654321_u64,
            "text": "Good job and keep the cat pictures coming!",
            "athlete": {"firstname": "Peter", "lastname": "S"},
            "created_at": "2020-07-10T13:36:12Z"
        }))
        .unwrap();
        let athlete = comment.athlete.unwrap();
        assert_eq!(athlete.firstname.as_deref(), Some("Peter"));
        assert!(athlete.id.is_none());
    }

    #[test]
    fn test_zone_distribution() {
        let zone: ActivityZone = serde_json::from_value(json!({
            "score": 43,
            "type": "heartrate",
            "sensor_based": true,
            "distribution_buckets": [
                {"min": 0, "max": 115, "time": 1735},
                {"min": 115, "max": -1, "time": 0}
            ]
        }))
        .unwrap();
        assert_eq!(zone.zone_type, Some(ActivityZoneType::Heartrate));
        assert_eq!(zone.distribution_buckets.len(), 2);
        assert!((zone.distribution_buckets[1].max + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_photo_is_generic_record() {
        let photo: Photo = serde_json::from_value(json!({
            "unique_id": "a1b2c3",
            "urls": {"100": "https://example.com/p.jpg"},
            "source": 1
        }))
        .unwrap();
        assert_eq!(photo.unique_id().as_deref(), Some("a1b2c3"));
        assert_eq!(photo.urls().unwrap()["100"], "https://example.com/p.jpg");
        assert_eq!(photo.get("source"), Some(&json!(1)));

        let external: Photo = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(external.unique_id().as_deref(), Some("42"));
    }
}
