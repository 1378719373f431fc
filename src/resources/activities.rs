// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Activity endpoints: activities, comments, kudos, laps, photos and zones
//!
//! Parameter structs carry the path `id` as a skipped field, so serializing
//! them yields exactly the query or body the endpoint expects.

use serde::Serialize;

use crate::enums::ActivityType;
use crate::errors::{Result, StravaError};
use crate::models::{
    ActivityZone, Comment, DetailedActivity, Lap, Photo, SummaryActivity, SummaryAthlete,
};
use crate::request::{HttpMethod, QueryParams, Request, RequestOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateActivityRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// ISO 8601 local start time
    pub start_date_local: String,
    /// Seconds
    pub elapsed_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// `1` marks a trainer activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<u8>,
    /// `1` marks a commute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetActivityByIdRequest {
    #[serde(skip)]
    pub id: u64,
    /// Include every segment effort
    pub include_all_efforts: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetCommentsByActivityIdRequest {
    #[serde(skip)]
    pub id: u64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetKudoersByActivityIdRequest {
    #[serde(skip)]
    pub id: u64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetLapsByActivityIdRequest {
    #[serde(skip)]
    pub id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetPhotosByActivityIdRequest {
    #[serde(skip)]
    pub id: u64,
    pub photo_sources: Option<bool>,
    /// Requested longest side in pixels
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetZonesByActivityIdRequest {
    #[serde(skip)]
    pub id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetLoggedInAthleteActivitiesRequest {
    /// Only activities before this epoch timestamp
    pub before: Option<i64>,
    /// Only activities after this epoch timestamp
    pub after: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateActivityByIdRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<u8>,
}

/// Activity operations
pub struct Activities<'a> {
    request: &'a Request,
}

impl<'a> Activities<'a> {
    pub fn new(request: &'a Request) -> Self {
        Self { request }
    }

    /// Create a manual activity
    ///
    /// # Errors
    ///
    /// [`StravaError::InvalidParameter`] for [`ActivityType::Unknown`],
    /// otherwise any [`StravaError`] from the dispatcher.
    pub async fn create_activity(
        &self,
        params: &CreateActivityRequest,
        access_token: Option<&str>,
    ) -> Result<DetailedActivity> {
        ensure_known_type(Some(params.activity_type))?;
        let options = RequestOptions::new()
            .with_json_body(params)?
            .with_access_token(access_token.map(str::to_owned));
        self.request
            .make_api_request(HttpMethod::Post, "/activities", options)
            .await
    }

    /// Fetch one activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher;
    /// an unknown id surfaces as a 404 [`StravaError::Api`](crate::errors::StravaError::Api).
    pub async fn get_activity_by_id(
        &self,
        params: &GetActivityByIdRequest,
        access_token: Option<&str>,
    ) -> Result<DetailedActivity> {
        self.get(format!("/activities/{}", params.id), params, access_token)
            .await
    }

    /// Comments on an activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_comments_by_activity_id(
        &self,
        params: &GetCommentsByActivityIdRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<Comment>> {
        self.get(format!("/activities/{}/comments", params.id), params, access_token)
            .await
    }

    /// Athletes who gave kudos to an activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_kudoers_by_activity_id(
        &self,
        params: &GetKudoersByActivityIdRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<SummaryAthlete>> {
        self.get(format!("/activities/{}/kudos", params.id), params, access_token)
            .await
    }

    /// Laps of an activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_laps_by_activity_id(
        &self,
        params: &GetLapsByActivityIdRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<Lap>> {
        self.get(format!("/activities/{}/laps", params.id), params, access_token)
            .await
    }

    /// Photos attached to an activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_photos_by_activity_id(
        &self,
        params: &GetPhotosByActivityIdRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<Photo>> {
        self.get(format!("/activities/{}/photos", params.id), params, access_token)
            .await
    }

    /// Activities of the athlete owning the token
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_logged_in_athlete_activities(
        &self,
        params: Option<&GetLoggedInAthleteActivitiesRequest>,
        access_token: Option<&str>,
    ) -> Result<Vec<SummaryActivity>> {
        self.get("/athlete/activities".to_owned(), &params, access_token)
            .await
    }

    /// Heart rate and power zone distribution of an activity
    ///
    /// # Errors
    ///
    /// Any [`StravaError`](crate::errors::StravaError) from the dispatcher.
    pub async fn get_zones_by_activity_id(
        &self,
        params: &GetZonesByActivityIdRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<ActivityZone>> {
        self.get(format!("/activities/{}/zones", params.id), params, access_token)
            .await
    }

    /// Update the editable fields of an activity
    ///
    /// # Errors
    ///
    /// [`StravaError::InvalidParameter`] for [`ActivityType::Unknown`],
    /// otherwise any [`StravaError`] from the dispatcher.
    pub async fn update_activity_by_id(
        &self,
        params: &UpdateActivityByIdRequest,
        access_token: Option<&str>,
    ) -> Result<DetailedActivity> {
        ensure_known_type(params.activity_type)?;
        let options = RequestOptions::new()
            .with_json_body(params)?
            .with_access_token(access_token.map(str::to_owned));
        self.request
            .make_api_request(HttpMethod::Put, &format!("/activities/{}", params.id), options)
            .await
    }

    async fn get<Q, T>(&self, path: String, query: &Q, access_token: Option<&str>) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let options = RequestOptions::new()
            .with_query(QueryParams::from_serializable(query)?)
            .with_access_token(access_token.map(str::to_owned));
        self.request
            .make_api_request(HttpMethod::Get, &path, options)
            .await
    }
}

/// `Unknown` only exists for decoding; Strava rejects it as an input type
fn ensure_known_type(activity_type: Option<ActivityType>) -> Result<()> {
    if activity_type == Some(ActivityType::Unknown) {
        return Err(StravaError::InvalidParameter {
            field: "type",
            reason: "unknown activity type cannot be sent",
        });
    }
    Ok(())
}
