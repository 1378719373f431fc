// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the request dispatcher
//!
//! Each test points a dispatcher at a mocked HTTP server and checks the
//! request that reaches it and how the answer comes back.

use anyhow::Result;
use mockito::{Matcher, Server};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use strava_client::{HttpMethod, QueryParams, Request, RequestOptions, StravaError};

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: u64,
}

fn dispatcher(base_url: &str, default_token: Option<&str>) -> Request {
    Request::new(Client::new(), base_url, default_token.map(str::to_owned))
}

#[tokio::test]
async fn test_every_verb_is_sent_as_requested() -> Result<()> {
    let mut server = Server::new_async().await;
    let request = dispatcher(&server.url(), Some("token"));

    for method in [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ] {
        let mock = server
            .mock(method.as_str(), "/verbs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 7}"#)
            .expect(1)
            .create_async()
            .await;

        let decoded: IdOnly = request
            .make_api_request(method, "/verbs", RequestOptions::new())
            .await?;
        assert_eq!(decoded.id, 7);
        mock.assert_async().await;
    }

    Ok(())
}

#[tokio::test]
async fn test_absent_query_values_are_omitted() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/athlete/activities")
        .match_query(Matcher::Exact("after=1700000000&per_page=50".to_owned()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let query = QueryParams::new()
        .with("before", None::<i64>)
        .with("after", Some(1_700_000_000_i64))
        .with("page", None::<u32>)
        .with("per_page", Some(50));
    let activities: Vec<Value> = dispatcher(&server.url(), Some("token"))
        .make_api_request(
            HttpMethod::Get,
            "/athlete/activities",
            RequestOptions::new().with_query(query),
        )
        .await?;

    assert!(activities.is_empty());
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_query_values_are_url_encoded() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".to_owned(), "hill repeats & tempo".to_owned()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let _: Value = dispatcher(&server.url(), None)
        .make_api_request(
            HttpMethod::Get,
            "/search",
            RequestOptions::new().with_query(QueryParams::new().with("q", Some("hill repeats & tempo"))),
        )
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_explicit_token_overrides_default() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/athlete")
        .match_header("authorization", "Bearer explicit-token")
        .with_status(200)
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let _: IdOnly = dispatcher(&server.url(), Some("default-token"))
        .make_api_request(
            HttpMethod::Get,
            "/athlete",
            RequestOptions::new().with_access_token(Some("explicit-token".to_owned())),
        )
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_default_token_used_when_none_given() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/athlete")
        .match_header("authorization", "Bearer default-token")
        .with_status(200)
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let _: IdOnly = dispatcher(&server.url(), Some("default-token"))
        .make_api_request(HttpMethod::Get, "/athlete", RequestOptions::new())
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_no_authorization_header_without_token() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/public")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let _: Value = dispatcher(&server.url(), None)
        .make_api_request(HttpMethod::Get, "/public", RequestOptions::new())
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_success_body_decodes_without_transformation() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/activities/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let value: Value = dispatcher(&server.url(), None)
        .make_api_request(HttpMethod::Get, "/activities/1", RequestOptions::new())
        .await?;

    assert_eq!(value, json!({"id": 1}));
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_an_api_error() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/activities/999")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "message": "Record Not Found",
                "errors": [{"resource": "Activity", "field": "id", "code": "not found"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = dispatcher(&server.url(), Some("token"))
        .make_api_request::<Value>(HttpMethod::Get, "/activities/999", RequestOptions::new())
        .await
        .unwrap_err();

    match &err {
        StravaError::Api { status, payload } => {
            assert_eq!(*status, 404);
            assert_eq!(payload["message"], "Record Not Found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_not_found());
    assert_eq!(err.fault().map(|f| f.errors.len()), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_as_text() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/activities")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = dispatcher(&server.url(), None)
        .make_api_request::<Value>(HttpMethod::Get, "/activities", RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.payload(), Some(&json!("Service Unavailable")));
    Ok(())
}

#[tokio::test]
async fn test_write_verbs_send_json_body() -> Result<()> {
    let mut server = Server::new_async().await;
    let body = json!({"name": "Evening Ride", "commute": 1});

    let put = server
        .mock("PUT", "/activities/5")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(body.clone()))
        .with_status(200)
        .with_body(r#"{"id": 5}"#)
        .create_async()
        .await;

    let updated: IdOnly = dispatcher(&server.url(), Some("token"))
        .make_api_request(
            HttpMethod::Put,
            "/activities/5",
            RequestOptions::new().with_body(body),
        )
        .await?;

    assert_eq!(updated.id, 5);
    put.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_never_sends_a_body() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/activities/5")
        .match_body(Matcher::Exact(String::new()))
        .with_status(200)
        .with_body(r#"{"id": 5}"#)
        .create_async()
        .await;

    let _: IdOnly = dispatcher(&server.url(), None)
        .make_api_request(
            HttpMethod::Get,
            "/activities/5",
            RequestOptions::new().with_body(json!({"ignored": true})),
        )
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_unit() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/activities/5")
        .with_status(204)
        .create_async()
        .await;

    dispatcher(&server.url(), Some("token"))
        .make_api_request::<()>(HttpMethod::Delete, "/activities/5", RequestOptions::new())
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_mismatched_success_body_is_a_decode_error() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/activities/5")
        .with_status(200)
        .with_body(r#"{"name": "no id here"}"#)
        .create_async()
        .await;

    let err = dispatcher(&server.url(), None)
        .make_api_request::<IdOnly>(HttpMethod::Get, "/activities/5", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, StravaError::Decode { .. }));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let err = dispatcher("http://127.0.0.1:1", Some("token"))
        .make_api_request::<Value>(HttpMethod::Get, "/athlete", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, StravaError::Transport(_)));
    assert!(err.payload().is_none());
}
