//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Request vectors pair a query (in its JSON form) with the exact path and
//! ordered parameter list it must produce. Response vectors pair a raw HTTP
//! response with the parse outcome.

use marvel_core::{
    CharacterQuery, ClientError, ComicQuery, CreatorQuery, EventQuery, HttpRequest, HttpResponse,
    MarvelClient, QueryParams, Resource, SeriesQuery, Story, StoryQuery,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn resource(name: &str) -> Resource {
    match name {
        "characters" => Resource::Characters,
        "comics" => Resource::Comics,
        "creators" => Resource::Creators,
        "events" => Resource::Events,
        "series" => Resource::Series,
        "stories" => Resource::Stories,
        other => panic!("unknown resource: {other}"),
    }
}

fn build_as<Q: QueryParams + DeserializeOwned>(
    client: &MarvelClient,
    case: &Value,
) -> Result<HttpRequest, ClientError> {
    let query: Q = serde_json::from_value(case["query"].clone()).unwrap();
    match case["parent"].as_array() {
        Some(parent) => client.build_related(
            resource(parent[0].as_str().unwrap()),
            parent[1].as_i64().unwrap(),
            &query,
        ),
        None => client.build_list(&query),
    }
}

fn build(client: &MarvelClient, case: &Value) -> Result<HttpRequest, ClientError> {
    match case["resource"].as_str().unwrap() {
        "characters" => build_as::<CharacterQuery>(client, case),
        "comics" => build_as::<ComicQuery>(client, case),
        "creators" => build_as::<CreatorQuery>(client, case),
        "events" => build_as::<EventQuery>(client, case),
        "series" => build_as::<SeriesQuery>(client, case),
        "stories" => build_as::<StoryQuery>(client, case),
        other => panic!("unknown resource: {other}"),
    }
}

fn error_kind(err: &ClientError) -> &'static str {
    match err {
        ClientError::MalformedParameters(_) => "MalformedParameters",
        ClientError::InvalidEnumValue { .. } => "InvalidEnumValue",
        ClientError::HttpError { .. } => "HttpError",
        ClientError::ApiError { .. } => "ApiError",
        ClientError::MalformedResponse(_) => "MalformedResponse",
        ClientError::CancelledOrTimedOut(_) => "CancelledOrTimedOut",
        ClientError::Transport(_) => "Transport",
        ClientError::Config(_) => "Config",
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let client = MarvelClient::new(base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = build(&client, case);

        if let Some(expected) = case["expected_error"].as_str() {
            let err = result.expect_err(name);
            assert_eq!(error_kind(&err), expected, "{name}: error kind");
            continue;
        }

        let req = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected_request"];
        assert_eq!(
            req.path,
            format!("{base_url}{}", expected["path"].as_str().unwrap()),
            "{name}: path"
        );

        let expected_query: Vec<(String, String)> =
            serde_json::from_value(expected["query"].clone()).unwrap();
        assert_eq!(req.query, expected_query, "{name}: query");
        assert!(req.headers.is_empty(), "{name}: unsigned requests carry no headers");
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let client = MarvelClient::default();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["response"]["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["response"]["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        if let Some(kind) = expected["error"].as_str() {
            let err = match case["id"].as_i64() {
                Some(id) => client.parse_get::<Story>(response, id).map(|_| ()),
                None => client.parse_list::<Story>(response).map(|_| ()),
            }
            .expect_err(name);
            assert_eq!(error_kind(&err), kind, "{name}: error kind");

            match err {
                ClientError::HttpError { status, .. } => {
                    assert_eq!(Some(status as u64), expected["status"].as_u64(), "{name}: status");
                }
                ClientError::ApiError { code, message } => {
                    assert_eq!(code, expected["code"].as_str().unwrap(), "{name}: code");
                    assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
                }
                _ => {}
            }
            continue;
        }

        if let Some(id) = case["id"].as_i64() {
            let found = client.parse_get::<Story>(response, id).unwrap();
            assert_eq!(found.map(|s| s.id), expected["found"].as_i64(), "{name}: found");
        } else {
            let stories = client.parse_list::<Story>(response).unwrap();
            let ids: Vec<i64> = stories.iter().map(|s| s.id).collect();
            let expected_ids: Vec<i64> = serde_json::from_value(expected["ids"].clone()).unwrap();
            assert_eq!(ids, expected_ids, "{name}: ids");
        }
    }
}
