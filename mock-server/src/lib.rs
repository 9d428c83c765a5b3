//! In-memory stand-in for the Marvel public API.
//!
//! Serves a fixed catalogue under `/v1/public` using the real response
//! envelope, key checks, paging limits and error shapes, so the client can be
//! exercised end to end without network access. Bodies are gzip-compressed
//! when the request sends `accept-encoding: gzip`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

pub const PUBLIC_KEY: &str = "mock-public";
pub const PRIVATE_KEY: &str = "mock-private";

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

type Reply = (StatusCode, Json<Value>);
type Params = HashMap<String, String>;

/// Keys the server accepts. Without a private key only `apikey` is checked.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub public_key: String,
    pub private_key: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            public_key: PUBLIC_KEY.to_string(),
            private_key: Some(PRIVATE_KEY.to_string()),
        }
    }
}

/// Entities per resource plus the relation lists between them.
#[derive(Debug, Default)]
pub struct Catalog {
    entities: HashMap<String, Vec<Value>>,
    links: HashMap<(String, i64, String), Vec<i64>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: &str, entity: Value) {
        self.entities
            .entry(resource.to_string())
            .or_default()
            .push(entity);
    }

    /// Make `/{parent}/{parent_id}/{related}` return `ids`, in that order.
    pub fn link(&mut self, parent: &str, parent_id: i64, related: &str, ids: &[i64]) {
        self.links.insert(
            (parent.to_string(), parent_id, related.to_string()),
            ids.to_vec(),
        );
    }

    fn find(&self, resource: &str, id: i64) -> Option<&Value> {
        self.entities
            .get(resource)?
            .iter()
            .find(|entity| entity["id"].as_i64() == Some(id))
    }

    /// A few characters, comics, creators, events, series and stories.
    pub fn sample() -> Self {
        let mut catalog = Self::new();

        for (id, name) in [
            (1009610, "Spider-Man"),
            (1009368, "Iron Man"),
            (1009351, "Hulk"),
        ] {
            catalog.insert(
                "characters",
                json!({
                    "id": id,
                    "name": name,
                    "description": "",
                    "modified": "2014-04-29T14:18:17-0400",
                    "resourceURI": format!("http://gateway.marvel.com/v1/public/characters/{id}"),
                    "urls": [],
                    "thumbnail": {"path": format!("http://i.annihil.us/u/prod/marvel/i/mg/{id}"), "extension": "jpg"}
                }),
            );
        }

        for (id, title, issue) in [
            (6482, "Amazing Spider-Man (1963) #1", 1),
            (6483, "Amazing Spider-Man (1963) #2", 2),
            (8500, "Iron Man (1968) #1", 1),
        ] {
            catalog.insert(
                "comics",
                json!({
                    "id": id,
                    "title": title,
                    "issueNumber": issue,
                    "format": "Comic",
                    "pageCount": 36,
                    "prices": [{"type": "printPrice", "price": 0.12}],
                    "dates": [{"type": "onsaleDate", "date": "1963-03-10T00:00:00-0500"}]
                }),
            );
        }

        for (id, first, last) in [(30, "Stan", "Lee"), (32, "Steve", "Ditko")] {
            catalog.insert(
                "creators",
                json!({
                    "id": id,
                    "firstName": first,
                    "lastName": last,
                    "fullName": format!("{first} {last}")
                }),
            );
        }

        catalog.insert(
            "events",
            json!({"id": 238, "title": "Civil War", "start": "2006-07-01 00:00:00", "end": "2007-01-29 00:00:00"}),
        );

        for (id, title, start) in [
            (1987, "Amazing Spider-Man (1963 - 1998)", 1963),
            (2029, "Iron Man (1968 - 1996)", 1968),
            (2021, "Incredible Hulk (1962 - 1999)", 1962),
        ] {
            catalog.insert(
                "series",
                json!({"id": id, "title": title, "startYear": start, "type": "ongoing"}),
            );
        }

        for (id, title) in [
            (41, "Cover #41"),
            (42, "Interior #42"),
            (43, "Cover #43"),
        ] {
            catalog.insert(
                "stories",
                json!({"id": id, "title": title, "type": if id == 42 { "story" } else { "cover" }}),
            );
        }

        catalog.link("characters", 1009610, "stories", &[41, 42]);
        catalog.link("characters", 1009610, "comics", &[6482, 6483]);
        catalog.link("characters", 1009610, "series", &[1987]);
        catalog.link("characters", 1009368, "events", &[238]);
        catalog.link("stories", 42, "characters", &[1009610]);
        catalog.link("stories", 42, "creators", &[30, 32]);
        catalog.link("series", 1987, "comics", &[6483, 6482]);
        catalog.link("events", 238, "characters", &[1009368, 1009351]);
        catalog.link("creators", 30, "series", &[1987, 2029, 2021]);
        catalog
    }
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    keys: Arc<ApiKeys>,
}

/// Router over the sample catalogue, expecting the default keys.
pub fn app() -> Router {
    app_with(Catalog::sample(), ApiKeys::default())
}

pub fn app_with(catalog: Catalog, keys: ApiKeys) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog),
        keys: Arc::new(keys),
    };
    Router::new()
        .route("/v1/public/{resource}", get(list))
        .route("/v1/public/{resource}/{id}", get(fetch))
        .route("/v1/public/{resource}/{id}/{related}", get(related))
        .with_state(state)
        .layer(CompressionLayer::new())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<Params>,
) -> Reply {
    if let Err(reply) = authorize(&state.keys, &params) {
        return reply;
    }
    match state.catalog.entities.get(&resource) {
        Some(entities) => page(entities.clone(), &params),
        None => resource_not_found(&resource),
    }
}

async fn fetch(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    Query(params): Query<Params>,
) -> Reply {
    if let Err(reply) = authorize(&state.keys, &params) {
        return reply;
    }
    match state.catalog.find(&resource, id) {
        Some(entity) => page(vec![entity.clone()], &Params::new()),
        None => entity_not_found(&resource),
    }
}

async fn related(
    State(state): State<AppState>,
    Path((resource, id, related)): Path<(String, i64, String)>,
    Query(params): Query<Params>,
) -> Reply {
    if let Err(reply) = authorize(&state.keys, &params) {
        return reply;
    }
    if state.catalog.find(&resource, id).is_none() {
        return entity_not_found(&resource);
    }
    if !state.catalog.entities.contains_key(&related) {
        return resource_not_found(&related);
    }
    let ids = state
        .catalog
        .links
        .get(&(resource, id, related.clone()))
        .cloned()
        .unwrap_or_default();
    let entities = ids
        .iter()
        .filter_map(|id| state.catalog.find(&related, *id).cloned())
        .collect();
    page(entities, &params)
}

fn authorize(keys: &ApiKeys, params: &Params) -> Result<(), Reply> {
    let Some(apikey) = params.get("apikey") else {
        return Err(credential_error(StatusCode::CONFLICT, "MissingParameter", "You must provide a user key."));
    };
    if *apikey != keys.public_key {
        return Err(credential_error(
            StatusCode::UNAUTHORIZED,
            "InvalidCredentials",
            "The passed API key is invalid.",
        ));
    }
    let Some(private_key) = &keys.private_key else {
        return Ok(());
    };
    let Some(ts) = params.get("ts") else {
        return Err(credential_error(StatusCode::CONFLICT, "MissingParameter", "You must provide a timestamp."));
    };
    let Some(hash) = params.get("hash") else {
        return Err(credential_error(StatusCode::CONFLICT, "MissingParameter", "You must provide a hash."));
    };
    let expected = format!("{:x}", md5::compute(format!("{ts}{private_key}{apikey}")));
    if *hash != expected {
        tracing::info!(%ts, "rejected request with bad hash");
        return Err(credential_error(
            StatusCode::UNAUTHORIZED,
            "InvalidCredentials",
            "That hash, timestamp and key combination is invalid.",
        ));
    }
    Ok(())
}

/// Filter, slice and wrap `entities` according to the paging parameters.
fn page(mut entities: Vec<Value>, params: &Params) -> Reply {
    let limit = match params.get("limit").map(|raw| raw.parse::<usize>()) {
        None => DEFAULT_LIMIT,
        Some(Ok(limit)) if limit > MAX_LIMIT => {
            return status_error(StatusCode::CONFLICT, "You may not request more than 100 items.");
        }
        Some(Ok(limit)) if limit > 0 => limit,
        _ => {
            return status_error(
                StatusCode::CONFLICT,
                "You must pass an integer limit greater than 0.",
            );
        }
    };
    let offset = params
        .get("offset")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(0);

    for (param, field) in [("nameStartsWith", "name"), ("titleStartsWith", "title")] {
        if let Some(prefix) = params.get(param) {
            entities.retain(|entity| {
                entity[field]
                    .as_str()
                    .is_some_and(|value| value.starts_with(prefix.as_str()))
            });
        }
    }

    let total = entities.len();
    let results: Vec<Value> = entities.into_iter().skip(offset).take(limit).collect();
    let body = json!({
        "code": 200,
        "status": "Ok",
        "copyright": "© 2024 MARVEL",
        "attributionText": "Data provided by Marvel. © 2024 MARVEL",
        "attributionHTML": "<a href=\"http://marvel.com\">Data provided by Marvel. © 2024 MARVEL</a>",
        "etag": format!("mock-{total}-{offset}-{limit}"),
        "data": {
            "offset": offset,
            "limit": limit,
            "total": total,
            "count": results.len(),
            "results": results,
        }
    });
    (StatusCode::OK, Json(body))
}

fn credential_error(status: StatusCode, code: &str, message: &str) -> Reply {
    (status, Json(json!({"code": code, "message": message})))
}

fn status_error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({"code": status.as_u16(), "status": message})))
}

fn entity_not_found(resource: &str) -> Reply {
    let noun = match resource {
        "series" => "series",
        "stories" => "story",
        other => other.trim_end_matches('s'),
    };
    status_error(StatusCode::NOT_FOUND, &format!("We couldn't find that {noun}"))
}

fn resource_not_found(resource: &str) -> Reply {
    credential_error(
        StatusCode::NOT_FOUND,
        "ResourceNotFound",
        &format!("/{resource} does not exist"),
    )
}
