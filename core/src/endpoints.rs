//! Typed endpoint methods.
//!
//! `Marvel` composes a `MarvelClient` (build/parse) with a `Dispatcher`
//! (sign/send). Every endpoint method is the same three steps: build the
//! request, send it once, unwrap the envelope. Methods are grouped by the
//! resource they live under, so `marvel.stories().characters(42, &query)`
//! reads like the path it requests, `/stories/42/characters`.

use crate::client::MarvelClient;
use crate::config::MarvelConfig;
use crate::envelope::Page;
use crate::error::ClientError;
use crate::query::{
    CharacterQuery, ComicQuery, CreatorQuery, EventQuery, QueryParams, SeriesQuery, StoryQuery,
};
use crate::transport::{CallContext, Dispatcher, ReqwestTransport, Transport};
use crate::types::{Character, Comic, Creator, Entity, Event, Resource, Series, Story};

/// Async client for the Marvel API.
///
/// Holds only immutable state; clones share the transport and are safe to
/// use from many tasks at once.
pub struct Marvel<T = ReqwestTransport> {
    client: MarvelClient,
    dispatcher: Dispatcher<T>,
    context: CallContext,
}

impl<T> Clone for Marvel<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            dispatcher: self.dispatcher.clone(),
            context: self.context.clone(),
        }
    }
}

impl Marvel<ReqwestTransport> {
    /// Client over reqwest, configured from `config`.
    pub fn from_config(config: &MarvelConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.gzip)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Marvel<T> {
    pub fn new(client: MarvelClient, dispatcher: Dispatcher<T>) -> Self {
        Self {
            client,
            dispatcher,
            context: CallContext::default(),
        }
    }

    /// Client over a caller-provided transport, configured from `config`.
    pub fn with_transport(config: &MarvelConfig, transport: T) -> Self {
        let dispatcher = Dispatcher::new(transport, config.credentials()).with_gzip(config.gzip);
        let mut context = CallContext::new();
        if let Some(timeout) = config.timeout.filter(|timeout| !timeout.is_zero()) {
            context = context.with_timeout(timeout);
        }
        Self {
            client: MarvelClient::new(&config.base_url),
            dispatcher,
            context,
        }
    }

    /// A handle whose calls are bound by `context` instead of the default.
    pub fn scoped(&self, context: CallContext) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    pub fn client(&self) -> &MarvelClient {
        &self.client
    }

    /// One page of a top-level list, with the server's paging counters.
    pub async fn list_page<Q: QueryParams>(
        &self,
        query: &Q,
    ) -> Result<Page<Q::Entity>, ClientError> {
        let request = self.client.build_list(query)?;
        let response = self.dispatcher.send(request, &self.context).await?;
        self.client.parse_page(response)
    }

    async fn list<Q: QueryParams>(&self, query: &Q) -> Result<Vec<Q::Entity>, ClientError> {
        self.list_page(query).await.map(|page| page.results)
    }

    async fn related<Q: QueryParams>(
        &self,
        parent: Resource,
        parent_id: i64,
        query: &Q,
    ) -> Result<Vec<Q::Entity>, ClientError> {
        let request = self.client.build_related(parent, parent_id, query)?;
        let response = self.dispatcher.send(request, &self.context).await?;
        self.client.parse_list(response)
    }

    async fn get<E: Entity>(&self, id: i64) -> Result<Option<E>, ClientError> {
        let request = self.client.build_get(E::RESOURCE, id);
        let response = self.dispatcher.send(request, &self.context).await?;
        self.client.parse_get(response, id)
    }

    pub fn characters(&self) -> CharacterEndpoints<'_, T> {
        CharacterEndpoints { marvel: self }
    }

    pub fn comics(&self) -> ComicEndpoints<'_, T> {
        ComicEndpoints { marvel: self }
    }

    pub fn creators(&self) -> CreatorEndpoints<'_, T> {
        CreatorEndpoints { marvel: self }
    }

    pub fn events(&self) -> EventEndpoints<'_, T> {
        EventEndpoints { marvel: self }
    }

    pub fn series(&self) -> SeriesEndpoints<'_, T> {
        SeriesEndpoints { marvel: self }
    }

    pub fn stories(&self) -> StoryEndpoints<'_, T> {
        StoryEndpoints { marvel: self }
    }
}

macro_rules! endpoint_group {
    (
        $group:ident, $resource:expr, $segment:literal, $query:ty => $entity:ty {
            $($relation:ident: $related_query:ty),+ $(,)?
        }
    ) => {
        #[doc = concat!("Endpoints under `/", $segment, "`.")]
        pub struct $group<'a, T> {
            marvel: &'a Marvel<T>,
        }

        impl<T: Transport> $group<'_, T> {
            #[doc = concat!("`GET /", $segment, "`")]
            pub async fn list(&self, query: &$query) -> Result<Vec<$entity>, ClientError> {
                self.marvel.list(query).await
            }

            #[doc = concat!("`GET /", $segment, "/{id}`; `None` when the id is absent from the results.")]
            pub async fn get(&self, id: i64) -> Result<Option<$entity>, ClientError> {
                self.marvel.get::<$entity>(id).await
            }

            $(
                #[doc = concat!("`GET /", $segment, "/{id}/", stringify!($relation), "`")]
                pub async fn $relation(
                    &self,
                    id: i64,
                    query: &$related_query,
                ) -> Result<Vec<<$related_query as QueryParams>::Entity>, ClientError> {
                    self.marvel.related($resource, id, query).await
                }
            )+
        }
    };
}

endpoint_group! {
    CharacterEndpoints, Resource::Characters, "characters", CharacterQuery => Character {
        comics: ComicQuery,
        events: EventQuery,
        series: SeriesQuery,
        stories: StoryQuery,
    }
}

endpoint_group! {
    ComicEndpoints, Resource::Comics, "comics", ComicQuery => Comic {
        characters: CharacterQuery,
        creators: CreatorQuery,
        events: EventQuery,
        stories: StoryQuery,
    }
}

endpoint_group! {
    CreatorEndpoints, Resource::Creators, "creators", CreatorQuery => Creator {
        comics: ComicQuery,
        events: EventQuery,
        series: SeriesQuery,
        stories: StoryQuery,
    }
}

endpoint_group! {
    EventEndpoints, Resource::Events, "events", EventQuery => Event {
        characters: CharacterQuery,
        comics: ComicQuery,
        creators: CreatorQuery,
        series: SeriesQuery,
        stories: StoryQuery,
    }
}

endpoint_group! {
    SeriesEndpoints, Resource::Series, "series", SeriesQuery => Series {
        characters: CharacterQuery,
        comics: ComicQuery,
        creators: CreatorQuery,
        events: EventQuery,
        stories: StoryQuery,
    }
}

endpoint_group! {
    StoryEndpoints, Resource::Stories, "stories", StoryQuery => Story {
        characters: CharacterQuery,
        comics: ComicQuery,
        creators: CreatorQuery,
        events: EventQuery,
        series: SeriesQuery,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse};

    /// Answers every request with the same canned response.
    struct Canned {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    const STORIES: &str = r#"{"code":200,"status":"Ok","data":{"offset":0,"limit":20,"total":3,"count":3,
        "results":[{"id":41},{"id":42},{"id":43}]}}"#;

    fn marvel(transport: Canned) -> Marvel<Canned> {
        let mut config = MarvelConfig::new("pub");
        config.base_url = "http://localhost:3000/v1/public".to_string();
        Marvel::with_transport(&config, transport)
    }

    #[tokio::test]
    async fn get_returns_matching_story() {
        let marvel = marvel(Canned::new(200, STORIES));
        let story = marvel.stories().get(42).await.unwrap();
        assert_eq!(story.map(|s| s.id), Some(42));
    }

    #[tokio::test]
    async fn get_missing_story_is_none() {
        let marvel = marvel(Canned::new(200, STORIES));
        assert!(marvel.stories().get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn relation_hits_nested_path_with_auth() {
        let marvel = marvel(Canned::new(200, STORIES));
        let query = StoryQuery {
            limit: Some(3),
            ..Default::default()
        };
        let stories = marvel.characters().stories(1009610, &query).await.unwrap();
        assert_eq!(stories.len(), 3);

        let seen = marvel.dispatcher_transport_requests();
        assert_eq!(
            seen[0].path,
            "http://localhost:3000/v1/public/characters/1009610/stories"
        );
        assert_eq!(seen[0].query_param("limit"), Some("3"));
        assert_eq!(seen[0].query_param("apikey"), Some("pub"));
    }

    #[tokio::test]
    async fn malformed_parameters_never_reach_transport() {
        let marvel = marvel(Canned::new(200, STORIES));
        let query = ComicQuery {
            date_range_begin: Some(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            ..Default::default()
        };
        let err = marvel.series().comics(1, &query).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedParameters(_)));
        assert!(marvel.dispatcher_transport_requests().is_empty());
    }

    #[tokio::test]
    async fn http_error_surfaces_status() {
        let marvel = marvel(Canned::new(409, r#"{"code":409,"status":"Limit greater than 100."}"#));
        let err = marvel.comics().list(&ComicQuery::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::HttpError { status: 409, .. }));
    }

    #[tokio::test]
    async fn list_page_exposes_totals() {
        let marvel = marvel(Canned::new(200, STORIES));
        let page = marvel.list_page(&StoryQuery::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.results.len(), 3);
    }

    #[tokio::test]
    async fn zero_timeout_means_no_timeout() {
        let mut config = MarvelConfig::new("pub");
        config.timeout = Some(std::time::Duration::ZERO);
        let marvel = Marvel::with_transport(&config, Canned::new(200, STORIES));
        assert!(marvel.context.timeout().is_none());
        assert!(marvel.stories().get(42).await.unwrap().is_some());
    }

    #[test]
    fn marvel_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync + Clone + 'static>() {}
        assert_send_sync::<Marvel>();
        assert_send_sync::<Marvel<Canned>>();
    }

    impl Marvel<Canned> {
        fn dispatcher_transport_requests(&self) -> Vec<HttpRequest> {
            self.dispatcher.transport().seen.lock().unwrap().clone()
        }
    }
}
