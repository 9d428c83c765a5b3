//! Query parameter models and the builder that serializes them.
//!
//! # Design
//! Every endpoint family shares one serialization routine: a query struct
//! implements [`QueryParams`] by naming its wire parameters in order through
//! a [`QueryBuilder`]. The builder owns the rules for turning optional values
//! into query pairs (unset values vanish, ids are comma-joined, dates use
//! `YYYY-MM-DD`, non-positive paging is dropped), so the per-endpoint code is
//! only the field-to-name mapping and the `orderBy` whitelist.
//!
//! The same struct serves the top-level list and every relation list that
//! returns that entity type. `/comics` and `/characters/{id}/comics` both
//! take a [`ComicQuery`].

use std::fmt::Display;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ClientError;
use crate::params::{
    allowed_order, ComicFormat, DateDescriptor, FormatType, OrderBy, SeriesType, WireToken,
};
use crate::types::{Character, Comic, Creator, Entity, Event, Series, Story};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parameter model for one endpoint family.
pub trait QueryParams {
    /// Entity type returned by endpoints that accept this query.
    type Entity: Entity;

    /// Sort keys the endpoints accept; anything else is dropped.
    const ORDER_BY: &'static [OrderBy];

    /// Append this query's parameters, in wire order.
    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError>;
}

/// Serialize a parameter model into ordered query pairs.
pub fn build_query<Q: QueryParams>(params: &Q) -> Result<Vec<(String, String)>, ClientError> {
    let mut query = QueryBuilder::new();
    params.write(&mut query)?;
    Ok(query.finish())
}

/// Accumulates query pairs, skipping anything unset.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, value: String) -> &mut Self {
        self.pairs.push((name.to_string(), value));
        self
    }

    /// Text filter; `None`, empty and whitespace-only values are omitted.
    pub fn text(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.trim().is_empty() => self.push(name, value.to_string()),
            _ => self,
        }
    }

    pub fn number<T: Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        match value {
            Some(value) => self.push(name, value.to_string()),
            None => self,
        }
    }

    pub fn flag(&mut self, name: &str, value: Option<bool>) -> &mut Self {
        match value {
            Some(value) => self.push(name, value.to_string()),
            None => self,
        }
    }

    pub fn date(&mut self, name: &str, value: Option<NaiveDate>) -> &mut Self {
        match value {
            Some(date) => self.push(name, date.format(DATE_FORMAT).to_string()),
            None => self,
        }
    }

    /// `begin,end` date range. Both bounds or neither; `begin <= end`.
    pub fn date_range(
        &mut self,
        name: &str,
        begin: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<&mut Self, ClientError> {
        match (begin, end) {
            (None, None) => Ok(self),
            (Some(begin), Some(end)) if begin <= end => Ok(self.push(
                name,
                format!("{},{}", begin.format(DATE_FORMAT), end.format(DATE_FORMAT)),
            )),
            (Some(begin), Some(end)) => Err(ClientError::MalformedParameters(format!(
                "{name} begins on {begin} which is after its end {end}"
            ))),
            _ => Err(ClientError::MalformedParameters(format!(
                "{name} requires both a begin and an end date"
            ))),
        }
    }

    /// Comma-joined ids in the order given; an empty slice emits nothing.
    pub fn ids(&mut self, name: &str, ids: &[i64]) -> &mut Self {
        if ids.is_empty() {
            return self;
        }
        let joined = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
        self.push(name, joined)
    }

    pub fn token<E: WireToken>(&mut self, name: &str, value: Option<E>) -> &mut Self {
        match value {
            Some(value) => self.push(name, WireToken::as_wire(value).to_string()),
            None => self,
        }
    }

    /// Comma-joined wire tokens; an empty slice emits nothing.
    pub fn tokens<E: WireToken>(&mut self, name: &str, values: &[E]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .copied()
            .map(WireToken::as_wire)
            .collect::<Vec<_>>()
            .join(",");
        self.push(name, joined)
    }

    /// Single comma-joined `orderBy` restricted to `whitelist`.
    pub fn order_by(&mut self, requested: &[OrderBy], whitelist: &[OrderBy]) -> &mut Self {
        let allowed = allowed_order(requested, whitelist);
        self.tokens("orderBy", &allowed)
    }

    /// `limit` and `offset`, each only when strictly positive.
    pub fn paging(&mut self, limit: Option<i32>, offset: Option<i32>) -> &mut Self {
        self.number("limit", limit.filter(|n| *n > 0))
            .number("offset", offset.filter(|n| *n > 0))
    }

    pub fn finish(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// Filters for endpoints returning characters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterQuery {
    pub name: Option<String>,
    pub name_starts_with: Option<String>,
    pub modified_since: Option<NaiveDate>,
    pub comics: Vec<i64>,
    pub series: Vec<i64>,
    pub events: Vec<i64>,
    pub stories: Vec<i64>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for CharacterQuery {
    type Entity = Character;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::Name,
        OrderBy::NameDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .text("name", self.name.as_deref())
            .text("nameStartsWith", self.name_starts_with.as_deref())
            .date("modifiedSince", self.modified_since)
            .ids("comics", &self.comics)
            .ids("series", &self.series)
            .ids("events", &self.events)
            .ids("stories", &self.stories)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}

/// Filters for endpoints returning comics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComicQuery {
    pub format: Option<ComicFormat>,
    pub format_type: Option<FormatType>,
    pub no_variants: Option<bool>,
    pub date_descriptor: Option<DateDescriptor>,
    pub date_range_begin: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub title: Option<String>,
    pub title_starts_with: Option<String>,
    pub start_year: Option<i32>,
    pub issue_number: Option<i32>,
    pub diamond_code: Option<String>,
    pub digital_id: Option<i64>,
    pub upc: Option<String>,
    pub isbn: Option<String>,
    pub ean: Option<String>,
    pub issn: Option<String>,
    pub has_digital_issue: Option<bool>,
    pub modified_since: Option<NaiveDate>,
    pub creators: Vec<i64>,
    pub characters: Vec<i64>,
    pub series: Vec<i64>,
    pub events: Vec<i64>,
    pub stories: Vec<i64>,
    /// Comics in which all of these characters appear together.
    pub shared_appearances: Vec<i64>,
    /// Comics on which all of these creators worked together.
    pub collaborators: Vec<i64>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for ComicQuery {
    type Entity = Comic;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::FocDate,
        OrderBy::FocDateDesc,
        OrderBy::OnsaleDate,
        OrderBy::OnsaleDateDesc,
        OrderBy::Title,
        OrderBy::TitleDesc,
        OrderBy::IssueNumber,
        OrderBy::IssueNumberDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .token("format", self.format)
            .token("formatType", self.format_type)
            .flag("noVariants", self.no_variants)
            .token("dateDescriptor", self.date_descriptor)
            .date_range("dateRange", self.date_range_begin, self.date_range_end)?
            .text("title", self.title.as_deref())
            .text("titleStartsWith", self.title_starts_with.as_deref())
            .number("startYear", self.start_year)
            .number("issueNumber", self.issue_number)
            .text("diamondCode", self.diamond_code.as_deref())
            .number("digitalId", self.digital_id)
            .text("upc", self.upc.as_deref())
            .text("isbn", self.isbn.as_deref())
            .text("ean", self.ean.as_deref())
            .text("issn", self.issn.as_deref())
            .flag("hasDigitalIssue", self.has_digital_issue)
            .date("modifiedSince", self.modified_since)
            .ids("creators", &self.creators)
            .ids("characters", &self.characters)
            .ids("series", &self.series)
            .ids("events", &self.events)
            .ids("stories", &self.stories)
            .ids("sharedAppearances", &self.shared_appearances)
            .ids("collaborators", &self.collaborators)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}

/// Filters for endpoints returning creators.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorQuery {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub name_starts_with: Option<String>,
    pub first_name_starts_with: Option<String>,
    pub middle_name_starts_with: Option<String>,
    pub last_name_starts_with: Option<String>,
    pub modified_since: Option<NaiveDate>,
    pub comics: Vec<i64>,
    pub series: Vec<i64>,
    pub events: Vec<i64>,
    pub stories: Vec<i64>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for CreatorQuery {
    type Entity = Creator;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::FirstName,
        OrderBy::FirstNameDesc,
        OrderBy::MiddleName,
        OrderBy::MiddleNameDesc,
        OrderBy::LastName,
        OrderBy::LastNameDesc,
        OrderBy::Suffix,
        OrderBy::SuffixDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .text("firstName", self.first_name.as_deref())
            .text("middleName", self.middle_name.as_deref())
            .text("lastName", self.last_name.as_deref())
            .text("suffix", self.suffix.as_deref())
            .text("nameStartsWith", self.name_starts_with.as_deref())
            .text("firstNameStartsWith", self.first_name_starts_with.as_deref())
            .text("middleNameStartsWith", self.middle_name_starts_with.as_deref())
            .text("lastNameStartsWith", self.last_name_starts_with.as_deref())
            .date("modifiedSince", self.modified_since)
            .ids("comics", &self.comics)
            .ids("series", &self.series)
            .ids("events", &self.events)
            .ids("stories", &self.stories)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}

/// Filters for endpoints returning events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventQuery {
    pub name: Option<String>,
    pub name_starts_with: Option<String>,
    pub modified_since: Option<NaiveDate>,
    pub creators: Vec<i64>,
    pub characters: Vec<i64>,
    pub series: Vec<i64>,
    pub comics: Vec<i64>,
    pub stories: Vec<i64>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for EventQuery {
    type Entity = Event;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::Name,
        OrderBy::NameDesc,
        OrderBy::StartDate,
        OrderBy::StartDateDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .text("name", self.name.as_deref())
            .text("nameStartsWith", self.name_starts_with.as_deref())
            .date("modifiedSince", self.modified_since)
            .ids("creators", &self.creators)
            .ids("characters", &self.characters)
            .ids("series", &self.series)
            .ids("comics", &self.comics)
            .ids("stories", &self.stories)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}

/// Filters for endpoints returning series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesQuery {
    pub title: Option<String>,
    pub title_starts_with: Option<String>,
    pub start_year: Option<i32>,
    pub modified_since: Option<NaiveDate>,
    pub comics: Vec<i64>,
    pub stories: Vec<i64>,
    pub events: Vec<i64>,
    pub creators: Vec<i64>,
    pub characters: Vec<i64>,
    pub series_type: Option<SeriesType>,
    /// Series containing at least one comic in any of these formats.
    pub contains: Vec<ComicFormat>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for SeriesQuery {
    type Entity = Series;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::Title,
        OrderBy::TitleDesc,
        OrderBy::StartYear,
        OrderBy::StartYearDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .text("title", self.title.as_deref())
            .text("titleStartsWith", self.title_starts_with.as_deref())
            .number("startYear", self.start_year)
            .date("modifiedSince", self.modified_since)
            .ids("comics", &self.comics)
            .ids("stories", &self.stories)
            .ids("events", &self.events)
            .ids("creators", &self.creators)
            .ids("characters", &self.characters)
            .token("seriesType", self.series_type)
            .tokens("contains", &self.contains)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}

/// Filters for endpoints returning stories.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryQuery {
    pub modified_since: Option<NaiveDate>,
    pub comics: Vec<i64>,
    pub series: Vec<i64>,
    pub events: Vec<i64>,
    pub creators: Vec<i64>,
    pub characters: Vec<i64>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl QueryParams for StoryQuery {
    type Entity = Story;

    const ORDER_BY: &'static [OrderBy] = &[
        OrderBy::Id,
        OrderBy::IdDesc,
        OrderBy::Modified,
        OrderBy::ModifiedDesc,
    ];

    fn write(&self, query: &mut QueryBuilder) -> Result<(), ClientError> {
        query
            .date("modifiedSince", self.modified_since)
            .ids("comics", &self.comics)
            .ids("series", &self.series)
            .ids("events", &self.events)
            .ids("creators", &self.creators)
            .ids("characters", &self.characters)
            .order_by(&self.order, Self::ORDER_BY)
            .paging(self.limit, self.offset);
        Ok(())
    }
}
