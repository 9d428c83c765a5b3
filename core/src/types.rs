//! Domain entities returned by the API.
//!
//! # Design
//! Entities are immutable value records filled from response JSON. The API
//! omits or nulls many fields depending on the resource, so everything except
//! the id is optional or defaults to empty. Timestamps such as `modified` are
//! kept as the strings the API sends: they use a `-0500` style offset and the
//! API also emits sentinel dates like `-0001-11-30T00:00:00-0500`.

use std::fmt;

use serde::Deserialize;

/// Top-level API collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
    Comics,
    Creators,
    Events,
    Series,
    Stories,
}

impl Resource {
    /// Path segment below the API root.
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Characters => "characters",
            Resource::Comics => "comics",
            Resource::Creators => "creators",
            Resource::Events => "events",
            Resource::Series => "series",
            Resource::Stories => "stories",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// An entity that lives under one `Resource` and is identified by an id.
pub trait Entity: serde::de::DeserializeOwned {
    const RESOURCE: Resource;

    fn id(&self) -> i64;
}

macro_rules! impl_entity {
    ($($ty:ty => $resource:expr),+ $(,)?) => {
        $(
            impl Entity for $ty {
                const RESOURCE: Resource = $resource;

                fn id(&self) -> i64 {
                    self.id
                }
            }
        )+
    };
}

impl_entity! {
    Character => Resource::Characters,
    Comic => Resource::Comics,
    Creator => Resource::Creators,
    Event => Resource::Events,
    Series => Resource::Series,
    Story => Resource::Stories,
}

/// A public web page for an entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Url {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

/// An image reference; append a variant name and the extension to `path`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Image {
    pub path: Option<String>,
    pub extension: Option<String>,
}

impl Image {
    /// Full URL of the image in the given variant, e.g. `portrait_xlarge`.
    pub fn variant_url(&self, variant: &str) -> Option<String> {
        match (&self.path, &self.extension) {
            (Some(path), Some(extension)) => Some(format!("{path}/{variant}.{extension}")),
            _ => None,
        }
    }
}

/// Short reference to a related resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    pub name: Option<String>,
    /// Story type or creator role, depending on the list.
    #[serde(alias = "role")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A possibly truncated list of related resources.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceList {
    /// Total number of related resources, which may exceed `items.len()`.
    pub available: i32,
    pub returned: i32,
    #[serde(rename = "collectionURI")]
    pub collection_uri: Option<String>,
    pub items: Vec<Summary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComicDate {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComicPrice {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub modified: Option<String>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub urls: Vec<Url>,
    pub thumbnail: Option<Image>,
    pub comics: Option<ResourceList>,
    pub stories: Option<ResourceList>,
    pub events: Option<ResourceList>,
    pub series: Option<ResourceList>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: i64,
    pub digital_id: Option<i64>,
    pub title: Option<String>,
    pub issue_number: Option<f64>,
    pub variant_description: Option<String>,
    pub description: Option<String>,
    pub modified: Option<String>,
    pub isbn: Option<String>,
    pub upc: Option<String>,
    pub diamond_code: Option<String>,
    pub ean: Option<String>,
    pub issn: Option<String>,
    pub format: Option<String>,
    pub page_count: Option<i32>,
    #[serde(default)]
    pub text_objects: Vec<TextObject>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub urls: Vec<Url>,
    pub series: Option<Summary>,
    #[serde(default)]
    pub variants: Vec<Summary>,
    #[serde(default)]
    pub collections: Vec<Summary>,
    #[serde(default)]
    pub collected_issues: Vec<Summary>,
    #[serde(default)]
    pub dates: Vec<ComicDate>,
    #[serde(default)]
    pub prices: Vec<ComicPrice>,
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub creators: Option<ResourceList>,
    pub characters: Option<ResourceList>,
    pub stories: Option<ResourceList>,
    pub events: Option<ResourceList>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: i64,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub full_name: Option<String>,
    pub modified: Option<String>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub urls: Vec<Url>,
    pub thumbnail: Option<Image>,
    pub series: Option<ResourceList>,
    pub stories: Option<ResourceList>,
    pub comics: Option<ResourceList>,
    pub events: Option<ResourceList>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub urls: Vec<Url>,
    pub modified: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub thumbnail: Option<Image>,
    pub comics: Option<ResourceList>,
    pub stories: Option<ResourceList>,
    pub series: Option<ResourceList>,
    pub characters: Option<ResourceList>,
    pub creators: Option<ResourceList>,
    pub next: Option<Summary>,
    pub previous: Option<Summary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub urls: Vec<Url>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub rating: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modified: Option<String>,
    pub thumbnail: Option<Image>,
    pub comics: Option<ResourceList>,
    pub stories: Option<ResourceList>,
    pub events: Option<ResourceList>,
    pub characters: Option<ResourceList>,
    pub creators: Option<ResourceList>,
    pub next: Option<Summary>,
    pub previous: Option<Summary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "resourceURI")]
    pub resource_uri: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modified: Option<String>,
    pub thumbnail: Option<Image>,
    pub comics: Option<ResourceList>,
    pub series: Option<ResourceList>,
    pub events: Option<ResourceList>,
    pub characters: Option<ResourceList>,
    pub creators: Option<ResourceList>,
    pub original_issue: Option<Summary>,
}
