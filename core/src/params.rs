//! Enumerated filter values and their wire tokens.
//!
//! Each enum maps to the exact string the API expects through a fixed table
//! generated by `wire_enum!`. Parsing goes the other way and is the only place
//! an unknown token can appear, so it is where `InvalidEnumValue` comes from.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// A closed enum with a fixed wire token per variant.
pub trait WireToken: Copy {
    fn as_wire(self) -> &'static str;
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Token sent on the wire for this value.
            pub fn as_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl WireToken for $name {
            fn as_wire(self) -> &'static str {
                $name::as_wire(self)
            }
        }

        impl FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(ClientError::invalid_enum($kind, other)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ClientError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    };
}

wire_enum! {
    /// Sort key and direction for the `orderBy` parameter.
    ///
    /// Not every endpoint accepts every key; see `QueryParams::ORDER_BY`.
    pub enum OrderBy as "orderBy" {
        Id => "id",
        IdDesc => "-id",
        Name => "name",
        NameDesc => "-name",
        Modified => "modified",
        ModifiedDesc => "-modified",
        Title => "title",
        TitleDesc => "-title",
        FocDate => "focDate",
        FocDateDesc => "-focDate",
        OnsaleDate => "onsaleDate",
        OnsaleDateDesc => "-onsaleDate",
        IssueNumber => "issueNumber",
        IssueNumberDesc => "-issueNumber",
        FirstName => "firstName",
        FirstNameDesc => "-firstName",
        MiddleName => "middleName",
        MiddleNameDesc => "-middleName",
        LastName => "lastName",
        LastNameDesc => "-lastName",
        Suffix => "suffix",
        SuffixDesc => "-suffix",
        StartDate => "startDate",
        StartDateDesc => "-startDate",
        StartYear => "startYear",
        StartYearDesc => "-startYear",
    }
}

wire_enum! {
    /// Publication format of a comic.
    pub enum ComicFormat as "format" {
        Comic => "comic",
        Magazine => "magazine",
        TradePaperback => "trade paperback",
        Hardcover => "hardcover",
        Digest => "digest",
        GraphicNovel => "graphic novel",
        DigitalComic => "digital comic",
        InfiniteComic => "infinite comic",
    }
}

wire_enum! {
    pub enum FormatType as "formatType" {
        Comic => "comic",
        Collection => "collection",
    }
}

wire_enum! {
    /// Predefined on-sale date windows.
    pub enum DateDescriptor as "dateDescriptor" {
        LastWeek => "lastWeek",
        ThisWeek => "thisWeek",
        NextWeek => "nextWeek",
        ThisMonth => "thisMonth",
    }
}

wire_enum! {
    pub enum SeriesType as "seriesType" {
        Collection => "collection",
        OneShot => "one shot",
        Limited => "limited",
        Ongoing => "ongoing",
    }
}

/// Keep the requested sort keys the endpoint accepts, in request order.
pub fn allowed_order(requested: &[OrderBy], whitelist: &[OrderBy]) -> Vec<OrderBy> {
    requested
        .iter()
        .copied()
        .filter(|order| whitelist.contains(order))
        .collect()
}
