use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classify::{ContentKind, classify};

/// Store-assigned identifier of a media record. Never reused once handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    pub url: String,
}

impl MediaRecord {
    pub fn kind(&self) -> ContentKind {
        classify(&self.url)
    }
}

/// A record as submitted, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMedia {
    pub title: String,
    pub url: String,
}

/// Wire shape of a record: the stored fields plus the derived kind.
#[derive(Debug, Serialize)]
pub struct MediaView<'a> {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: &'a str,
    pub url: &'a str,
    pub kind: ContentKind,
}

impl<'a> From<&'a MediaRecord> for MediaView<'a> {
    fn from(record: &'a MediaRecord) -> Self {
        MediaView {
            id: record.id,
            title: &record.title,
            url: &record.url,
            kind: record.kind(),
        }
    }
}
