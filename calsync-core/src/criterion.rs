//! The copy criterion: which event field is searched, and for what.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CalSyncError, CalSyncResult};
use crate::event::Event;

/// The event field a criterion pattern is searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionField {
    Title,
    Location,
    Content,
}

impl CriterionField {
    pub const ALL: [CriterionField; 3] = [
        CriterionField::Title,
        CriterionField::Location,
        CriterionField::Content,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CriterionField::Title => "title",
            CriterionField::Location => "location",
            CriterionField::Content => "content",
        }
    }

    /// The text of this field on `event`, if present.
    pub fn text<'a>(&self, event: &'a Event) -> Option<&'a str> {
        match self {
            CriterionField::Title => event.title.as_deref(),
            CriterionField::Location => event.location.as_deref(),
            CriterionField::Content => event.content.as_deref(),
        }
    }
}

impl FromStr for CriterionField {
    type Err = CalSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CriterionField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CalSyncError::Config(format!(
                    "Unknown copy criteria field '{s}' (expected title, location or content)"
                ))
            })
    }
}

impl fmt::Display for CriterionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field plus a compiled regular expression searched within it.
#[derive(Debug, Clone)]
pub struct CopyCriterion {
    field: CriterionField,
    pattern: Regex,
}

impl CopyCriterion {
    pub fn new(field: CriterionField, pattern: &str) -> CalSyncResult<Self> {
        let pattern = Regex::new(pattern).map_err(|source| CalSyncError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(CopyCriterion { field, pattern })
    }

    /// Build from the raw `field` and `value` strings found in configuration.
    pub fn parse(field: &str, pattern: &str) -> CalSyncResult<Self> {
        Self::new(field.parse()?, pattern)
    }

    pub fn field(&self) -> CriterionField {
        self.field
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.pattern
    }
}

impl fmt::Display for CopyCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.pattern)
    }
}
