//! Branch and staff data structures.

use serde::{Deserialize, Serialize};

/// A staff member listed on a branch's about page.
///
/// Fields other than `name` are frequently missing on the source site;
/// an empty string means the field was absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    /// Display name
    pub name: String,

    /// Position/title text
    pub position: String,

    /// Phone number
    pub phone: String,

    /// Email address (rendered as the link label on the source site)
    pub email: String,
}

impl Person {
    /// True when every field is empty, i.e. the parsed block was not a
    /// real person entry.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.position.is_empty()
            && self.phone.is_empty()
            && self.email.is_empty()
    }
}

/// A branch location record.
///
/// Identified by the absolute URL of its detail page, which serves as the
/// record-store key and is not repeated here as a field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    /// Branch display name
    pub name: String,

    /// Borough name
    pub borough: String,

    /// Postal address, raw text
    pub address: String,

    /// Contact phone
    pub phone: String,

    /// Geocoded latitude, 0.0 when the lookup failed
    pub latitude: f64,

    /// Geocoded longitude, 0.0 when the lookup failed
    pub longitude: f64,

    /// Staff roster, attached after the about page is parsed
    #[serde(default)]
    pub staff: Vec<Person>,
}
