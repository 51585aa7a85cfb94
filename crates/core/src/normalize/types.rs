//! Canonical records returned regardless of upstream XML variant.
//!
//! Every field is always present. Values the upstream omits are empty
//! strings or zero; substituting display placeholders is left to callers.

use serde::{Deserialize, Serialize};

/// A ward and the councillors representing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ward {
    pub title: String,
    pub councillor_count: u32,
    pub councillors: Vec<Councillor>,
}

impl Ward {
    pub fn new(title: String, councillors: Vec<Councillor>) -> Self {
        Self {
            title,
            councillor_count: councillors.len() as u32,
            councillors,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Councillor {
    pub id: u32,
    pub display_name: String,
    pub party: String,
    pub group: String,
    pub district: String,
    pub representing: String,
    pub small_photo_url: String,
    pub large_photo_url: String,
    pub additional_info: String,
    pub key_posts: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Committee {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub committee_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub id: u32,
    pub title: String,
    /// Date as sent by the council, usually `DD/MM/YYYY` or ISO 8601.
    pub date: String,
    pub time: String,
    pub location: String,
    pub committee_id: u32,
    pub committee_title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: u32,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub committee_title: String,
    pub event_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParishCouncil {
    pub id: u32,
    pub title: String,
    pub website: String,
    pub clerk_name: String,
    pub email: String,
}

/// One candidate's result in one ward of one election.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElectionResult {
    pub election_id: u32,
    pub election_title: String,
    pub election_date: String,
    pub ward_title: String,
    pub candidate_name: String,
    pub party: String,
    pub votes: u32,
    pub elected: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebcastMeeting {
    pub id: u32,
    pub title: String,
    pub date: String,
    pub time: String,
    pub committee_title: String,
    pub webcast_url: String,
}

/// A councillor or MP as returned by the representatives operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepresentativeInfo {
    pub id: u32,
    pub name: String,
    pub party: String,
    pub ward_title: String,
    pub role: String,
    pub email: String,
    pub photo_url: String,
}
