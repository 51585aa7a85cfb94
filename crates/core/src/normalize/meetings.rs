//! Meeting responses.
//!
//! The same logical "list meetings" call comes back in one of several
//! layouts depending on the install: grouped under the committee, a flat
//! date-ordered list, or just a count with no meeting nodes at all.

use super::types::Meeting;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const MEETING: &[&str] = &["meeting"];
const MEETINGS: &[&str] = &["meetings"];
const COMMITTEE: &[&str] = &["committee"];
const COMMITTEES: &[&str] = &["committees"];
const MEETING_COUNT: &[&str] = &["meetingcount", "count"];

enum MeetingsShape<'a> {
    /// `<committee><committeeid/><committeetitle/><meetings><meeting/>...`
    CommitteeNested(Vec<&'a XmlNode>),
    /// `<meetings><meeting/>...` in date order.
    Flat(Vec<&'a XmlNode>),
    /// A lone `<meeting>` root (single meeting lookups).
    Single(&'a XmlNode),
    /// Only a meeting count, no records.
    CountOnly,
    Unrecognized,
}

impl<'a> MeetingsShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        if root.is("meeting") {
            return Self::Single(root);
        }

        let committees: Vec<&XmlNode> = root
            .collection(COMMITTEES, COMMITTEE)
            .into_iter()
            .filter(|c| !c.collection(MEETINGS, MEETING).is_empty())
            .collect();
        if !committees.is_empty() {
            return Self::CommitteeNested(committees);
        }
        if root.is("committee") && !root.collection(MEETINGS, MEETING).is_empty() {
            return Self::CommitteeNested(vec![root]);
        }

        let meetings = root.collection(MEETINGS, MEETING);
        if !meetings.is_empty() {
            return Self::Flat(meetings);
        }

        if root.has_child(MEETING_COUNT) {
            return Self::CountOnly;
        }

        Self::Unrecognized
    }
}

/// Parse a meetings list response.
pub fn parse_meetings(raw: &str) -> Result<Vec<Meeting>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match MeetingsShape::classify(&root) {
        MeetingsShape::CommitteeNested(committees) => committees
            .into_iter()
            .flat_map(|committee| {
                let committee_id = committee.u32_of(&["committeeid"]);
                let committee_title = committee.text_of(&["committeetitle", "title"]);
                committee
                    .collection(MEETINGS, MEETING)
                    .into_iter()
                    .map(move |node| {
                        let mut meeting = meeting_from(node);
                        if meeting.committee_id == 0 {
                            meeting.committee_id = committee_id;
                        }
                        if meeting.committee_title.is_empty() {
                            meeting.committee_title = committee_title.clone();
                        }
                        if meeting.title.is_empty() {
                            meeting.title = meeting.committee_title.clone();
                        }
                        meeting
                    })
            })
            .collect(),
        MeetingsShape::Flat(nodes) => nodes.into_iter().map(meeting_from).collect(),
        MeetingsShape::Single(node) => vec![meeting_from(node)],
        MeetingsShape::CountOnly | MeetingsShape::Unrecognized => Vec::new(),
    })
}

/// Parse a single-meeting response. `None` when the body holds no meeting.
pub fn parse_meeting(raw: &str) -> Result<Option<Meeting>, NormalizeError> {
    Ok(parse_meetings(raw)?.into_iter().next())
}

fn meeting_from(node: &XmlNode) -> Meeting {
    let committee_title = node.text_of(&["committeetitle", "committeename"]);
    let mut title = node.text_of(&["meetingtitle", "title"]);
    if title.is_empty() {
        title = committee_title.clone();
    }

    Meeting {
        id: node.u32_of(&["meetingid", "id"]),
        title,
        date: node.text_of(&["meetingdate", "date"]),
        time: node.text_of(&["meetingtime", "time"]),
        location: node.text_of(&["meetinglocation", "location", "venue"]),
        committee_id: node.u32_of(&["committeeid"]),
        committee_title,
    }
}
