//! Calendar event responses.

use super::types::CalendarEvent;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const EVENT: &[&str] = &["event", "calendarevent"];
const EVENTS: &[&str] = &["events", "calendarevents"];

enum CalendarShape<'a> {
    Events(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> CalendarShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let events = root.collection(EVENTS, EVENT);
        if events.is_empty() {
            Self::Unrecognized
        } else {
            Self::Events(events)
        }
    }
}

pub fn parse_calendar_events(raw: &str) -> Result<Vec<CalendarEvent>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match CalendarShape::classify(&root) {
        CalendarShape::Events(nodes) => nodes.into_iter().map(event_from).collect(),
        CalendarShape::Unrecognized => Vec::new(),
    })
}

fn event_from(node: &XmlNode) -> CalendarEvent {
    CalendarEvent {
        id: node.u32_of(&["eventid", "meetingid", "id"]),
        title: node.text_of(&["eventtitle", "title", "committeetitle"]),
        date: node.text_of(&["eventdate", "meetingdate", "date"]),
        time: node.text_of(&["eventtime", "meetingtime", "time"]),
        location: node.text_of(&["eventlocation", "location", "venue"]),
        committee_title: node.text_of(&["committeetitle"]),
        event_type: node.text_of(&["eventtype", "type"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_events() {
        let events = parse_calendar_events(
            r#"<calendarevents>
                <event>
                  <eventid>9</eventid>
                  <eventtitle>Licensing Sub-Committee</eventtitle>
                  <eventdate>2024-04-02</eventdate>
                  <eventtime>10:00</eventtime>
                  <eventtype>Meeting</eventtype>
                </event>
              </calendarevents>"#,
        )
        .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 9);
        assert_eq!(events[0].title, "Licensing Sub-Committee");
        assert_eq!(events[0].event_type, "Meeting");
        assert_eq!(events[0].location, "");
    }

    #[test]
    fn test_meeting_style_fields() {
        let events = parse_calendar_events(
            "<events><calendarevent><meetingid>4</meetingid><committeetitle>Cabinet</committeetitle><meetingdate>01/05/2024</meetingdate></calendarevent></events>",
        )
        .unwrap();
        assert_eq!(events[0].id, 4);
        assert_eq!(events[0].title, "Cabinet");
        assert_eq!(events[0].committee_title, "Cabinet");
        assert_eq!(events[0].date, "01/05/2024");
    }

    #[test]
    fn test_no_events() {
        assert!(parse_calendar_events("<calendarevents/>").unwrap().is_empty());
    }
}
