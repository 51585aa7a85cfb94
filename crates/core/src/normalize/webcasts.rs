//! Webcast meeting responses.

use super::types::WebcastMeeting;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const WEBCAST: &[&str] = &["webcast"];
const WEBCASTS: &[&str] = &["webcasts"];
const MEETING: &[&str] = &["meeting", "webcastmeeting"];
const MEETINGS: &[&str] = &["meetings", "webcastmeetings"];

enum WebcastsShape<'a> {
    /// `<webcasts><webcast/>...`
    Webcasts(Vec<&'a XmlNode>),
    /// `<webcastmeetings><meeting/>...` with webcast links on each meeting.
    Meetings(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> WebcastsShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let webcasts = root.collection(WEBCASTS, WEBCAST);
        if !webcasts.is_empty() {
            return Self::Webcasts(webcasts);
        }
        let meetings = root.collection(MEETINGS, MEETING);
        if !meetings.is_empty() {
            return Self::Meetings(meetings);
        }
        Self::Unrecognized
    }
}

pub fn parse_webcast_meetings(raw: &str) -> Result<Vec<WebcastMeeting>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match WebcastsShape::classify(&root) {
        WebcastsShape::Webcasts(nodes) | WebcastsShape::Meetings(nodes) => {
            nodes.into_iter().map(webcast_from).collect()
        }
        WebcastsShape::Unrecognized => Vec::new(),
    })
}

fn webcast_from(node: &XmlNode) -> WebcastMeeting {
    let committee_title = node.text_of(&["committeetitle"]);
    let mut title = node.text_of(&["webcasttitle", "meetingtitle", "title"]);
    if title.is_empty() {
        title = committee_title.clone();
    }

    WebcastMeeting {
        id: node.u32_of(&["webcastid", "meetingid", "id"]),
        title,
        date: node.text_of(&["webcastdate", "meetingdate", "date"]),
        time: node.text_of(&["webcasttime", "meetingtime", "time"]),
        committee_title,
        webcast_url: node.text_of(&["webcasturl", "url", "link"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webcasts_shape() {
        let webcasts = parse_webcast_meetings(
            r#"<webcasts>
                <webcast>
                  <webcastid>8</webcastid>
                  <webcasttitle>Full Council</webcasttitle>
                  <webcastdate>2024-07-10</webcastdate>
                  <webcasturl>https://stream.example/8</webcasturl>
                </webcast>
              </webcasts>"#,
        )
        .unwrap();
        assert_eq!(webcasts.len(), 1);
        assert_eq!(webcasts[0].webcast_url, "https://stream.example/8");
        assert_eq!(webcasts[0].time, "");
    }

    #[test]
    fn test_meetings_shape() {
        let webcasts = parse_webcast_meetings(
            "<webcastmeetings><meeting><meetingid>2</meetingid><committeetitle>Cabinet</committeetitle><url>https://s/2</url></meeting></webcastmeetings>",
        )
        .unwrap();
        assert_eq!(webcasts[0].id, 2);
        assert_eq!(webcasts[0].title, "Cabinet");
        assert_eq!(webcasts[0].webcast_url, "https://s/2");
    }

    #[test]
    fn test_none() {
        assert!(parse_webcast_meetings("<webcasts/>").unwrap().is_empty());
    }
}
