//! Minimal XML element tree.
//!
//! Attributes are ignored and text is trimmed. Children are always held as
//! a sequence, so one `<meeting>` and twenty `<meeting>`s read the same way.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::NormalizeError;
use crate::client::transport::excerpt;

/// An element with its trimmed text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Lowercased local name (namespace prefix stripped).
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// First child with any of the given names.
    pub fn child(&self, names: &[&str]) -> Option<&XmlNode> {
        self.children.iter().find(|c| names.contains(&c.name.as_str()))
    }

    /// All children with any of the given names, in document order.
    pub fn children_named<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children
            .iter()
            .filter(move |c| names.contains(&c.name.as_str()))
    }

    pub fn has_child(&self, names: &[&str]) -> bool {
        self.child(names).is_some()
    }

    /// Text of the first non-empty child among `names`, or empty string.
    pub fn text_of(&self, names: &[&str]) -> String {
        names
            .iter()
            .filter_map(|name| self.child(&[*name]))
            .map(|c| c.text.as_str())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// Numeric child value, 0 when absent or not a number.
    pub fn u32_of(&self, names: &[&str]) -> u32 {
        self.text_of(names).parse().unwrap_or(0)
    }

    /// Boolean child value (`true`/`1`/`yes`), false when absent.
    pub fn bool_of(&self, names: &[&str]) -> bool {
        matches!(
            self.text_of(names).to_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        )
    }

    /// Items named `items`, either directly under this node or under its
    /// first `containers` child.
    pub fn collection<'a>(&'a self, containers: &[&str], items: &'a [&'a str]) -> Vec<&'a XmlNode> {
        let direct: Vec<&XmlNode> = self.children_named(items).collect();
        if !direct.is_empty() {
            return direct;
        }
        match self.child(containers) {
            Some(container) => container.children_named(items).collect(),
            None => Vec::new(),
        }
    }

    /// Escaped document carried by a lone `<string>` root.
    ///
    /// Some installs answer through the .asmx HTTP-GET binding, which wraps
    /// the real payload as text.
    pub fn wrapped_payload(&self) -> Option<&str> {
        (self.is("string") && self.children.is_empty() && self.text.starts_with('<'))
            .then_some(self.text.as_str())
    }
}

/// Parse a document into its root element.
pub fn parse_element(raw: &str) -> Result<XmlNode, NormalizeError> {
    let xml_error = |message: String| NormalizeError::Xml {
        message,
        excerpt: excerpt(raw),
    };

    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(XmlNode::new(local_name(e.local_name().as_ref())));
            }
            Ok(Event::Empty(e)) => {
                let node = XmlNode::new(local_name(e.local_name().as_ref()));
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| xml_error(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text.trim());
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(current) = stack.last_mut() {
                    let inner = c.into_inner();
                    current.text.push_str(String::from_utf8_lossy(&inner).trim());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("document ended with unclosed elements".to_string()));
    }
    root.ok_or_else(|| xml_error("document has no root element".to_string()))
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let root = parse_element(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <committees>
              <committee><committeeid>1</committeeid><committeetitle>Full Council</committeetitle></committee>
              <committee><committeeid>2</committeeid><committeetitle>Planning &amp; Licensing</committeetitle></committee>
            </committees>"#,
        )
        .unwrap();

        assert!(root.is("committees"));
        let committees: Vec<_> = root.children_named(&["committee"]).collect();
        assert_eq!(committees.len(), 2);
        assert_eq!(committees[1].text_of(&["committeetitle"]), "Planning & Licensing");
        assert_eq!(committees[0].u32_of(&["committeeid"]), 1);
    }

    #[test]
    fn test_attributes_ignored_and_names_lowercased() {
        let root = parse_element(r#"<Meetings count="3"><Meeting id="9"><MeetingId>9</MeetingId></Meeting></Meetings>"#)
            .unwrap();
        assert!(root.is("meetings"));
        assert_eq!(root.children[0].u32_of(&["meetingid"]), 9);
    }

    #[test]
    fn test_namespace_prefix_stripped() {
        let root = parse_element(r#"<mg:wards xmlns:mg="urn:x"><mg:ward/></mg:wards>"#).unwrap();
        assert!(root.is("wards"));
        assert!(root.has_child(&["ward"]));
    }

    #[test]
    fn test_single_and_multiple_children_read_alike() {
        let one = parse_element("<meetings><meeting><meetingid>1</meetingid></meeting></meetings>").unwrap();
        let two = parse_element(
            "<meetings><meeting><meetingid>1</meetingid></meeting><meeting><meetingid>2</meetingid></meeting></meetings>",
        )
        .unwrap();
        assert_eq!(one.collection(&[], &["meeting"]).len(), 1);
        assert_eq!(two.collection(&[], &["meeting"]).len(), 2);
    }

    #[test]
    fn test_collection_looks_inside_container() {
        let root = parse_element(
            "<getmeetings><meetings><meeting/><meeting/></meetings></getmeetings>",
        )
        .unwrap();
        assert_eq!(root.collection(&["meetings"], &["meeting"]).len(), 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let root = parse_element("<councillor><fullusername>A</fullusername><district/></councillor>").unwrap();
        assert_eq!(root.text_of(&["district"]), "");
        assert_eq!(root.text_of(&["nope"]), "");
        assert_eq!(root.u32_of(&["councillorid"]), 0);
        assert!(!root.bool_of(&["elected"]));
    }

    #[test]
    fn test_text_of_prefers_first_non_empty_alias() {
        let root = parse_element("<m><title></title><meetingtitle>Cabinet</meetingtitle></m>").unwrap();
        assert_eq!(root.text_of(&["title", "meetingtitle"]), "Cabinet");
    }

    #[test]
    fn test_cdata_text() {
        let root = parse_element("<c><keyposts><![CDATA[Leader <b>of</b> Council]]></keyposts></c>").unwrap();
        assert_eq!(root.text_of(&["keyposts"]), "Leader <b>of</b> Council");
    }

    #[test]
    fn test_string_wrapper_payload() {
        let root = parse_element(
            r#"<string xmlns="http://moderngov.co.uk/namespaces">&lt;committees&gt;&lt;committee&gt;&lt;committeeid&gt;4&lt;/committeeid&gt;&lt;/committee&gt;&lt;/committees&gt;</string>"#,
        )
        .unwrap();
        let payload = root.wrapped_payload().unwrap();
        assert!(payload.starts_with("<committees>"));

        let inner = parse_element(payload).unwrap();
        assert!(inner.is("committees"));
        assert_eq!(inner.children.len(), 1);
        assert!(inner.wrapped_payload().is_none());
    }

    #[test]
    fn test_plain_string_root_is_not_wrapper() {
        let root = parse_element("<string>OK</string>").unwrap();
        assert!(root.wrapped_payload().is_none());
    }

    #[test]
    fn test_unclosed_document_fails() {
        let err = parse_element("<committees><committee>").unwrap_err();
        assert!(matches!(err, NormalizeError::Xml { .. }));
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let err = parse_element("<a><b></a></b>").unwrap_err();
        assert!(matches!(err, NormalizeError::Xml { .. }));
    }
}
