//! Councillor responses (by ward, by ward id, by postcode).

use super::types::{Councillor, Ward};
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const WARD: &[&str] = &["ward"];
const WARDS: &[&str] = &["wards"];
const COUNCILLOR: &[&str] = &["councillor"];
const COUNCILLORS: &[&str] = &["councillors"];

/// Layouts seen for councillor lookups.
enum CouncillorsShape<'a> {
    /// `<wards><ward><wardtitle/><councillors><councillor/>...`
    ByWard(Vec<&'a XmlNode>),
    /// `<councillors><councillor/>...` with an optional sibling `<wardtitle>`.
    Flat {
        ward_title: String,
        councillors: Vec<&'a XmlNode>,
    },
    Unrecognized,
}

impl<'a> CouncillorsShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let wards = root.collection(WARDS, WARD);
        if !wards.is_empty() {
            return Self::ByWard(wards);
        }
        if root.is("ward") {
            return Self::ByWard(vec![root]);
        }

        let councillors = root.collection(COUNCILLORS, COUNCILLOR);
        if !councillors.is_empty() {
            return Self::Flat {
                ward_title: root.text_of(&["wardtitle", "ward_title"]),
                councillors,
            };
        }

        Self::Unrecognized
    }
}

/// Parse any councillor lookup response into wards.
pub fn parse_wards(raw: &str) -> Result<Vec<Ward>, NormalizeError> {
    let root = parse_body(raw)?;

    let wards = match CouncillorsShape::classify(&root) {
        CouncillorsShape::ByWard(wards) => wards.into_iter().map(ward_from).collect(),
        CouncillorsShape::Flat {
            ward_title,
            councillors,
        } => vec![Ward::new(
            ward_title,
            councillors.into_iter().map(councillor_from).collect(),
        )],
        CouncillorsShape::Unrecognized => Vec::new(),
    };

    Ok(wards)
}

fn ward_from(node: &XmlNode) -> Ward {
    let councillors = node
        .collection(COUNCILLORS, COUNCILLOR)
        .into_iter()
        .map(councillor_from)
        .collect();
    Ward::new(node.text_of(&["wardtitle", "title"]), councillors)
}

fn councillor_from(node: &XmlNode) -> Councillor {
    Councillor {
        id: node.u32_of(&["councillorid", "id"]),
        display_name: node.text_of(&["fullusername", "displayname", "name"]),
        party: node.text_of(&["politicalpartytitle", "party"]),
        group: node.text_of(&["politicalgrouptitle", "group"]),
        district: node.text_of(&["district"]),
        representing: node.text_of(&["representing"]),
        small_photo_url: node.text_of(&["photosmallurl"]),
        large_photo_url: node.text_of(&["photobigurl", "photolargeurl"]),
        additional_info: node.text_of(&["additionalinfo", "workaddress"]),
        key_posts: node.text_of(&["keyposts"]),
    }
}
