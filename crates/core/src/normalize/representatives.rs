//! Representative (councillor or MP) responses.

use super::types::RepresentativeInfo;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const REPRESENTATIVE: &[&str] = &["representative", "councillor", "mp"];
const REPRESENTATIVES: &[&str] = &["representatives", "councillors", "mps"];
const WARD: &[&str] = &["ward", "constituency"];
const WARDS: &[&str] = &["wards", "constituencies"];

enum RepresentativesShape<'a> {
    /// `<wards><ward><wardtitle/><representatives><representative/>...`
    ByWard(Vec<&'a XmlNode>),
    /// Representatives listed directly, each naming its own ward.
    Flat(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> RepresentativesShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let wards = root.collection(WARDS, WARD);
        if !wards.is_empty() {
            return Self::ByWard(wards);
        }
        let representatives = root.collection(REPRESENTATIVES, REPRESENTATIVE);
        if !representatives.is_empty() {
            return Self::Flat(representatives);
        }
        Self::Unrecognized
    }
}

pub fn parse_representatives(raw: &str) -> Result<Vec<RepresentativeInfo>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match RepresentativesShape::classify(&root) {
        RepresentativesShape::ByWard(wards) => wards
            .into_iter()
            .flat_map(|ward| {
                let ward_title = ward.text_of(&["wardtitle", "constituencytitle", "title"]);
                ward.collection(REPRESENTATIVES, REPRESENTATIVE)
                    .into_iter()
                    .map(move |node| {
                        let mut rep = representative_from(node);
                        if rep.ward_title.is_empty() {
                            rep.ward_title = ward_title.clone();
                        }
                        rep
                    })
            })
            .collect(),
        RepresentativesShape::Flat(nodes) => nodes.into_iter().map(representative_from).collect(),
        RepresentativesShape::Unrecognized => Vec::new(),
    })
}

fn representative_from(node: &XmlNode) -> RepresentativeInfo {
    RepresentativeInfo {
        id: node.u32_of(&["representativeid", "councillorid", "mpid", "id"]),
        name: node.text_of(&["fullusername", "name", "fullname"]),
        party: node.text_of(&["politicalpartytitle", "party"]),
        ward_title: node.text_of(&["wardtitle", "constituencytitle", "constituency"]),
        role: node.text_of(&["role", "keyposts", "title"]),
        email: node.text_of(&["email", "emailaddress"]),
        photo_url: node.text_of(&["photosmallurl", "photourl", "photobigurl"]),
    }
}
