//! Committee list responses.

use super::types::Committee;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const COMMITTEE: &[&str] = &["committee"];
const COMMITTEES: &[&str] = &["committees"];

enum CommitteesShape<'a> {
    List(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> CommitteesShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let committees = root.collection(COMMITTEES, COMMITTEE);
        if !committees.is_empty() {
            return Self::List(committees);
        }
        if root.is("committee") {
            return Self::List(vec![root]);
        }
        Self::Unrecognized
    }
}

pub fn parse_committees(raw: &str) -> Result<Vec<Committee>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match CommitteesShape::classify(&root) {
        CommitteesShape::List(nodes) => nodes.into_iter().map(committee_from).collect(),
        CommitteesShape::Unrecognized => Vec::new(),
    })
}

fn committee_from(node: &XmlNode) -> Committee {
    Committee {
        id: node.u32_of(&["committeeid", "id"]),
        title: node.text_of(&["committeetitle", "title"]),
        description: node.text_of(&["committeedescription", "description", "purpose"]),
        committee_type: node.text_of(&["committeetype", "committeecategory", "type"]),
    }
}
