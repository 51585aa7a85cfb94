//! Parish council responses.

use super::types::ParishCouncil;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const PARISH: &[&str] = &["parishcouncil", "parish"];
const PARISHES: &[&str] = &["parishcouncils", "parishes"];

enum ParishShape<'a> {
    List(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> ParishShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let parishes = root.collection(PARISHES, PARISH);
        if parishes.is_empty() {
            Self::Unrecognized
        } else {
            Self::List(parishes)
        }
    }
}

pub fn parse_parish_councils(raw: &str) -> Result<Vec<ParishCouncil>, NormalizeError> {
    let root = parse_body(raw)?;

    Ok(match ParishShape::classify(&root) {
        ParishShape::List(nodes) => nodes.into_iter().map(parish_from).collect(),
        ParishShape::Unrecognized => Vec::new(),
    })
}

fn parish_from(node: &XmlNode) -> ParishCouncil {
    ParishCouncil {
        id: node.u32_of(&["parishid", "parishcouncilid", "id"]),
        title: node.text_of(&["parishtitle", "parishcounciltitle", "title", "name"]),
        website: node.text_of(&["website", "url", "weburl"]),
        clerk_name: node.text_of(&["clerkname", "clerk"]),
        email: node.text_of(&["email", "clerkemail"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parish_list() {
        let parishes = parse_parish_councils(
            r#"<parishcouncils>
                <parishcouncil>
                  <parishid>3</parishid>
                  <parishtitle>Aberford and District Parish Council</parishtitle>
                  <website>https://aberford.example</website>
                  <clerkname>J. Clerk</clerkname>
                </parishcouncil>
                <parishcouncil>
                  <parishid>4</parishid>
                  <parishtitle>Bardsey cum Rigton Parish Council</parishtitle>
                </parishcouncil>
              </parishcouncils>"#,
        )
        .unwrap();

        assert_eq!(parishes.len(), 2);
        assert_eq!(parishes[0].clerk_name, "J. Clerk");
        assert_eq!(parishes[1].website, "");
        assert_eq!(parishes[1].email, "");
    }

    #[test]
    fn test_unknown_shape_empty() {
        assert!(parse_parish_councils("<towncouncils><tc/></towncouncils>")
            .unwrap()
            .is_empty());
    }
}
