//! Election result responses, flattened to one record per candidate.

use super::types::ElectionResult;
use super::xml::XmlNode;
use super::{parse_body, NormalizeError};

const ELECTION: &[&str] = &["election"];
const ELECTIONS: &[&str] = &["elections"];
const WARD: &[&str] = &["ward", "electionarea", "area"];
const WARDS: &[&str] = &["wards", "electionareas", "areas"];
const CANDIDATE: &[&str] = &["candidate", "result"];
const CANDIDATES: &[&str] = &["candidates", "results"];

enum ElectionsShape<'a> {
    /// `<election><ward><candidate/>...` possibly several elections.
    Nested(Vec<&'a XmlNode>),
    /// Candidates directly under the root, each carrying its own ward.
    Flat(Vec<&'a XmlNode>),
    Unrecognized,
}

impl<'a> ElectionsShape<'a> {
    fn classify(root: &'a XmlNode) -> Self {
        let elections = root.collection(ELECTIONS, ELECTION);
        if !elections.is_empty() {
            return Self::Nested(elections);
        }
        if root.is("election") || root.has_child(WARDS) || root.has_child(WARD) {
            return Self::Nested(vec![root]);
        }

        let candidates = root.collection(CANDIDATES, CANDIDATE);
        if !candidates.is_empty() {
            return Self::Flat(candidates);
        }

        Self::Unrecognized
    }
}

/// Context inherited from enclosing election/ward nodes.
#[derive(Default, Clone)]
struct Scope {
    election_id: u32,
    election_title: String,
    election_date: String,
    ward_title: String,
}

pub fn parse_election_results(raw: &str) -> Result<Vec<ElectionResult>, NormalizeError> {
    let root = parse_body(raw)?;

    let mut results = Vec::new();
    match ElectionsShape::classify(&root) {
        ElectionsShape::Nested(elections) => {
            for election in elections {
                let scope = Scope {
                    election_id: election.u32_of(&["electionid", "id"]),
                    election_title: election.text_of(&["electiontitle", "title"]),
                    election_date: election.text_of(&["electiondate", "date"]),
                    ward_title: String::new(),
                };
                for ward in election.collection(WARDS, WARD) {
                    let scope = Scope {
                        ward_title: ward.text_of(&["wardtitle", "areatitle", "title"]),
                        ..scope.clone()
                    };
                    for candidate in ward.collection(CANDIDATES, CANDIDATE) {
                        results.push(result_from(candidate, &scope));
                    }
                }
            }
        }
        ElectionsShape::Flat(candidates) => {
            let scope = Scope {
                election_id: root.u32_of(&["electionid"]),
                election_title: root.text_of(&["electiontitle"]),
                election_date: root.text_of(&["electiondate"]),
                ward_title: root.text_of(&["wardtitle"]),
            };
            for candidate in candidates {
                results.push(result_from(candidate, &scope));
            }
        }
        ElectionsShape::Unrecognized => {}
    }

    Ok(results)
}

fn result_from(node: &XmlNode, scope: &Scope) -> ElectionResult {
    let own = |names: &[&str], inherited: &str| {
        let value = node.text_of(names);
        if value.is_empty() {
            inherited.to_string()
        } else {
            value
        }
    };

    let election_id = match node.u32_of(&["electionid"]) {
        0 => scope.election_id,
        id => id,
    };

    ElectionResult {
        election_id,
        election_title: own(&["electiontitle"], &scope.election_title),
        election_date: own(&["electiondate"], &scope.election_date),
        ward_title: own(&["wardtitle", "areatitle"], &scope.ward_title),
        candidate_name: node.text_of(&["candidatename", "name", "fullname"]),
        party: node.text_of(&["partytitle", "party", "politicalpartytitle"]),
        votes: node.u32_of(&["votes", "numvotes"]),
        elected: node.bool_of(&["elected", "iselected"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_results() {
        let results = parse_election_results(
            r#"<electionresults>
                <election>
                  <electionid>12</electionid>
                  <electiontitle>Local Elections 2024</electiontitle>
                  <electiondate>02/05/2024</electiondate>
                  <wards>
                    <ward>
                      <wardtitle>Armley</wardtitle>
                      <candidates>
                        <candidate><candidatename>A Person</candidatename><partytitle>Labour</partytitle><votes>2310</votes><elected>True</elected></candidate>
                        <candidate><candidatename>B Person</candidatename><partytitle>Green</partytitle><votes>780</votes><elected>False</elected></candidate>
                      </candidates>
                    </ward>
                    <ward>
                      <wardtitle>Bramley</wardtitle>
                      <candidates>
                        <candidate><candidatename>C Person</candidatename><votes>1999</votes></candidate>
                      </candidates>
                    </ward>
                  </wards>
                </election>
              </electionresults>"#,
        )
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].election_id, 12);
        assert_eq!(results[0].ward_title, "Armley");
        assert_eq!(results[0].votes, 2310);
        assert!(results[0].elected);
        assert!(!results[1].elected);
        assert_eq!(results[2].ward_title, "Bramley");
        assert_eq!(results[2].election_title, "Local Elections 2024");
        assert_eq!(results[2].party, "");
    }

    #[test]
    fn test_flat_results() {
        let results = parse_election_results(
            r#"<electionresults>
                <electionid>4</electionid>
                <results>
                  <result><candidatename>X</candidatename><wardtitle>Hyde Park</wardtitle><votes>10</votes></result>
                </results>
              </electionresults>"#,
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].election_id, 4);
        assert_eq!(results[0].ward_title, "Hyde Park");
    }

    #[test]
    fn test_no_results() {
        assert!(parse_election_results("<electionresults/>").unwrap().is_empty());
    }
}
