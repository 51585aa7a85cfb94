//! Testing utilities: a mock transport and sample responses.
//!
//! The fixtures reproduce the response layouts seen on live ModernGov
//! installs so tests can exercise every shape without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use moderngov_core::testing::{fixtures, MockTransport};
//!
//! let transport = Arc::new(MockTransport::new());
//! transport.push_body(fixtures::MEETINGS_BY_COMMITTEE_XML).await;
//! ```

mod mock_transport;

pub use mock_transport::{MockTransport, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::ClientConfig;
    use crate::council::CouncilRecord;

    pub const SITE_URL: &str = "https://democracy.example.gov.uk";

    /// Client settings with a short rate-limit interval.
    pub fn fast_client_config() -> ClientConfig {
        ClientConfig {
            rate_limit_ms: 5,
            ..ClientConfig::default()
        }
    }

    /// Create a council record with reasonable defaults.
    pub fn council(name: &str, region: &str, council_type: &str) -> CouncilRecord {
        let slug = name.to_lowercase().replace(' ', "");
        CouncilRecord {
            name: name.to_string(),
            url: format!("https://democracy.{}.gov.uk", slug),
            region: region.to_string(),
            council_type: council_type.to_string(),
        }
    }

    pub const COUNCILLORS_BY_WARD_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<councillorsbyward>
  <wards>
    <ward>
      <wardtitle>Adel and Wharfedale</wardtitle>
      <councillors>
        <councillor>
          <councillorid>101</councillorid>
          <fullusername>Councillor Barry Anderson</fullusername>
          <politicalpartytitle>Conservative</politicalpartytitle>
          <representing>Adel and Wharfedale</representing>
        </councillor>
        <councillor>
          <councillorid>102</councillorid>
          <fullusername>Councillor Caroline Anderson</fullusername>
        </councillor>
      </councillors>
    </ward>
    <ward>
      <wardtitle>Alwoodley</wardtitle>
      <councillors>
        <councillor>
          <councillorid>103</councillorid>
          <fullusername>Councillor Dan Cohen</fullusername>
          <politicalpartytitle>Conservative</politicalpartytitle>
        </councillor>
      </councillors>
    </ward>
  </wards>
</councillorsbyward>"#;

    /// Single councillor under a single ward: no sequence wrappers repeat.
    pub const COUNCILLORS_BY_POSTCODE_XML: &str = r#"<councillorsbypostcode>
  <wardtitle>Little London and Woodhouse</wardtitle>
  <councillors>
    <councillor>
      <councillorid>204</councillorid>
      <fullusername>Councillor Kayleigh Brooks</fullusername>
      <politicalpartytitle>Labour</politicalpartytitle>
    </councillor>
  </councillors>
</councillorsbypostcode>"#;

    pub const COMMITTEES_XML: &str = r#"<committees>
  <committee>
    <committeeid>1</committeeid>
    <committeetitle>Full Council</committeetitle>
  </committee>
  <committee>
    <committeeid>102</committeeid>
    <committeetitle>Executive Board</committeetitle>
    <committeetype>Executive</committeetype>
  </committee>
</committees>"#;

    pub const MEETINGS_BY_COMMITTEE_XML: &str = r#"<getmeetings>
  <committee>
    <committeeid>102</committeeid>
    <committeetitle>Executive Board</committeetitle>
    <meetings>
      <meeting>
        <meetingid>9001</meetingid>
        <meetingdate>15/05/2024</meetingdate>
        <meetingtime>13:00</meetingtime>
        <location>Civic Hall</location>
      </meeting>
      <meeting>
        <meetingid>9002</meetingid>
        <meetingtitle>Executive Board (Budget)</meetingtitle>
        <meetingdate>12/06/2024</meetingdate>
      </meeting>
    </meetings>
  </committee>
</getmeetings>"#;

    pub const MEETINGS_BY_DATE_XML: &str = r#"<getmeetingsbydate>
  <meeting>
    <meetingid>9100</meetingid>
    <committeeid>1</committeeid>
    <committeetitle>Full Council</committeetitle>
    <meetingdate>10/07/2024</meetingdate>
  </meeting>
</getmeetingsbydate>"#;

    pub const MEETINGS_COUNT_ONLY_XML: &str = r#"<getmeetingsbydate>
  <meetingcount>0</meetingcount>
</getmeetingsbydate>"#;

    /// Body wrapped in the .asmx `<string>` envelope.
    pub const WRAPPED_COMMITTEES_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<string xmlns="http://moderngov.co.uk/namespaces">&lt;committees&gt;&lt;committee&gt;&lt;committeeid&gt;5&lt;/committeeid&gt;&lt;committeetitle&gt;Licensing&lt;/committeetitle&gt;&lt;/committee&gt;&lt;/committees&gt;</string>"#;

    pub const HTML_ERROR_PAGE: &str = r#"<html>
<head><title>Runtime Error</title></head>
<body><h1>Server Error in '/' Application.</h1></body>
</html>"#;
}
