use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ups::model::Candidate;

/// Request envelope for the XAV endpoint.
#[derive(Debug, Serialize)]
pub struct XavRequest {
    #[serde(rename = "XAVRequest")]
    xav_request: XavRequestBody,
}

#[derive(Debug, Serialize)]
struct XavRequestBody {
    #[serde(rename = "AddressKeyFormat")]
    address_key_format: RequestAddress,
}

#[derive(Debug, Serialize)]
struct RequestAddress {
    #[serde(rename = "AddressLine")]
    address_line: Vec<String>,
    #[serde(rename = "PoliticalDivision2")]
    political_division2: String,
    #[serde(rename = "PoliticalDivision1")]
    political_division1: String,
    #[serde(rename = "PostcodePrimaryLow")]
    postcode_primary_low: String,
    #[serde(rename = "CountryCode")]
    country_code: String,
}

impl XavRequest {
    pub fn new(city: &str, state: &str, zip_code: &str, address1: &str) -> Self {
        XavRequest {
            xav_request: XavRequestBody {
                address_key_format: RequestAddress {
                    address_line: vec![address1.to_string()],
                    political_division2: city.to_string(),
                    political_division1: state.to_string(),
                    postcode_primary_low: zip_code.to_string(),
                    // only US addresses can be validated through this endpoint
                    country_code: "US".to_string(),
                },
            },
        }
    }
}

/// Response envelope for the XAV endpoint.
#[derive(Debug, Deserialize)]
pub struct XavEnvelope {
    #[serde(rename = "XAVResponse")]
    pub xav_response: XavResponse,
}

/// The three indicators are mutually exclusive markers whose values carry no
/// information; only their presence matters.
#[derive(Debug, Deserialize)]
pub struct XavResponse {
    #[serde(rename = "ValidAddressIndicator")]
    pub valid_address_indicator: Option<Value>,
    #[serde(rename = "AmbiguousAddressIndicator")]
    pub ambiguous_address_indicator: Option<Value>,
    #[serde(rename = "NoCandidatesIndicator")]
    pub no_candidates_indicator: Option<Value>,
    #[serde(rename = "Candidate", default)]
    pub candidate: CandidateField,
}

/// The endpoint returns `Candidate` as a single object for one match and as a
/// list for several, so the shape has to be checked before iterating.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CandidateField {
    One(CandidateEntry),
    Many(Vec<CandidateEntry>),
}

impl Default for CandidateField {
    fn default() -> Self {
        CandidateField::Many(Vec::new())
    }
}

impl CandidateField {
    /// flatten to candidates, preserving the order the service returned
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            CandidateField::One(entry) => vec![entry.into_candidate()],
            CandidateField::Many(entries) => entries
                .into_iter()
                .map(CandidateEntry::into_candidate)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CandidateEntry {
    #[serde(rename = "AddressKeyFormat")]
    address_key_format: ResponseAddress,
}

#[derive(Debug, Deserialize)]
struct ResponseAddress {
    #[serde(rename = "AddressLine", default)]
    address_line: AddressLines,
    #[serde(rename = "PoliticalDivision2", default)]
    political_division2: String,
    #[serde(rename = "PoliticalDivision1", default)]
    political_division1: String,
    #[serde(rename = "PostcodePrimaryLow", default)]
    postcode_primary_low: String,
}

/// `AddressLine` has the same object-or-list inconsistency as `Candidate`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AddressLines {
    One(String),
    Many(Vec<String>),
}

impl Default for AddressLines {
    fn default() -> Self {
        AddressLines::Many(Vec::new())
    }
}

impl AddressLines {
    fn join(self) -> String {
        match self {
            AddressLines::One(line) => line,
            AddressLines::Many(lines) => lines.join(", "),
        }
    }
}

impl CandidateEntry {
    fn into_candidate(self) -> Candidate {
        let address = self.address_key_format;
        Candidate {
            city: address.political_division2,
            state: address.political_division1,
            zip_code: address.postcode_primary_low,
            address1: address.address_line.join(),
        }
    }
}

/// Body of a 400 response. The service nests its messages under
/// `response.errors`; anything else is reported as unknown by the caller.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub response: Option<ErrorResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_the_xav_envelope() {
        let request = XavRequest::new("Salt Lake City", "UT", "84108", "2600 Sunnyside Ave S");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "XAVRequest": {
                    "AddressKeyFormat": {
                        "AddressLine": ["2600 Sunnyside Ave S"],
                        "PoliticalDivision2": "Salt Lake City",
                        "PoliticalDivision1": "UT",
                        "PostcodePrimaryLow": "84108",
                        "CountryCode": "US",
                    }
                }
            })
        );
    }

    #[test]
    fn candidate_accepts_a_single_object() {
        let envelope: XavEnvelope = serde_json::from_value(json!({
            "XAVResponse": {
                "AmbiguousAddressIndicator": "",
                "Candidate": {
                    "AddressKeyFormat": {
                        "AddressLine": "2600 Sunnyside Ave S",
                        "PoliticalDivision2": "Salt Lake City",
                        "PoliticalDivision1": "UT",
                        "PostcodePrimaryLow": "84108",
                    }
                }
            }
        }))
        .unwrap();

        let candidates = envelope.xav_response.candidate.into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].city, "Salt Lake City");
    }

    #[test]
    fn candidate_accepts_a_list_and_preserves_order() {
        let envelope: XavEnvelope = serde_json::from_value(json!({
            "XAVResponse": {
                "AmbiguousAddressIndicator": "",
                "Candidate": [
                    {"AddressKeyFormat": {"AddressLine": "100 Main St", "PoliticalDivision2": "A", "PoliticalDivision1": "UT", "PostcodePrimaryLow": "84101"}},
                    {"AddressKeyFormat": {"AddressLine": "200 Main St", "PoliticalDivision2": "B", "PoliticalDivision1": "UT", "PostcodePrimaryLow": "84102"}},
                ]
            }
        }))
        .unwrap();

        let candidates = envelope.xav_response.candidate.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].address1, "100 Main St");
        assert_eq!(candidates[1].address1, "200 Main St");
    }

    #[test]
    fn multi_line_addresses_are_joined() {
        let envelope: XavEnvelope = serde_json::from_value(json!({
            "XAVResponse": {
                "ValidAddressIndicator": "",
                "Candidate": {
                    "AddressKeyFormat": {
                        "AddressLine": ["2600 Sunnyside Ave S", "Suite 12"],
                        "PoliticalDivision2": "Salt Lake City",
                        "PoliticalDivision1": "UT",
                        "PostcodePrimaryLow": "84108",
                    }
                }
            }
        }))
        .unwrap();

        let candidates = envelope.xav_response.candidate.into_candidates();
        assert_eq!(candidates[0].address1, "2600 Sunnyside Ave S, Suite 12");
    }

    #[test]
    fn missing_candidate_defaults_to_empty() {
        let envelope: XavEnvelope = serde_json::from_value(json!({
            "XAVResponse": {"NoCandidatesIndicator": ""}
        }))
        .unwrap();

        assert!(envelope.xav_response.no_candidates_indicator.is_some());
        assert!(envelope.xav_response.candidate.into_candidates().is_empty());
    }
}
