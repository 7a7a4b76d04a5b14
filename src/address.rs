//! Address records and the shapes they take on the wire.
//!
//! Three types, three stages:
//!
//! ```text
//! NewAddress     ← untrusted request body, every field optional
//!     ↓ validate()
//! Address        ← all required fields present and well-formed
//!     ↓ AddressStore::insert()
//! AddressRecord  ← Address + store-assigned AddressId
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identifier ────────────────────────────────────────────────────────────────

/// Store-assigned record identifier. Serialised as a hyphenated UUID string.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(Uuid);

impl AddressId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for AddressId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// A create request body before validation.
///
/// Nothing here is trusted: fields may be missing, empty, or the wrong shape.
/// Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<ZipInput>,
}

/// The zip code exactly as the client sent it.
///
/// Both shapes are accepted at parse time so the validator can report a
/// length or type error instead of a generic malformed-body error.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ZipInput {
    Number(serde_json::Number),
    Text(String),
}

impl ZipInput {
    /// `0` and `""` count as "not provided".
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => n.as_f64() == Some(0.0),
            Self::Text(s)   => s.is_empty(),
        }
    }
}

/// Whole floats below this magnitude print without an exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// Numbers render by value, not by spelling: `62704`, `62704.0` and
/// `6.2704e4` all display as `62704`.
impl fmt::Display for ZipInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < PLAIN_INTEGER_LIMIT => {
                    write!(f, "{v:.0}")
                }
                _ => fmt::Display::fmt(n, f),
            },
            Self::Text(s)   => f.write_str(s),
        }
    }
}

// ── Validated ─────────────────────────────────────────────────────────────────

/// A five-digit zip code. Serialised as a bare JSON number.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zip(u32);

impl Zip {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Zip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An address that has passed [`validate`](crate::validate).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Zip,
}

/// An address as held by the store and returned to clients.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AddressRecord {
    pub id: AddressId,
    #[serde(flatten)]
    pub address: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_address_reads_camel_case_keys_and_ignores_extras() {
        let body = r#"{
            "firstName": "Jane", "lastName": "Doe", "address1": "1 Main St",
            "city": "Springfield", "state": "IL", "zip": 62704, "nickname": "jd"
        }"#;
        let parsed: NewAddress = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.first_name.as_deref(), Some("Jane"));
        assert_eq!(parsed.address2, None);
        assert_eq!(parsed.zip.map(|z| z.to_string()).as_deref(), Some("62704"));
    }

    #[test]
    fn zip_input_keeps_strings_as_text() {
        let parsed: NewAddress = serde_json::from_str(r#"{"zip":"abcde"}"#).unwrap();
        assert_eq!(parsed.zip, Some(ZipInput::Text("abcde".into())));
    }

    #[test]
    fn whole_float_zips_render_as_integers() {
        for raw in ["62704.0", "6.2704e4", "62704"] {
            let zip: ZipInput = serde_json::from_str(raw).unwrap();
            assert_eq!(zip.to_string(), "62704", "{raw}");
        }
        let zip: ZipInput = serde_json::from_str("1234.5").unwrap();
        assert_eq!(zip.to_string(), "1234.5");
    }

    #[test]
    fn zero_and_empty_zips_are_blank() {
        assert!(ZipInput::Number(0.into()).is_blank());
        assert!(ZipInput::Text(String::new()).is_blank());
        assert!(!ZipInput::Number(62704.into()).is_blank());
    }

    #[test]
    fn record_serialises_flat_with_numeric_zip() {
        let record = AddressRecord {
            id: "5f0c8a4e-2b59-4b7b-9a57-8d1f0c6a1e22".parse().unwrap(),
            address: Address {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                address1: "1 Main St".into(),
                address2: None,
                city: "Springfield".into(),
                state: "IL".into(),
                zip: Zip::new(62704),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "5f0c8a4e-2b59-4b7b-9a57-8d1f0c6a1e22");
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["zip"], 62704);
        assert!(value.get("address2").is_none());
    }

    #[test]
    fn address_id_rejects_non_uuid_text() {
        assert!("not-an-id".parse::<AddressId>().is_err());
    }
}
