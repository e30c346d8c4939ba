//! Share token encoding.
//!
//! A token is the UTF-8 bytes of a compact JSON document, base64 encoded:
//!
//! ```json
//! {"v":1,"t":30,"m":"walking","p":["coffee"],"l":[{"c":[14.43,50.07],"a":"Home St 1","n":"Home","col":"#ff0000"}]}
//! ```
//!
//! New tokens use the URL-safe alphabet without padding. Older tokens used
//! the standard alphabet with padding and carried no `m`; both still decode,
//! with a missing mode read as driving.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Position, TransportMode};

use super::SHARE_VERSION;
use super::error::ShareError;
use super::snapshot::{ShareSnapshot, SharedTraveler};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Only the version field, read before committing to a schema.
#[derive(Deserialize)]
struct Envelope {
    v: u32,
}

#[derive(Serialize, Deserialize)]
struct WireSnapshot {
    v: u32,
    t: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    m: Option<TransportMode>,
    p: Vec<String>,
    l: Vec<WireTraveler>,
}

#[derive(Serialize, Deserialize)]
struct WireTraveler {
    c: Position,
    a: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    col: String,
}

/// Encode a snapshot as a URL-safe token.
///
/// Fails only for snapshots that no token can represent: another version,
/// or a non-finite coordinate.
pub fn encode(snapshot: &ShareSnapshot) -> Result<String, ShareError> {
    if snapshot.version != SHARE_VERSION {
        return Err(ShareError::UnsupportedVersion(snapshot.version));
    }
    if let Some(index) = snapshot.travelers.iter().position(|t| !t.position.is_finite()) {
        return Err(ShareError::NonFinitePosition(index));
    }

    let wire = WireSnapshot {
        v: SHARE_VERSION,
        t: snapshot.budget_minutes,
        m: Some(snapshot.transport_mode),
        p: snapshot.poi_categories.iter().cloned().collect(),
        l: snapshot
            .travelers
            .iter()
            .map(|t| WireTraveler {
                c: t.position,
                a: t.address.clone(),
                n: t.display_name.clone(),
                col: t.color_tag.clone(),
            })
            .collect(),
    };

    let json = serde_json::to_vec(&wire).map_err(|e| ShareError::Json(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token, or `None` if it is malformed or of an unknown version.
pub fn decode(token: &str) -> Option<ShareSnapshot> {
    match try_decode(token) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            debug!(error = %e, "Rejected share token");
            None
        }
    }
}

/// Decode a token, saying why it was rejected.
pub fn try_decode(token: &str) -> Result<ShareSnapshot, ShareError> {
    // A '+' that went through a query string unescaped arrives as a space.
    let token = token.trim().replace(' ', "+");

    let engine = if token.contains(['-', '_']) {
        &URL_SAFE_LENIENT
    } else {
        &STANDARD_LENIENT
    };
    let bytes = engine
        .decode(token.as_bytes())
        .map_err(|e| ShareError::Base64(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|_| ShareError::Utf8)?;

    let envelope: Envelope =
        serde_json::from_str(&json).map_err(|e| ShareError::Json(e.to_string()))?;
    if envelope.v != SHARE_VERSION {
        return Err(ShareError::UnsupportedVersion(envelope.v));
    }

    let wire: WireSnapshot =
        serde_json::from_str(&json).map_err(|e| ShareError::Json(e.to_string()))?;

    Ok(ShareSnapshot {
        version: wire.v,
        budget_minutes: wire.t,
        transport_mode: wire.m.unwrap_or_default(),
        poi_categories: wire.p.into_iter().collect(),
        travelers: wire
            .l
            .into_iter()
            .map(|t| SharedTraveler {
                position: t.c,
                address: t.a,
                display_name: t.n,
                color_tag: t.col,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::collections::BTreeSet;

    fn shared(lng: f64, lat: f64, address: &str, name: Option<&str>) -> SharedTraveler {
        SharedTraveler {
            position: Position::new(lng, lat),
            address: address.to_string(),
            display_name: name.map(str::to_string),
            color_tag: "#ff0000".to_string(),
        }
    }

    fn snapshot(travelers: Vec<SharedTraveler>) -> ShareSnapshot {
        ShareSnapshot {
            version: SHARE_VERSION,
            budget_minutes: 30,
            transport_mode: TransportMode::Walking,
            poi_categories: ["coffee", "meal", "beer"].map(String::from).into(),
            travelers,
        }
    }

    #[test]
    fn roundtrip_unicode() {
        let original = snapshot(vec![shared(
            14.4378,
            50.0755,
            "Náměstí Republiky 1, 110 00 Praha",
            Some("Café Praha"),
        )]);

        let token = encode(&original).unwrap();
        let decoded = decode(&token).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(decoded.travelers[0].address, "Náměstí Republiky 1, 110 00 Praha");
        assert_eq!(decoded.travelers[0].display_name.as_deref(), Some("Café Praha"));
    }

    #[test]
    fn roundtrip_empty_and_extremes() {
        let empty = snapshot(vec![]);
        assert_eq!(decode(&encode(&empty).unwrap()), Some(empty));

        let extremes = snapshot(vec![
            shared(-180.0, -90.0, "South", None),
            shared(180.0, 90.0, "North", Some("")),
        ]);
        assert_eq!(decode(&encode(&extremes).unwrap()), Some(extremes));
    }

    #[test]
    fn token_is_url_safe() {
        let token = encode(&snapshot(vec![shared(
            14.4,
            50.1,
            "Karlín ??? >?>",
            Some("~~~"),
        )]))
        .unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn legacy_token_decodes() {
        // Standard alphabet, padded, no mode field.
        let token = "eyJ2IjoxLCJ0IjozMCwicCI6WyJjb2ZmZWUiLCJtZWFsIiwiYmVlciJdLCJsIjpbeyJjIjpbMTQuNDM3OCw1MC4wNzU1XSwiYSI6IjEyMyBNYWluIFN0IiwibiI6IkhvbWUiLCJjb2wiOiIjZmYwMDAwIn0seyJjIjpbMTQuNDUsNTAuMDhdLCJhIjoiTsOhbcSbc3TDrSBSZXB1Ymxpa3kgMSwgMTEwIDAwIFByYWhhIiwiY29sIjoiIzAwZmYwMCJ9XX0=";

        let decoded = decode(token).unwrap();

        assert_eq!(decoded.budget_minutes, 30);
        assert_eq!(decoded.transport_mode, TransportMode::Driving);
        assert_eq!(
            decoded.poi_categories,
            BTreeSet::from(["beer", "coffee", "meal"].map(String::from))
        );
        assert_eq!(decoded.travelers.len(), 2);
        assert_eq!(decoded.travelers[0].position, Position::new(14.4378, 50.0755));
        assert_eq!(decoded.travelers[0].display_name.as_deref(), Some("Home"));
        assert_eq!(decoded.travelers[1].address, "Náměstí Republiky 1, 110 00 Praha");
        assert_eq!(decoded.travelers[1].display_name, None);
    }

    #[test]
    fn legacy_token_with_slash() {
        let token = "eyJ2IjoxLCJ0IjoxNSwicCI6WyJiZWVyIl0sImwiOlt7ImMiOlstMTgwLDkwXSwiYSI6IkthcmzDrW4gPz8/IiwiY29sIjoiI2FiY2RlZiJ9XX0=";

        let decoded = decode(token).unwrap();

        assert_eq!(decoded.travelers[0].address, "Karlín ???");
        assert_eq!(decoded.travelers[0].position, Position::new(-180.0, 90.0));
    }

    #[test]
    fn unescaped_plus_is_recovered() {
        // "Vinohrady ~~~" encodes with a '+'.
        let token = "eyJ2IjoxLCJ0IjoxNSwicCI6WyJiZWVyIl0sImwiOlt7ImMiOlstMTgwLDkwXSwiYSI6IlZpbm9ocmFkeSB+fn4iLCJjb2wiOiIjYWJjZGVmIn1dfQ==";
        let mangled = token.replace('+', " ");

        let decoded = decode(&mangled).unwrap();

        assert_eq!(decoded.travelers[0].address, "Vinohrady ~~~");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            try_decode("not-valid-base64!!!"),
            Err(ShareError::Base64(_))
        ));
        assert_eq!(decode("not-valid-base64!!!"), None);
    }

    #[test]
    fn rejects_invalid_json() {
        let token = STANDARD.encode("not valid json");
        assert!(matches!(try_decode(&token), Err(ShareError::Json(_))));
    }

    #[test]
    fn rejects_non_utf8() {
        let token = STANDARD.encode([0xff, 0xfe, 0x7b]);
        assert_eq!(try_decode(&token), Err(ShareError::Utf8));
    }

    #[test]
    fn rejects_unknown_version() {
        let token = STANDARD.encode(r#"{"v":2,"t":30,"p":[],"l":[]}"#);
        assert_eq!(try_decode(&token), Err(ShareError::UnsupportedVersion(2)));

        // A future version may change the schema entirely.
        let token = URL_SAFE_NO_PAD.encode(r#"{"v":7,"scenario":"opaque"}"#);
        assert_eq!(decode(&token), None);
    }

    #[test]
    fn rejects_malformed_travelers() {
        let token = STANDARD.encode(r#"{"v":1,"t":30,"p":[],"l":"not-an-array"}"#);
        assert!(matches!(try_decode(&token), Err(ShareError::Json(_))));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let token = URL_SAFE_NO_PAD.encode(r#"{"v":1,"t":30,"m":"teleport","p":[],"l":[]}"#);
        assert_eq!(decode(&token), None);
    }

    #[test]
    fn encode_refuses_unrepresentable() {
        let mut s = snapshot(vec![shared(f64::NAN, 0.0, "Nowhere", None)]);
        assert_eq!(encode(&s), Err(ShareError::NonFinitePosition(0)));

        s.travelers.clear();
        s.version = 2;
        assert_eq!(encode(&s), Err(ShareError::UnsupportedVersion(2)));
    }

    #[test]
    fn categories_are_a_set() {
        let mut s = snapshot(vec![]);
        s.poi_categories = BTreeSet::from(["shop".to_string(), "dance".to_string()]);
        let decoded = decode(&encode(&s).unwrap()).unwrap();
        assert_eq!(decoded.poi_categories.len(), 2);
    }
}
