//! Facilities for parsing responses.
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{value::RawValue, Map, Value};

use crate::error::Error;

const RC_OK: &str = "ok";
const RC_ERROR: &str = "error";
const MSG_LOGIN_REQUIRED: &str = "api.err.LoginRequired";

#[derive(Debug, Deserialize)]
struct Envelope<'a> {
    #[serde(borrow)]
    data: Option<&'a RawValue>,
    meta: Meta,
}

/// The status part of every response envelope.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: String,
}

impl Meta {
    fn is_login_required(&self) -> bool {
        self.rc == RC_ERROR && self.msg == MSG_LOGIN_REQUIRED
    }
}

/// What a single exchange with the controller amounted to.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Data(T),
    LoginRequired,
}

/// Parse the body of a 200 response, returning the `data` part on success.
///
/// A missing or `null` `data` yields the empty value of `T`.
pub fn parse_data<T>(text: &str) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    let status = StatusCode::OK;
    let Envelope { data, meta } =
        serde_json::from_str(text).map_err(|source| Error::Decode { status, source })?;
    if meta.rc != RC_OK {
        return Err(Error::Application {
            code: meta.rc,
            message: meta.msg,
        });
    }
    match data {
        None => Ok(T::default()),
        Some(data) => {
            serde_json::from_str(data.get()).map_err(|source| Error::Decode { status, source })
        }
    }
}

pub(crate) fn classify<T>(status: StatusCode, text: &str) -> Result<Outcome<T>, Error>
where
    T: DeserializeOwned + Default,
{
    match status {
        StatusCode::OK => parse_data(text).map(Outcome::Data),
        StatusCode::UNAUTHORIZED => match serde_json::from_str::<Envelope>(text) {
            Ok(Envelope { meta, .. }) if meta.is_login_required() => Ok(Outcome::LoginRequired),
            _ => Err(Error::Status { status }),
        },
        _ => Err(Error::Status { status }),
    }
}

/// A device connected to a site, as listed by `stat/sta`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Station {
    pub mac: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Alias given to the device in the controller UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_wired: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    /// Seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Station {
    /// The most human friendly name available.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.hostname.as_deref())
            .unwrap_or(&self.mac)
    }
}

/// A wireless network configuration, as listed by `list/wlanconf`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WirelessNetwork {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpa_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest: Option<bool>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde::de::IgnoredAny;

    use super::*;

    #[test]
    fn ok_at_200_yields_data() {
        let outcome =
            classify::<Vec<u8>>(StatusCode::OK, r#"{"data":[1,2],"meta":{"rc":"ok"}}"#).unwrap();
        assert!(matches!(outcome, Outcome::Data(v) if v == vec![1, 2]));
    }

    #[test]
    fn missing_or_null_data_is_empty() {
        classify::<IgnoredAny>(StatusCode::OK, r#"{"meta":{"rc":"ok"}}"#).unwrap();
        for text in [
            r#"{"meta":{"rc":"ok"}}"#,
            r#"{"data":null,"meta":{"rc":"ok"}}"#,
        ] {
            let outcome = classify::<Vec<u8>>(StatusCode::OK, text).unwrap();
            assert!(matches!(outcome, Outcome::Data(v) if v.is_empty()));
        }
    }

    #[test]
    fn non_ok_at_200_is_an_application_error() {
        let err = classify::<IgnoredAny>(
            StatusCode::OK,
            r#"{"data":[],"meta":{"rc":"error","msg":"api.err.LoginRequired"}}"#,
        )
        .unwrap_err();
        let (code, message) = match err {
            Error::Application { code, message } => (code, message),
            other => panic!("Expected application error but got {other:?}"),
        };
        assert_eq!(code, "error");
        assert_eq!(message, "api.err.LoginRequired");
    }

    #[test]
    fn login_required_is_recognized_only_at_401() {
        let text = r#"{"data":[],"meta":{"rc":"error","msg":"api.err.LoginRequired"}}"#;
        assert!(matches!(
            classify::<IgnoredAny>(StatusCode::UNAUTHORIZED, text),
            Ok(Outcome::LoginRequired)
        ));
        assert!(matches!(
            classify::<IgnoredAny>(StatusCode::FORBIDDEN, text),
            Err(Error::Status { status }) if status == StatusCode::FORBIDDEN
        ));
    }

    #[test]
    fn other_401_bodies_are_status_errors() {
        for text in [
            r#"{"data":[],"meta":{"rc":"error","msg":"api.err.Invalid"}}"#,
            r#"{"data":[],"meta":{"rc":"ok","msg":"api.err.LoginRequired"}}"#,
            "Unauthorized",
        ] {
            assert!(matches!(
                classify::<IgnoredAny>(StatusCode::UNAUTHORIZED, text),
                Err(Error::Status { status }) if status == StatusCode::UNAUTHORIZED
            ));
        }
    }

    #[test]
    fn malformed_body_at_200_is_a_decode_error() {
        assert!(matches!(
            classify::<IgnoredAny>(StatusCode::OK, "<html></html>"),
            Err(Error::Decode { .. })
        ));
        assert!(matches!(
            classify::<IgnoredAny>(StatusCode::OK, r#"{"data":[]}"#),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn other_statuses_are_not_interpreted() {
        assert!(matches!(
            classify::<IgnoredAny>(StatusCode::BAD_GATEWAY, "<html></html>"),
            Err(Error::Status { status }) if status == StatusCode::BAD_GATEWAY
        ));
    }
}
