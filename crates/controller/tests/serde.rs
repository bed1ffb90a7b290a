use serde::de::IgnoredAny;
use unictl_controller::{
    responses::{parse_data, Station, WirelessNetwork},
    Error,
};

#[test]
fn invalid_json_returns_decode_error() {
    assert!(matches!(
        parse_data::<Vec<Station>>(""),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn wrong_data_returns_decode_error() {
    assert!(matches!(
        parse_data::<Vec<Station>>(r#"{"meta":{"rc":"ok"},"data":{}}"#),
        Err(Error::Decode { .. })
    ));
    assert!(matches!(
        parse_data::<Vec<Station>>(r#"{"meta":{"rc":"ok"},"data":[{"hostname":"no-mac"}]}"#),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn error_code_returns_application_error() {
    let err = parse_data::<IgnoredAny>(include_str!("responses/invalid_object.json")).unwrap_err();
    assert!(matches!(
        err,
        Error::Application { code, message } if code == "error" && message == "api.err.InvalidObject"
    ));
}

#[test]
fn can_deserialize_stat_sta_responses() {
    let stations = parse_data::<Vec<Station>>(include_str!("responses/stat_sta.json")).unwrap();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].mac, "aa:bb:cc:dd:ee:ff");
    assert_eq!(stations[0].display_name(), "kids-ipad");
    assert_eq!(stations[0].other["signal"], -61);
    assert_eq!(stations[1].display_name(), "NAS");
    assert_eq!(stations[1].is_wired, Some(true));
}

#[test]
fn minimal_station_only_needs_mac() {
    let stations =
        parse_data::<Vec<Station>>(r#"{"data":[{"mac":"aa:bb"}],"meta":{"rc":"ok"}}"#).unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].display_name(), "aa:bb");
}

#[test]
fn can_deserialize_list_wlanconf_responses() {
    let networks =
        parse_data::<Vec<WirelessNetwork>>(include_str!("responses/list_wlanconf.json")).unwrap();
    assert_eq!(networks.len(), 2);
    assert_eq!(networks[0].id, "5e2f7c9ae4b0c6a1f8a3bf20");
    assert!(networks[0].enabled);
    assert_eq!(networks[1].name, "Guests");
    assert!(!networks[1].enabled);
    assert_eq!(networks[1].is_guest, Some(true));
}

#[test]
fn can_deserialize_post_stamgr_responses() {
    parse_data::<IgnoredAny>(include_str!("responses/post_stamgr.json")).unwrap();
    parse_data::<IgnoredAny>(r#"{"meta":{"rc":"ok"}}"#).unwrap();
}
