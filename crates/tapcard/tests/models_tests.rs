use chrono::Utc;
use tapcard::models::link::{self, Icon, LinkResponse};
use tapcard::models::nfc_tag::{self, TagState};
use tapcard::models::profile::{self, ProfileWithLinks};

fn sample_link(icon: &str) -> link::Model {
    let now = Utc::now().naive_utc();
    link::Model {
        id: 1,
        profile_id: 2,
        title: "GitHub".into(),
        url: "https://github.com/alice".into(),
        icon: icon.into(),
        sort_order: 3,
        created_at: now,
        updated_at: now,
    }
}

fn sample_tag(is_verified: bool, claimed_by: Option<i32>) -> nfc_tag::Model {
    let now = Utc::now().naive_utc();
    nfc_tag::Model {
        id: 1,
        tag_id: "04:A2".into(),
        is_verified,
        verified_by: None,
        verified_at: None,
        claimed_by,
        claimed_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_icon_resolution() {
    assert_eq!(Icon::from_tag("instagram"), Icon::Instagram);
    assert_eq!(Icon::from_tag(" GitHub "), Icon::Github);
    assert_eq!(Icon::from_tag("myspace"), Icon::Default);
    assert_eq!(Icon::from_tag(""), Icon::Default);
    assert_eq!(Icon::Twitch.as_str(), "twitch");
}

#[test]
fn test_link_response_uses_order_on_the_wire() {
    let json = serde_json::to_value(LinkResponse::from(sample_link("LinkedIn"))).expect("json");
    assert_eq!(json["order"], 3);
    assert_eq!(json["profileId"], 2);
    assert_eq!(json["icon"], "LinkedIn");
    assert_eq!(json["iconKey"], "linkedin");
    assert!(json.get("sortOrder").is_none());
}

#[test]
fn test_tag_state() {
    assert_eq!(sample_tag(false, None).state(), TagState::Unverified);
    assert_eq!(sample_tag(true, None).state(), TagState::Verified);
    assert_eq!(sample_tag(true, Some(9)).state(), TagState::Claimed);
}

#[test]
fn test_profile_with_links_is_flat_camel_case() {
    let now = Utc::now().naive_utc();
    let model = profile::Model {
        id: 5,
        user_id: 6,
        display_name: "Alice".into(),
        bio: None,
        phone: None,
        slug: "alice".into(),
        avatar_url: None,
        theme_color: profile::DEFAULT_THEME_COLOR.into(),
        background_color: profile::DEFAULT_BACKGROUND_COLOR.into(),
        created_at: now,
        updated_at: now,
    };
    let body = ProfileWithLinks {
        profile: model.into(),
        links: vec![LinkResponse::from(sample_link("github"))],
    };
    let json = serde_json::to_value(body).expect("json");
    assert_eq!(json["displayName"], "Alice");
    assert_eq!(json["themeColor"], "#000000");
    assert_eq!(json["backgroundColor"], "#ffffff");
    assert_eq!(json["links"][0]["title"], "GitHub");
}
