//! Role discovery and attendance against a mock zonai service.

mod support;

use std::time::Duration;

use endfield_domain::constants::{ATTENDANCE_PATH, BINDING_PATH};
use endfield_domain::{AttendanceOutcome, DailyError, Reward};
use endfield_infra::skport::compute_signature;
use serde_json::json;
use support::{binding_with_roles, credential, header, role, role_json, Harness, START_SECS};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn discovery_flattens_endfield_roles_only() {
    let h = Harness::start().await;
    h.mount_json(
        "GET",
        BINDING_PATH,
        json!({"code": 0, "data": {"list": [
            {"appCode": "arknights", "bindingList": [{"roles": [role_json("Amiya", 90)]}]},
            {"appCode": "endfield", "bindingList": [
                {"roles": [role_json("Perlica", 42)]},
                {"roles": [role_json("Chen", 7), role_json("Ember", 12)]}
            ]}
        ]}}),
    )
    .await;

    let roles = h.client().discover_roles(&credential()).await.unwrap();

    let labels: Vec<String> = roles.iter().map(|r| r.label()).collect();
    assert_eq!(
        labels,
        vec!["Perlica (Lv.42) [Asia]", "Chen (Lv.7) [Asia]", "Ember (Lv.12) [Asia]"]
    );
    assert_eq!(roles[0].game_role, "3_1234567_2");

    let requests = h.requests_to("GET", BINDING_PATH).await;
    assert_eq!(requests.len(), 1);
    assert!(header(&requests[0], "sk-game-role").is_none());
    assert_eq!(header(&requests[0], "cred"), Some("X"));
    assert_eq!(
        header(&requests[0], "sign"),
        Some(compute_signature(BINDING_PATH, &START_SECS.to_string(), "S").as_str())
    );
}

#[tokio::test]
async fn no_endfield_app_is_no_binding() {
    let h = Harness::start().await;
    h.mount_json(
        "GET",
        BINDING_PATH,
        json!({"code": 0, "data": {"list": [
            {"appCode": "arknights", "bindingList": [{"roles": [role_json("Amiya", 90)]}]}
        ]}}),
    )
    .await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err, DailyError::NoBinding);
}

#[tokio::test]
async fn empty_binding_list_is_no_binding() {
    let h = Harness::start().await;
    h.mount_json(
        "GET",
        BINDING_PATH,
        json!({"code": 0, "data": {"list": [{"appCode": "endfield", "bindingList": []}]}}),
    )
    .await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err, DailyError::NoBinding);
}

#[tokio::test]
async fn missing_data_is_no_binding() {
    let h = Harness::start().await;
    h.mount_json("GET", BINDING_PATH, json!({"code": 0, "message": "OK"})).await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err, DailyError::NoBinding);
}

#[tokio::test]
async fn binding_without_roles_is_no_roles() {
    let h = Harness::start().await;
    h.mount_json("GET", BINDING_PATH, binding_with_roles(vec![])).await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err, DailyError::NoRoles);
    assert_eq!(err.to_string(), "no roles found in binding");
}

#[tokio::test]
async fn binding_api_error_uses_server_message() {
    let h = Harness::start().await;
    h.mount_json("GET", BINDING_PATH, json!({"code": 10002, "message": "cred expired"})).await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err.to_string(), "binding API error: cred expired");
}

#[tokio::test]
async fn null_binding_message_falls_back_to_body() {
    let h = Harness::start().await;
    h.mount_json("GET", BINDING_PATH, json!({"code": 10002, "message": null})).await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(err.to_string(), r#"binding API error: {"code":10002,"message":null}"#);
}

#[tokio::test]
async fn already_claimed_skips_the_claim() {
    let h = Harness::start().await;
    h.mount_json(
        "GET",
        ATTENDANCE_PATH,
        json!({"code": 0, "data": {"hasToday": true, "records": []}}),
    )
    .await;
    h.mount_json("POST", ATTENDANCE_PATH, json!({"code": 0, "data": {}})).await;

    let outcome = h.client().check_and_claim(&credential(), &role()).await.unwrap();

    assert_eq!(outcome, AttendanceOutcome::AlreadyClaimed);
    assert_eq!(h.attendance_posts().await, 0);

    let status = h.requests_to("GET", ATTENDANCE_PATH).await;
    assert_eq!(header(&status[0], "sk-game-role"), Some("3_1234567_2"));
}

#[tokio::test]
async fn unresolvable_award_ids_are_skipped() {
    let h = Harness::start().await;
    h.mount_json("GET", ATTENDANCE_PATH, json!({"code": 0, "data": {"hasToday": false}})).await;
    h.mount_json(
        "POST",
        ATTENDANCE_PATH,
        json!({"code": 0, "data": {
            "awardIds": [{"id": "a1"}, {"id": "a2"}],
            "resourceInfoMap": {"a1": {"name": "Gold", "count": 100}}
        }}),
    )
    .await;

    let outcome = h.client().check_and_claim(&credential(), &role()).await.unwrap();

    assert_eq!(outcome, AttendanceOutcome::Claimed { rewards: vec![Reward::new("Gold", 100)] });
    assert_eq!(outcome.summary(), "Checked in! Rewards: Gold x100");
    assert_eq!(h.attendance_posts().await, 1);
}

#[tokio::test]
async fn claim_without_rewards_still_succeeds() {
    let h = Harness::start().await;
    h.mount_json("GET", ATTENDANCE_PATH, json!({"code": 0})).await;
    h.mount_json("POST", ATTENDANCE_PATH, json!({"code": 0})).await;

    let outcome = h.client().check_and_claim(&credential(), &role()).await.unwrap();

    assert_eq!(outcome.summary(), "Successfully checked in!");
}

#[tokio::test]
async fn status_and_claim_failures_carry_context() {
    let h = Harness::start().await;
    h.mount_json("GET", ATTENDANCE_PATH, json!({"code": 1, "message": "role not found"})).await;

    let err = h.client().check_and_claim(&credential(), &role()).await.unwrap_err();
    assert_eq!(err.to_string(), "Attendance status check failed: role not found");

    let h = Harness::start().await;
    h.mount_json("GET", ATTENDANCE_PATH, json!({"code": 0, "data": {"hasToday": false}})).await;
    Mock::given(method("POST"))
        .and(path(ATTENDANCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10001}"#))
        .mount(&h.server)
        .await;

    let err = h.client().check_and_claim(&credential(), &role()).await.unwrap_err();
    assert_eq!(err.to_string(), r#"Claim failed: {"code":10001}"#);
}

#[tokio::test]
async fn malformed_status_body_is_a_parse_error() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(ATTENDANCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&h.server)
        .await;

    let err = h.client().check_and_claim(&credential(), &role()).await.unwrap_err();

    assert!(err.to_string().starts_with("Attendance check parse failed: "));
}

#[tokio::test]
async fn every_retry_is_freshly_stamped_and_signed() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(ATTENDANCE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&h.server)
        .await;
    h.mount_json("GET", ATTENDANCE_PATH, json!({"code": 0, "data": {"hasToday": true}})).await;

    let outcome = h.client().check_and_claim(&credential(), &role()).await.unwrap();

    assert_eq!(outcome, AttendanceOutcome::AlreadyClaimed);
    assert_eq!(h.sleeper.delays(), vec![Duration::from_secs(1), Duration::from_secs(2)]);

    let attempts = h.requests_to("GET", ATTENDANCE_PATH).await;
    let timestamps: Vec<&str> = attempts.iter().filter_map(|r| header(r, "timestamp")).collect();
    assert_eq!(timestamps, vec!["1700000000", "1700000001", "1700000003"]);

    let signs: Vec<&str> = attempts.iter().filter_map(|r| header(r, "sign")).collect();
    for (ts, sign) in timestamps.iter().zip(&signs) {
        assert_eq!(*sign, compute_signature(ATTENDANCE_PATH, ts, "S"));
    }
    assert_ne!(signs[0], signs[1]);
    assert_ne!(signs[1], signs[2]);
}

#[tokio::test]
async fn persistent_server_errors_exhaust_the_budget() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(BINDING_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(4)
        .mount(&h.server)
        .await;

    let err = h.client().discover_roles(&credential()).await.unwrap_err();

    assert_eq!(
        err,
        DailyError::Transport {
            attempts: 4,
            message: "binding request failed: server error HTTP 503: maintenance".to_string(),
        }
    );
    assert_eq!(h.sleeper.total(), Duration::from_secs(7));
}
