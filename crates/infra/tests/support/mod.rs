//! Shared fixtures for the SKPort integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use endfield_common::testing::{MockClock, RecordingSleeper};
use endfield_domain::constants::{
    ATTENDANCE_PATH, BASIC_INFO_PATH, BINDING_PATH, GENERATE_CRED_PATH, OAUTH_GRANT_PATH,
};
use endfield_domain::{EndpointsConfig, Role, SessionCredential};
use endfield_infra::http::HttpClient;
use endfield_infra::skport::{SkportAuthenticator, SkportClient};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const START_SECS: u64 = 1_700_000_000;

/// Client wiring against a mock server with a recorded, clock-advancing
/// sleeper.
pub struct Harness {
    pub server: MockServer,
    pub clock: MockClock,
    pub sleeper: Arc<RecordingSleeper>,
}

impl Harness {
    pub async fn start() -> Self {
        let clock = MockClock::at_unix_seconds(START_SECS);
        let sleeper = Arc::new(RecordingSleeper::advancing(clock.clone()));
        Self { server: MockServer::start().await, clock, sleeper }
    }

    pub fn endpoints(&self) -> EndpointsConfig {
        EndpointsConfig::single(self.server.uri())
    }

    pub fn http(&self, retries: u32) -> HttpClient {
        HttpClient::builder()
            .max_retries(retries)
            .sleeper(self.sleeper.clone())
            .build()
            .expect("http client")
    }

    pub fn client(&self) -> SkportClient {
        SkportClient::new(self.http(3), self.endpoints()).with_clock(Arc::new(self.clock.clone()))
    }

    pub fn authenticator(&self) -> SkportAuthenticator {
        SkportAuthenticator::new(self.http(0), self.endpoints())
    }

    pub async fn mount_json(&self, verb: &str, route: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Accept T1 and hand out credential X / salt S / user U.
    pub async fn mount_negotiation(&self) {
        self.mount_json("GET", BASIC_INFO_PATH, json!({"status": 0, "msg": "OK"})).await;
        self.mount_json("POST", OAUTH_GRANT_PATH, json!({"status": 0, "data": {"code": "C1"}}))
            .await;
        self.mount_json(
            "POST",
            GENERATE_CRED_PATH,
            json!({"code": 0, "message": "OK", "data": {"cred": "X", "token": "S", "userId": "U"}}),
        )
        .await;
    }

    pub async fn mount_single_role(&self) {
        self.mount_json("GET", BINDING_PATH, binding_with_roles(vec![role_json("Perlica", 42)]))
            .await;
    }

    pub async fn requests_to(&self, verb: &str, route: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .collect()
    }

    pub async fn attendance_posts(&self) -> usize {
        self.requests_to("POST", ATTENDANCE_PATH).await.len()
    }
}

pub fn credential() -> SessionCredential {
    SessionCredential::new("X", "S", "U")
}

pub fn role() -> Role {
    Role::new("Perlica", 42, "Asia", "2", "1234567")
}

pub fn role_json(nickname: &str, level: i64) -> Value {
    json!({
        "nickname": nickname,
        "level": level,
        "serverName": "Asia",
        "serverId": "2",
        "roleId": "1234567"
    })
}

pub fn binding_with_roles(roles: Vec<Value>) -> Value {
    json!({
        "code": 0,
        "message": "OK",
        "data": {"list": [
            {"appCode": "arknights", "bindingList": [{"roles": [role_json("Amiya", 90)]}]},
            {"appCode": "endfield", "bindingList": [{"roles": roles}]}
        ]}
    })
}

pub fn header<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}
