//! Role discovery and daily attendance against the zonai game API

use std::sync::Arc;

use async_trait::async_trait;
use endfield_common::{Clock, SystemClock};
use endfield_core::AttendanceGateway;
use endfield_domain::constants::{ATTENDANCE_PATH, BINDING_PATH, GAME_APP_CODE};
use endfield_domain::{
    AttendanceOutcome, DailyError, EndpointsConfig, Result, Reward, Role, SessionCredential,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::request::SignedRequest;
use super::wire::{
    api_message, AttendanceClaimData, AttendanceClaimResponse, AttendanceStatusResponse,
    BindingResponse,
};
use crate::errors::parse_error;
use crate::http::{HttpClient, HttpResponse};

/// Attendance state for one role before any claim is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    AlreadyClaimed,
    Unclaimed,
}

/// Signed client for the game API.
#[derive(Clone)]
pub struct SkportClient {
    http: HttpClient,
    endpoints: EndpointsConfig,
    clock: Arc<dyn Clock>,
}

impl SkportClient {
    pub fn new(http: HttpClient, endpoints: EndpointsConfig) -> Self {
        Self { http, endpoints, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock that stamps each request.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// List every Endfield role bound to the credential's account.
    #[instrument(skip_all, fields(user_id = %cred.user_id))]
    pub async fn discover_roles(&self, cred: &SessionCredential) -> Result<Vec<Role>> {
        let response = self
            .signed(Method::GET, BINDING_PATH, cred, "")
            .await
            .map_err(|err| err.in_context("binding request failed"))?;
        let body: BindingResponse = decode("binding", &response)?;

        if body.code != 0 {
            return Err(api_error("binding API error", &body.message, &response));
        }

        let app = body
            .data
            .and_then(|data| data.list.into_iter().find(|app| app.app_code == GAME_APP_CODE))
            .filter(|app| !app.binding_list.is_empty())
            .ok_or(DailyError::NoBinding)?;

        let roles: Vec<Role> = app
            .binding_list
            .into_iter()
            .flat_map(|entry| entry.roles)
            .map(|r| Role::new(r.nickname, r.level, r.server_name, r.server_id, r.role_id))
            .collect();

        if roles.is_empty() {
            return Err(DailyError::NoRoles);
        }
        info!(roles = roles.len(), "discovered roles");
        Ok(roles)
    }

    /// Whether today's attendance was already claimed for `role`.
    #[instrument(skip_all, fields(role = %role.game_role))]
    pub async fn attendance_status(
        &self,
        cred: &SessionCredential,
        role: &Role,
    ) -> Result<AttendanceStatus> {
        let response = self
            .signed(Method::GET, ATTENDANCE_PATH, cred, &role.game_role)
            .await
            .map_err(|err| err.in_context("Attendance check request failed"))?;
        let body: AttendanceStatusResponse = decode("Attendance check", &response)?;

        if body.code != 0 {
            return Err(api_error("Attendance status check failed", &body.message, &response));
        }

        let claimed = body.data.is_some_and(|data| data.has_today);
        debug!(claimed, "attendance status");
        Ok(if claimed { AttendanceStatus::AlreadyClaimed } else { AttendanceStatus::Unclaimed })
    }

    /// Claim today's attendance for `role` and return the resolvable rewards.
    #[instrument(skip_all, fields(role = %role.game_role))]
    pub async fn claim_attendance(
        &self,
        cred: &SessionCredential,
        role: &Role,
    ) -> Result<Vec<Reward>> {
        let response = self
            .signed(Method::POST, ATTENDANCE_PATH, cred, &role.game_role)
            .await
            .map_err(|err| err.in_context("Attendance claim request failed"))?;
        let body: AttendanceClaimResponse = decode("Attendance claim", &response)?;

        if body.code != 0 {
            return Err(api_error("Claim failed", &body.message, &response));
        }

        Ok(body.data.map(resolve_rewards).unwrap_or_default())
    }

    /// Status check followed by a claim when today is still open.
    pub async fn check_and_claim(
        &self,
        cred: &SessionCredential,
        role: &Role,
    ) -> Result<AttendanceOutcome> {
        match self.attendance_status(cred, role).await? {
            AttendanceStatus::AlreadyClaimed => Ok(AttendanceOutcome::AlreadyClaimed),
            AttendanceStatus::Unclaimed => {
                let rewards = self.claim_attendance(cred, role).await?;
                Ok(AttendanceOutcome::Claimed { rewards })
            }
        }
    }

    /// Send a request whose timestamp and signature are regenerated for
    /// every attempt.
    async fn signed(
        &self,
        method: Method,
        path: &str,
        cred: &SessionCredential,
        game_role: &str,
    ) -> Result<HttpResponse> {
        let url = self.endpoints.zonai_url(path);
        self.http
            .execute(|| {
                let request = SignedRequest::new(
                    method.clone(),
                    url.clone(),
                    path,
                    cred,
                    game_role,
                    self.clock.unix_seconds(),
                )?;
                Ok(request.into_builder(&self.http))
            })
            .await
    }
}

#[async_trait]
impl AttendanceGateway for SkportClient {
    async fn discover_roles(&self, cred: &SessionCredential) -> Result<Vec<Role>> {
        SkportClient::discover_roles(self, cred).await
    }

    async fn check_and_claim(
        &self,
        cred: &SessionCredential,
        role: &Role,
    ) -> Result<AttendanceOutcome> {
        SkportClient::check_and_claim(self, cred, role).await
    }
}

/// Map award ids through the resource table; ids without an entry are skipped.
fn resolve_rewards(data: AttendanceClaimData) -> Vec<Reward> {
    let AttendanceClaimData { award_ids, resource_info_map } = data;
    award_ids
        .iter()
        .filter_map(|award| resource_info_map.get(&award.id))
        .map(|info| Reward::new(info.name.clone(), info.count))
        .collect()
}

fn decode<T: DeserializeOwned>(context: &str, response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|err| parse_error(context, &err))
}

fn api_error(context: &str, message: &str, response: &HttpResponse) -> DailyError {
    DailyError::Api {
        context: context.to_string(),
        message: api_message(message, &response.text()),
    }
}
