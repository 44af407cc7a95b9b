//! Three-step credential negotiation
//!
//! Validate the account token, trade it for an OAuth grant code, then trade
//! the code for the session credential used to sign game API requests. Each
//! step runs at most once per negotiation and the first failure ends it.

use async_trait::async_trait;
use endfield_core::CredentialNegotiator;
use endfield_domain::constants::{
    APP_CODE, BASIC_INFO_PATH, GENERATE_CRED_PATH, OAUTH_GRANT_PATH, PLATFORM, WEB_ORIGIN,
    WEB_REFERER,
};
use endfield_domain::{
    AccountToken, DailyError, EndpointsConfig, NegotiationStep, Result, SessionCredential,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use super::headers::PLATFORM_HEADER;
use super::wire::{
    api_message, BasicInfoResponse, GenerateCredRequest, GenerateCredResponse, GrantRequest,
    GrantResponse,
};
use crate::errors::parse_error;
use crate::http::{HttpClient, HttpResponse};

const JSON: &str = "application/json";

/// Progress of one negotiation. Transitions only move forward.
#[derive(Debug)]
enum NegotiationState {
    Validate,
    Grant,
    Exchange { code: String },
    Done(SessionCredential),
}

/// Negotiates session credentials against the account and zonai services.
#[derive(Clone)]
pub struct SkportAuthenticator {
    http: HttpClient,
    endpoints: EndpointsConfig,
}

impl SkportAuthenticator {
    pub fn new(http: HttpClient, endpoints: EndpointsConfig) -> Self {
        Self { http, endpoints }
    }

    /// Run the full exchange for one account token.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &AccountToken) -> Result<SessionCredential> {
        if token.is_empty() {
            return Err(DailyError::InvalidInput(
                "no account token supplied for OAuth flow".to_string(),
            ));
        }

        let mut state = NegotiationState::Validate;
        loop {
            state = match state {
                NegotiationState::Validate => {
                    self.validate(token).await?;
                    NegotiationState::Grant
                }
                NegotiationState::Grant => {
                    NegotiationState::Exchange { code: self.grant(token).await? }
                }
                NegotiationState::Exchange { code } => {
                    NegotiationState::Done(self.exchange(&code).await?)
                }
                NegotiationState::Done(credential) => {
                    info!(user_id = %credential.user_id, "obtained session credential");
                    return Ok(credential);
                }
            };
        }
    }

    async fn validate(&self, token: &AccountToken) -> Result<()> {
        let step = NegotiationStep::Validate;
        let url = Url::parse_with_params(
            &self.endpoints.account_url(BASIC_INFO_PATH),
            &[("token", token.as_str())],
        )
        .map_err(|err| DailyError::Config(format!("invalid account service URL: {err}")))?;

        let response = self
            .http
            .execute(|| Ok(self.http.request(reqwest::Method::GET, url.clone())))
            .await
            .map_err(|err| err.in_context(&request_failed(step)))?;
        let body: BasicInfoResponse = decode(step, &response)?;

        if body.status != 0 {
            return Err(rejected(step, &body.msg, &response));
        }
        debug!(%step, "account token accepted");
        Ok(())
    }

    async fn grant(&self, token: &AccountToken) -> Result<String> {
        let step = NegotiationStep::Grant;
        let url = self.endpoints.account_url(OAUTH_GRANT_PATH);
        let request = GrantRequest { token: token.as_str(), app_code: APP_CODE, kind: 0 };

        let response = self
            .http
            .execute(|| Ok(self.http.request(reqwest::Method::POST, url.as_str()).json(&request)))
            .await
            .map_err(|err| err.in_context(&request_failed(step)))?;
        let body: GrantResponse = decode(step, &response)?;

        match body.data {
            Some(data) if body.status == 0 && !data.code.is_empty() => {
                debug!(%step, "received grant code");
                Ok(data.code)
            }
            _ => Err(rejected(step, &body.msg, &response)),
        }
    }

    async fn exchange(&self, code: &str) -> Result<SessionCredential> {
        let step = NegotiationStep::Exchange;
        let url = self.endpoints.zonai_url(GENERATE_CRED_PATH);
        let request = GenerateCredRequest { code, kind: 1 };

        let response = self
            .http
            .execute(|| {
                Ok(self
                    .http
                    .request(reqwest::Method::POST, url.as_str())
                    .header(CONTENT_TYPE, JSON)
                    .header(ACCEPT, JSON)
                    .header(PLATFORM_HEADER, PLATFORM)
                    .header(REFERER, WEB_REFERER)
                    .header(ORIGIN, WEB_ORIGIN)
                    .json(&request))
            })
            .await
            .map_err(|err| err.in_context(&request_failed(step)))?;
        let body: GenerateCredResponse = decode(step, &response)?;

        match body.data {
            Some(data)
                if body.code == 0
                    && !data.cred.is_empty()
                    && !data.token.is_empty()
                    && !data.user_id.is_empty() =>
            {
                Ok(SessionCredential::new(data.cred, data.token, data.user_id))
            }
            _ => Err(rejected(step, &body.message, &response)),
        }
    }
}

#[async_trait]
impl CredentialNegotiator for SkportAuthenticator {
    async fn negotiate(&self, token: &AccountToken) -> Result<SessionCredential> {
        self.authenticate(token).await
    }
}

fn request_failed(step: NegotiationStep) -> String {
    format!("OAuth {step} request failed")
}

fn decode<T: DeserializeOwned>(step: NegotiationStep, response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|err| parse_error(&format!("OAuth {step}"), &err))
}

fn rejected(step: NegotiationStep, message: &str, response: &HttpResponse) -> DailyError {
    DailyError::Negotiation { step, message: api_message(message, &response.text()) }
}
