//! Token authentication extractors.
//!
//! Requests authenticate with `Authorization: Token <key>`. Headers using any
//! other scheme are ignored and the request is treated as anonymous, while a
//! `Token` header with a malformed or unknown key is rejected with `401`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{AuthToken, Error, Principal, require_principal};

use super::state::HttpState;

/// Authorization scheme accepted by the API.
pub const TOKEN_SCHEME: &str = "Token";

/// The caller of a request, anonymous or authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer(Option<Principal>);

impl Viewer {
    /// An unauthenticated caller.
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// An authenticated caller.
    pub const fn authenticated(principal: Principal) -> Self {
        Self(Some(principal))
    }

    /// The authenticated principal, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.0
    }

    /// Require an authenticated caller or fail with `401 Unauthorized`.
    pub fn require(&self) -> Result<Principal, Error> {
        require_principal(self.0.as_ref()).copied()
    }
}

/// Extractor for endpoints that always need an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

fn presented_token(req: &HttpRequest) -> Result<Option<AuthToken>, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token header"))?;
    let mut parts = header.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return Ok(None);
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(AuthToken::from_presented(key))),
        (None, _) => Err(Error::unauthorized(
            "invalid token header: no credentials provided",
        )),
        (Some(_), Some(_)) => Err(Error::unauthorized(
            "invalid token header: token string should not contain spaces",
        )),
    }
}

async fn resolve(
    token: Result<Option<AuthToken>, Error>,
    state: Option<web::Data<HttpState>>,
) -> Result<Viewer, Error> {
    let Some(token) = token? else {
        return Ok(Viewer::anonymous());
    };
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    match state.authenticator.authenticate(&token).await? {
        Some(principal) => Ok(Viewer::authenticated(principal)),
        None => {
            debug!("rejected unknown API token");
            Err(Error::unauthorized("invalid token"))
        }
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(resolve(token, state))
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let viewer = resolve(token, state).await?;
            viewer.require().map(Self)
        })
    }
}
