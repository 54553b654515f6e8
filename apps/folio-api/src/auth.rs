//! Bearer token verification for the admin surface.
//!
//! Tokens are HS256 JWTs issued elsewhere. They are checked against the current secret and,
//! while keys rotate, the previous one.

use axum::{
	extract::FromRequestParts,
	http::{header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{routes::ApiError, state::AppState};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	pub sub: String,
	pub role: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	pub exp: u64,
}

pub struct Authenticator {
	current: DecodingKey,
	previous: Option<DecodingKey>,
	validation: Validation,
}
impl Authenticator {
	pub fn new(cfg: &folio_config::Security) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);

		validation.set_required_spec_claims(&["exp", "sub"]);

		Self {
			current: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
			previous: cfg
				.jwt_previous_secret
				.as_deref()
				.map(|secret| DecodingKey::from_secret(secret.as_bytes())),
			validation,
		}
	}

	pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
		let data = match (decode::<Claims>(token, &self.current, &self.validation), &self.previous) {
			(Err(err), Some(previous)) if matches!(err.kind(), ErrorKind::InvalidSignature) =>
				decode::<Claims>(token, previous, &self.validation)?,
			(result, _) => result?,
		};

		Ok(data.claims)
	}
}

/// Any caller holding a valid token.
pub struct Authenticated(pub Claims);
impl FromRequestParts<AppState> for Authenticated {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
			.map(str::trim)
			.filter(|token| !token.is_empty())
			.ok_or_else(|| ApiError::unauthorized("Missing bearer token."))?;
		let claims = state.auth.verify(token).map_err(|err| {
			tracing::debug!(error = %err, "Bearer token rejected.");

			ApiError::unauthorized("Invalid or expired token.")
		})?;

		Ok(Self(claims))
	}
}

/// A caller whose token carries the admin role.
pub struct Admin(pub Claims);
impl FromRequestParts<AppState> for Admin {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;

		if claims.role != ADMIN_ROLE {
			tracing::warn!(sub = %claims.sub, role = %claims.role, "Admin access denied.");

			return Err(ApiError::forbidden("Admin role required."));
		}

		Ok(Self(claims))
	}
}
