use std::time::Instant;

use axum::{
	Json, Router,
	extract::{
		DefaultBodyLimit, FromRequest, FromRequestParts, MatchedPath, Path, Query, Request, State,
	},
	http::{HeaderName, HeaderValue, Method, StatusCode, header, request::Parts},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::{Serialize, de::DeserializeOwned};
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	set_header::SetResponseHeaderLayer,
	trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
	auth::{Admin, Authenticated},
	state::AppState,
};
use folio_domain::PageMeta;
use folio_service::{
	AdminProfileView, ArticleView, CertificationView, CreateArticle, CreateCertification,
	CreateGrant, CreatePatent, CreatePublication, Deleted, Error, FieldErrors, GrantView,
	ListParams, Page, PatentView, ProfileView, PublicationView, Resource, SearchItem,
	SearchParams, UpdateArticle, UpdateCertification, UpdateGrant, UpdatePatent, UpdateProfile,
	UpdatePublication,
	validation::{self, INVALID_BODY, INVALID_QUERY},
};

const HSTS: &str = "max-age=31536000; includeSubDomains";

pub fn router(state: AppState) -> Router {
	let cfg = &state.service.cfg;
	let cors = cors_layer(&cfg.security.cors_origins);
	let hsts_enabled = cfg.security.hsts_enabled;
	let body_limit = cfg.service.body_limit_bytes;
	let api = Router::new()
		.route("/search", get(search))
		.route("/articles", get(list::<ArticleView>))
		.route("/articles/{slug}", get(detail::<ArticleView>))
		.route("/publications", get(list::<PublicationView>))
		.route("/publications/{slug}", get(detail::<PublicationView>))
		.route("/grants", get(list::<GrantView>))
		.route("/grants/{slug}", get(detail::<GrantView>))
		.route("/patents", get(list::<PatentView>))
		.route("/patents/{slug}", get(detail::<PatentView>))
		.route("/certifications", get(list::<CertificationView>))
		.route("/certifications/{slug}", get(detail::<CertificationView>))
		.route("/profile", get(public_profile))
		.route("/auth/me", get(me))
		.route("/metrics", get(render_metrics))
		.nest("/admin", admin_router());
	let mut app = Router::new()
		.route("/health/live", get(live))
		.route("/health/ready", get(ready))
		.nest("/api/v1", api)
		.fallback(fallback)
		.layer(middleware::from_fn(track_http))
		.layer(DefaultBodyLimit::max(body_limit))
		.layer(SetResponseHeaderLayer::overriding(
			header::X_CONTENT_TYPE_OPTIONS,
			HeaderValue::from_static("nosniff"),
		))
		.layer(SetResponseHeaderLayer::overriding(
			header::X_FRAME_OPTIONS,
			HeaderValue::from_static("DENY"),
		))
		.layer(SetResponseHeaderLayer::overriding(
			header::REFERRER_POLICY,
			HeaderValue::from_static("no-referrer"),
		));

	if hsts_enabled {
		app = app.layer(SetResponseHeaderLayer::overriding(
			header::STRICT_TRANSPORT_SECURITY,
			HeaderValue::from_static(HSTS),
		));
	}

	app.layer(cors)
		.layer(TraceLayer::new_for_http())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.with_state(state)
}

fn admin_router() -> Router<AppState> {
	Router::new()
		.route("/articles", post(create_article))
		.route("/articles/{id}", put(update_article).delete(delete::<ArticleView>))
		.route("/publications", post(create_publication))
		.route("/publications/{id}", put(update_publication).delete(delete::<PublicationView>))
		.route("/grants", post(create_grant))
		.route("/grants/{id}", put(update_grant).delete(delete::<GrantView>))
		.route("/patents", post(create_patent))
		.route("/patents/{id}", put(update_patent).delete(delete::<PatentView>))
		.route("/certifications", post(create_certification))
		.route(
			"/certifications/{id}",
			put(update_certification).delete(delete::<CertificationView>),
		)
		.route("/profile", get(admin_profile).put(update_profile))
}

/// `"*"` mirrors the caller's origin so credentials stay allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
	let allow_origin = if origins.iter().any(|origin| origin == "*") {
		AllowOrigin::mirror_request()
	} else {
		AllowOrigin::list(origins.iter().filter_map(|origin| HeaderValue::from_str(origin).ok()))
	};

	CorsLayer::new()
		.allow_origin(allow_origin)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
		.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
		.expose_headers([HeaderName::from_static("x-request-id")])
		.allow_credentials(true)
}

async fn track_http(request: Request, next: Next) -> Response {
	let method = request.method().to_string();
	let route = request
		.extensions()
		.get::<MatchedPath>()
		.map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());
	let started = Instant::now();
	let response = next.run(request).await;
	let labels = vec![
		metrics::Label::new("method", method),
		metrics::Label::new("route", route),
		metrics::Label::new("status", response.status().as_u16().to_string()),
	];

	metrics::counter!("http_requests_total", labels.clone()).increment(1);
	metrics::histogram!("http_request_duration_seconds", labels)
		.record(started.elapsed().as_secs_f64());

	response
}

/// The success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
	success: bool,
	data: T,
	#[serde(skip_serializing_if = "Option::is_none")]
	meta: Option<PageMeta>,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
	Json(Envelope { success: true, data, meta: None })
}

fn paged<T>(page: Page<T>) -> Json<Envelope<Vec<T>>> {
	Json(Envelope { success: true, data: page.data, meta: Some(page.meta) })
}

#[derive(Debug, Serialize)]
struct Health {
	success: bool,
	status: &'static str,
}

#[derive(Debug, Serialize)]
struct Me {
	id: String,
	email: Option<String>,
	role: String,
}

async fn live() -> Json<Health> {
	Json(Health { success: true, status: "live" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
	if let Err(err) = state.service.ready().await {
		tracing::warn!(error = %err, "Readiness check failed.");

		return Err(ApiError::new(
			StatusCode::SERVICE_UNAVAILABLE,
			"READINESS_FAILED",
			"Database is unreachable.",
		));
	}

	Ok(Json(Health { success: true, status: "ready" }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
	match state.metrics.as_ref() {
		Some(handle) =>
			([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], handle.render()).into_response(),
		None => ApiError::not_found("Metrics are disabled.").into_response(),
	}
}

async fn fallback() -> ApiError {
	ApiError::not_found("Route not found.")
}

async fn search(
	State(state): State<AppState>,
	ValidQuery(params): ValidQuery<SearchParams>,
) -> Result<Json<Envelope<Vec<SearchItem>>>, ApiError> {
	let response = state.service.search(&params).await?;

	Ok(paged(Page { data: response.data, meta: response.meta }))
}

async fn list<V>(
	State(state): State<AppState>,
	ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Envelope<Vec<V>>>, ApiError>
where
	V: Resource + 'static,
{
	let page = state.service.list::<V>(&params).await?;

	Ok(paged(page))
}

async fn detail<V>(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Json<Envelope<V>>, ApiError>
where
	V: Resource + 'static,
{
	Ok(ok(state.service.get::<V>(&slug).await?))
}

async fn public_profile(
	State(state): State<AppState>,
) -> Result<Json<Envelope<ProfileView>>, ApiError> {
	Ok(ok(state.service.public_profile().await?))
}

async fn me(Authenticated(claims): Authenticated) -> Json<Envelope<Me>> {
	ok(Me { id: claims.sub, email: claims.email, role: claims.role })
}

async fn delete<V>(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
) -> Result<Json<Envelope<Deleted>>, ApiError>
where
	V: Resource + 'static,
{
	let id = validation::parse_id(&id)?;

	Ok(ok(state.service.delete::<V>(Some(&claims.sub), id).await?))
}

type Created<T> = (StatusCode, Json<Envelope<T>>);

fn created<T>(data: T) -> Created<T> {
	(StatusCode::CREATED, ok(data))
}

fn record_id(raw: &str) -> Result<Uuid, ApiError> {
	Ok(validation::parse_id(raw)?)
}

async fn create_article(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<CreateArticle>,
) -> Result<Created<ArticleView>, ApiError> {
	Ok(created(state.service.create_article(Some(&claims.sub), req).await?))
}

async fn update_article(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
	ValidJson(req): ValidJson<UpdateArticle>,
) -> Result<Json<Envelope<ArticleView>>, ApiError> {
	Ok(ok(state.service.update_article(Some(&claims.sub), record_id(&id)?, req).await?))
}

async fn create_publication(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<CreatePublication>,
) -> Result<Created<PublicationView>, ApiError> {
	Ok(created(state.service.create_publication(Some(&claims.sub), req).await?))
}

async fn update_publication(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
	ValidJson(req): ValidJson<UpdatePublication>,
) -> Result<Json<Envelope<PublicationView>>, ApiError> {
	Ok(ok(state.service.update_publication(Some(&claims.sub), record_id(&id)?, req).await?))
}

async fn create_grant(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<CreateGrant>,
) -> Result<Created<GrantView>, ApiError> {
	Ok(created(state.service.create_grant(Some(&claims.sub), req).await?))
}

async fn update_grant(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
	ValidJson(req): ValidJson<UpdateGrant>,
) -> Result<Json<Envelope<GrantView>>, ApiError> {
	Ok(ok(state.service.update_grant(Some(&claims.sub), record_id(&id)?, req).await?))
}

async fn create_patent(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<CreatePatent>,
) -> Result<Created<PatentView>, ApiError> {
	Ok(created(state.service.create_patent(Some(&claims.sub), req).await?))
}

async fn update_patent(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
	ValidJson(req): ValidJson<UpdatePatent>,
) -> Result<Json<Envelope<PatentView>>, ApiError> {
	Ok(ok(state.service.update_patent(Some(&claims.sub), record_id(&id)?, req).await?))
}

async fn create_certification(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<CreateCertification>,
) -> Result<Created<CertificationView>, ApiError> {
	Ok(created(state.service.create_certification(Some(&claims.sub), req).await?))
}

async fn update_certification(
	State(state): State<AppState>,
	Admin(claims): Admin,
	Path(id): Path<String>,
	ValidJson(req): ValidJson<UpdateCertification>,
) -> Result<Json<Envelope<CertificationView>>, ApiError> {
	Ok(ok(state.service.update_certification(Some(&claims.sub), record_id(&id)?, req).await?))
}

async fn admin_profile(
	State(state): State<AppState>,
	Admin(_): Admin,
) -> Result<Json<Envelope<Option<AdminProfileView>>>, ApiError> {
	Ok(ok(state.service.admin_profile().await?))
}

async fn update_profile(
	State(state): State<AppState>,
	Admin(claims): Admin,
	ValidJson(req): ValidJson<UpdateProfile>,
) -> Result<Json<Envelope<AdminProfileView>>, ApiError> {
	Ok(ok(state.service.update_profile(Some(&claims.sub), req).await?))
}

/// Query string extraction that reports failures in the error envelope.
pub struct ValidQuery<T>(pub T);
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		match Query::<T>::from_request_parts(parts, state).await {
			Ok(Query(value)) => Ok(Self(value)),
			Err(rejection) => Err(ApiError::malformed(INVALID_QUERY, rejection.body_text())),
		}
	}
}

/// JSON body extraction that reports failures in the error envelope.
pub struct ValidJson<T>(pub T);
impl<T, S> FromRequest<S> for ValidJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(Self(value)),
			Err(rejection) => Err(ApiError::malformed(INVALID_BODY, rejection.body_text())),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Details {
	form_errors: Vec<String>,
	field_errors: FieldErrors,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	success: bool,
	code: &'static str,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<Details>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	code: &'static str,
	message: String,
	details: Option<Details>,
}
impl ApiError {
	fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
		Self { status, code, message: message.into(), details: None }
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
	}

	fn validation(message: String, form_errors: Vec<String>, field_errors: FieldErrors) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST,
			code: "VALIDATION_ERROR",
			message,
			details: Some(Details { form_errors, field_errors }),
		}
	}

	/// Input that could not be decoded at all, so no single field is to blame.
	fn malformed(message: &str, reason: String) -> Self {
		Self::validation(message.to_string(), vec![reason], FieldErrors::new())
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Validation { message, fields } => Self::validation(message, Vec::new(), fields),
			Error::NotFound { message } => Self::not_found(message),
			Error::Conflict { message } => Self::new(StatusCode::CONFLICT, "CONFLICT", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed in storage.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			success: false,
			code: self.code,
			message: self.message,
			details: self.details,
		};

		(self.status, Json(body)).into_response()
	}
}
