use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::auth::Authenticator;
use folio_service::FolioService;
use folio_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FolioService>,
	pub auth: Arc<Authenticator>,
	pub metrics: Option<PrometheusHandle>,
}
impl AppState {
	/// Connects to Postgres and brings the schema up to date.
	pub async fn new(
		config: folio_config::Config,
		metrics: Option<PrometheusHandle>,
	) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(FolioService::new(config, db), metrics))
	}

	pub fn from_service(service: FolioService, metrics: Option<PrometheusHandle>) -> Self {
		let auth = Authenticator::new(&service.cfg.security);

		Self { service: Arc::new(service), auth: Arc::new(auth), metrics }
	}
}
