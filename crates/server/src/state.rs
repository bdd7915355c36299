use crate::credentials::CredentialProvider;
use crate::pipeline::PredictionPipeline;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use records::ScanRecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    pub store: Arc<ScanRecordStore>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        pipeline: Arc<PredictionPipeline>,
        credentials: Arc<dyn CredentialProvider>,
        cookie_key: Key,
    ) -> Self {
        let store = pipeline.store().clone();
        Self {
            pipeline,
            store,
            credentials,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
