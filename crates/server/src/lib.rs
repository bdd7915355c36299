pub mod config;
pub mod credentials;
pub mod error;
pub mod form;
pub mod logging;
pub mod pipeline;
pub mod routes;
pub mod session;
pub mod state;
pub mod uploads;
pub mod views;

pub use config::ServerConfig;
pub use credentials::{CredentialProvider, StaticCredentials};
pub use error::AppError;
pub use pipeline::{PipelineError, PredictionOutcome, PredictionPipeline, ScanUpload};
pub use routes::router;
pub use state::AppState;
pub use uploads::UploadStore;
