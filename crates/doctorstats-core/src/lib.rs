//! doctorstats-core - Core library for Doctor Stats
//!
//! Provides the session store, token persistence, the authenticated HTTP
//! client, the typed service facade, analysis polling, and client-side
//! validation used by the Doctor Stats front ends.

pub mod config;
pub mod error;
pub mod event;
pub mod forms;
pub mod http;
pub mod poll;
pub mod route;
pub mod services;
pub mod session;
pub mod storage;
pub mod upload;

pub use config::ClientConfig;
pub use error::{ClientError, ValidationError};
pub use event::{EventBus, SessionEvent};
pub use http::ApiClient;
pub use poll::{AnalysisPoller, PollHandle, PollOutcome};
pub use route::{guard, GuardDecision, Route};
pub use services::{
    AnalysisService, AuthService, DatasetService, ReportService, Services, UserService,
    VisualizationService,
};
pub use session::{AuthPhase, SessionAction, SessionContext, SessionState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use upload::UploadFile;

/// Re-export of the wire types
pub use doctorstats_types as types;
