//! Runtime bootstrap: tracing, session orchestration, and external widget lifecycle.

use tracing::Level;

pub mod metrics;
pub mod session;
pub mod widget;

pub use session::{PendingSubmission, Session, SubmitOutcome};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .try_init();
}
