//! Failures that abort a demo run.

use std::path::PathBuf;

use magneto_field::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("simulation setup failed: {0}")]
    Field(#[from] FieldError),

    #[error("failed to write snapshot to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
