use crate::errors::ServerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Store(#[from] ServerError),
}
