use crate::client::error::TransportError;
use crate::parsing::error::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FmiError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("No FMI API key configured (set FMI_API_KEY)")]
    MissingApiKey,
}
