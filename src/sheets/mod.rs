//! Spreadsheet backend: the `SheetClient` seam and the Google implementation.

pub mod google;

use thiserror::Error;

use crate::sample::Sample;

/// A spreadsheet that rows can be appended to.
///
/// `login` resolves a handle to the first worksheet of the target
/// spreadsheet; the handle stays valid until an append fails, at which point
/// the caller discards it and logs in again. All failures come back as
/// `Err` - the caller decides whether to log and carry on.
pub trait SheetClient {
    type Handle;

    fn login(&self) -> Result<Self::Handle, SheetError>;
    fn append(&self, handle: &Self::Handle, sample: &Sample) -> Result<(), SheetError>;
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("append attempted without a live worksheet handle")]
    NotLoggedIn,
    #[error("reading key file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed service-account key: {0}")]
    KeyFile(#[from] serde_json::Error),
    #[error("signing auth token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange rejected with status {0}")]
    Auth(reqwest::StatusCode),
    #[error("no spreadsheet named '{0}'")]
    NotFound(String),
    #[error("spreadsheet has no worksheets")]
    NoWorksheet,
    #[error("append rejected with status {0}")]
    Append(reqwest::StatusCode),
}
