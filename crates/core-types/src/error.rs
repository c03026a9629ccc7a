use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unrecognized reporting period: {0}")]
    UnknownPeriod(String),
}
