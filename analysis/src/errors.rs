use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] casework_sdk::AnalysisError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type CallerResult<T> = Result<T, CallerError>;
