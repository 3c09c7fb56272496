use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid deep-rest mode {0:?}")]
    InvalidMode(String),

    #[error("deep-rest state parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
