use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    StateIo(String),
    #[error("{0}")]
    StateParse(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("invalid timestamp '{0}': expected RFC 3339")]
    InvalidTimestamp(String),
    #[error("window end must be after window start")]
    WindowInverted,
    #[error("sample step must be greater than zero")]
    StepZero,
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
