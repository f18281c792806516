use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid delay: {0} seconds")]
    InvalidDelay(f64),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Couldn't set up logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("Couldn't open the log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
