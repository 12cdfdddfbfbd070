use std::time::Duration;

pub type BannerResult<T> = Result<T, BannerError>;

#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("params error: {0}")]
    Params(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("{program} timed out after {}ms", after.as_millis())]
    Timeout { program: String, after: Duration },

    #[error("GitHub API {status} for {url}\n{body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BannerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn params(msg: impl Into<String>) -> Self {
        Self::Params(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn timeout(program: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            program: program.into(),
            after,
        }
    }
}
