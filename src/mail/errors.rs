use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl MailError {
    /// Auth failures are surfaced verbatim to the caller and never retried.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn should_retry(&self) -> bool {
        match self {
            Self::Auth(_) => false,
            Self::InvalidResponse(_) => false,
            Self::Http { retriable, .. } => *retriable,

            Self::ConnectTimeout => true,
            Self::RequestTimeout => true,
            Self::Io(_) => true,
            Self::Unknown(_) => true,
        }
    }

    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Self::Auth(format!("mail provider rejected the token ({status})"))
        } else {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if let Some(status) = err.status() {
            Self::from_status(status)
        } else if err.is_request() {
            // DNS, connection errors
            Self::Io(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
