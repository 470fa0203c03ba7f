#[derive(Debug)]
pub enum Error {
    InvalidBaseUrl(String),
    UrlParse(chipp_http::UrlParseError),
    HttpError(chipp_http::Error),
    Status { url: String, status_code: u32 },
    Json(serde_json::Error),
    Temperature(String),
}

/// Coarse classification used by callers to pick a failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Parse,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBaseUrl(_) | Self::UrlParse(_) | Self::HttpError(_) => {
                ErrorKind::Transport
            }
            Self::Status { .. } => ErrorKind::Protocol,
            Self::Json(_) | Self::Temperature(_) => ErrorKind::Parse,
        }
    }
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::HttpError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => write!(f, "Invalid base URL: {url}"),
            Self::UrlParse(err) => write!(f, "URL parse error: {err}"),
            Self::HttpError(err) => write!(f, "HTTP error: {err}"),
            Self::Status { url, status_code } => {
                write!(f, "Unexpected status {status_code} from {url}")
            }
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::Temperature(body) => write!(f, "Invalid temperature reading: {body:?}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let status = Error::Status {
            url: "https://localhost:7021/api/sensor/1".to_string(),
            status_code: 503,
        };
        assert_eq!(status.kind(), ErrorKind::Protocol);

        let temperature = Error::Temperature("warm".to_string());
        assert_eq!(temperature.kind(), ErrorKind::Parse);

        let json = serde_json::from_str::<u8>("{").unwrap_err();
        assert_eq!(Error::from(json).kind(), ErrorKind::Parse);

        let base = Error::InvalidBaseUrl("::".to_string());
        assert_eq!(base.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_display() {
        let status = Error::Status {
            url: "https://localhost:7021/api/SystemState".to_string(),
            status_code: 404,
        };
        assert_eq!(
            status.to_string(),
            "Unexpected status 404 from https://localhost:7021/api/SystemState"
        );

        let temperature = Error::Temperature("n/a".to_string());
        assert_eq!(temperature.to_string(), "Invalid temperature reading: \"n/a\"");
    }
}
