use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    ConfigParse,
    EventParse,
    InvalidOption,
    Fetch,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Error {
        Error::new(ErrorKind::EventParse, &json_error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(http_error: reqwest::Error) -> Error {
        Error::new(ErrorKind::Fetch, &http_error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| "invalid input".to_owned()),
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::EventParse => "invalid event data".to_owned(),
            ErrorKind::InvalidOption => "invalid option value".to_owned(),
            ErrorKind::Fetch => "could not fetch event data".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let err = Error::from(ErrorKind::Fetch);
        assert_eq!(err.to_string(), "could not fetch event data");

        let err = err.with_msg("connection refused");
        assert_eq!(
            err.to_string(),
            "could not fetch event data: connection refused"
        );
    }

    #[test]
    fn io_error_roundtrips_kind() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::NotFound);

        let back: io::Error = Error::new(ErrorKind::ConfigParse, "bad").into();
        assert_eq!(back.kind(), io::ErrorKind::InvalidInput);
    }
}
