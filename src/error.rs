//! Shared error types for read and write operations.
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: bad magic, truncation, out-of-range offsets,
    /// unknown type tags, or text the codecs cannot represent.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A typed accessor was used on a value of a different kind.
    #[error("expected {expected} but found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A numeric conversion would lose data.
    #[error("value does not fit into {0}")]
    OutOfRange(&'static str),

    #[error("error reading file data")]
    Io(#[from] std::io::Error),

    #[error("error reading binary data")]
    Binrw(#[from] binrw::Error),
}

impl Error {
    /// Wraps any displayable message as invalid input data.
    pub(crate) fn invalid(msg: impl std::fmt::Display) -> Self {
        Self::InvalidData(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::invalid("bad magic").to_string(),
            "invalid data: bad magic"
        );
        assert_eq!(
            Error::TypeMismatch {
                expected: "a hash",
                actual: "an int",
            }
            .to_string(),
            "expected a hash but found an int"
        );
        assert_eq!(
            Error::OutOfRange("i32").to_string(),
            "value does not fit into i32"
        );
    }

    #[test]
    fn io_errors_convert() {
        let error: Error = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(error, Error::Io(_)));
    }
}
