use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The proposal record violates an input invariant (caught at the public
    /// boundary; rendering assumes a valid record past this point).
    InvalidProposal(String),
    /// Unrecoverable fault while assembling or serializing the document.
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::InvalidProposal(msg) => write!(f, "invalid proposal: {msg}"),
            Error::Render(msg) => write!(f, "document generation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
