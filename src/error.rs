use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The base template is missing, unreadable, or not a DOCX package.
    Template(String),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    /// An attached image could not be decoded. Fatal for the whole assembly;
    /// the caller is expected to pre-validate uploads.
    ResourceUnreadable { name: String, reason: String },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Template(reason) => write!(f, "template error: {reason}"),
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Xml(e) => write!(f, "XML error: {e}"),
            Error::ResourceUnreadable { name, reason } => {
                write!(f, "image '{name}' could not be read: {reason}")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
