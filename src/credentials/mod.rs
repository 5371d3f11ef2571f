//! Static credential handling.
//!
//! The host authenticates a plugin with a single opaque token, handed to the
//! process as a file path at startup. The file is read exactly once, before
//! the socket is opened; the token never changes for the process lifetime.

use std::fmt;
use std::path::Path;

use crate::error::HostlinkError;

/// Opaque authentication token.
///
/// The whole file content is the token, minus trailing whitespace: the token
/// travels as an HTTP header value, where a raw newline is illegal anyway.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Read the token from a file.
    ///
    /// Fails if the file cannot be read as UTF-8 text or contains nothing but
    /// whitespace. This is the only blocking read the client performs.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostlinkError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| HostlinkError::CredentialRead {
            path: path.display().to_string(),
            source,
        })?;
        let token = raw.trim_end().to_string();
        if token.is_empty() {
            return Err(HostlinkError::CredentialEmpty {
                path: path.display().to_string(),
            });
        }
        Ok(Self { token })
    }

    /// The token value, as sent in the `authtoken` header.
    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keep the token out of debug output and logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}
