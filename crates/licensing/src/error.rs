use std::borrow::Cow;

/// Error types specific to the licensing engine.
///
/// Verification outcomes are not errors: a bad signature or an expired token
/// is reported through [`crate::verifier::Verification`]. These variants cover
/// the conditions that legitimately abort, a misconfigured public key first
/// among them.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("Invalid public key{}: {message}", format_context(.context))]
    InvalidPublicKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Base64url or hex decoding failed.
    #[error("Encoding error{}: {message}", format_context(.context))]
    Encoding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Serde serialization error with optional context.
    #[error("Serde serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal licensing error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Extension trait attaching human-readable context to licensing results.
pub trait LicenseErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LicenseError>;
}

impl<T> LicenseErrorExt<T> for Result<T, LicenseError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                LicenseError::InvalidPublicKey { context: c, .. }
                | LicenseError::Encoding { context: c, .. }
                | LicenseError::Serialize { context: c, .. }
                | LicenseError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<serde_json::Error> for LicenseError {
    #[inline]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize { source, context: None }
    }
}

impl<T> LicenseErrorExt<T> for Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LicenseError> {
        self.map_err(|source| LicenseError::Serialize { source, context: Some(context.into()) })
    }
}

impl From<&'static str> for LicenseError {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for LicenseError {
    #[inline]
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
