use std::borrow::Cow;
use tuish_licensing::LicenseError;

/// Errors that can abort SDK construction or configuration loading.
///
/// Nothing after construction returns these: license checks report their
/// outcome through [`crate::Verdict`], cache I/O failures degrade to "no
/// cache", and transport failures collapse to a `network_error` verdict.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Configuration file or environment overlay failed to load.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// The configured public key could not be parsed.
    #[error("License engine error{}: {source}", format_context(.context))]
    License { source: LicenseError, context: Option<Cow<'static, str>> },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal SDK error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Extension trait attaching human-readable context to SDK results.
pub trait SdkErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SdkError>;
}

impl<T> SdkErrorExt<T> for Result<T, SdkError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                SdkError::Config { context: c, .. }
                | SdkError::License { context: c, .. }
                | SdkError::Http { context: c, .. }
                | SdkError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<config::ConfigError> for SdkError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

impl<T> SdkErrorExt<T> for Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SdkError> {
        self.map_err(|source| SdkError::Config { source, context: Some(context.into()) })
    }
}

impl From<LicenseError> for SdkError {
    #[inline]
    fn from(source: LicenseError) -> Self {
        Self::License { source, context: None }
    }
}

impl<T> SdkErrorExt<T> for Result<T, LicenseError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SdkError> {
        self.map_err(|source| SdkError::License { source, context: Some(context.into()) })
    }
}

impl From<reqwest::Error> for SdkError {
    #[inline]
    fn from(source: reqwest::Error) -> Self {
        Self::Http { source, context: None }
    }
}

impl<T> SdkErrorExt<T> for Result<T, reqwest::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SdkError> {
        self.map_err(|source| SdkError::Http { source, context: Some(context.into()) })
    }
}

impl From<&'static str> for SdkError {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for SdkError {
    #[inline]
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
