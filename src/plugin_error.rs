use thiserror::Error;

/// Boxed error returned by plugin factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a [`PluginRegistry`](crate::PluginRegistry).
///
/// Every variant is fatal for the call that produced it. The registry never
/// retries and never falls back to the default once a configured
/// implementation fails to load.
#[derive(Debug, Error)]
pub enum PluginError {
    /// `register_override` was called after the slot was already populated.
    #[error("Another {extension_point} implementation was already registered")]
    AlreadyRegistered { extension_point: &'static str },

    /// No factory is known under the configured implementation name.
    #[error("{extension_point} implementation not found: {implementation}")]
    ImplementationNotFound {
        extension_point: &'static str,
        implementation: String,
    },

    /// The factory exists but failed to produce an instance.
    #[error("{extension_point} implementation not able to be instantiated: {implementation}")]
    InstantiationFailure {
        extension_point: &'static str,
        implementation: String,
        #[source]
        source: BoxError,
    },

    /// The factory exists but may not be loaded by name.
    #[error("{extension_point} implementation not able to be accessed: {implementation}")]
    AccessDenied {
        extension_point: &'static str,
        implementation: String,
    },

    /// The factory produced something other than this extension point.
    #[error(
        "{extension_point} implementation is not an instance of {extension_point}: {implementation}"
    )]
    TypeMismatch {
        extension_point: &'static str,
        implementation: String,
    },

    /// The configuration source holds a value that cannot be used.
    #[error("Invalid plugin configuration for `{key}`: {reason}")]
    InvalidConfiguration { key: String, reason: String },
}

impl PluginError {
    /// Name of the extension point the error concerns, when there is one.
    pub fn extension_point(&self) -> Option<&'static str> {
        match self {
            PluginError::AlreadyRegistered { extension_point }
            | PluginError::ImplementationNotFound {
                extension_point, ..
            }
            | PluginError::InstantiationFailure {
                extension_point, ..
            }
            | PluginError::AccessDenied {
                extension_point, ..
            }
            | PluginError::TypeMismatch {
                extension_point, ..
            } => Some(*extension_point),
            PluginError::InvalidConfiguration { .. } => None,
        }
    }

    pub(crate) fn from_load(
        extension_point: &'static str,
        implementation: &str,
        err: LoadError,
    ) -> Self {
        let implementation = implementation.to_string();
        match err {
            LoadError::NotFound => PluginError::ImplementationNotFound {
                extension_point,
                implementation,
            },
            LoadError::AccessDenied => PluginError::AccessDenied {
                extension_point,
                implementation,
            },
            LoadError::Instantiation(source) => PluginError::InstantiationFailure {
                extension_point,
                implementation,
                source,
            },
        }
    }
}

/// Failure reported by an [`ImplementationLoader`](crate::ImplementationLoader).
///
/// The loader does not know which extension point is being resolved, so the
/// registry wraps these into [`PluginError`] with that context attached.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no factory registered under this name")]
    NotFound,
    #[error("factory may not be loaded by name")]
    AccessDenied,
    #[error("factory failed: {0}")]
    Instantiation(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_registered_display() {
        let err = PluginError::AlreadyRegistered {
            extension_point: "ErrorHandler",
        };
        assert_eq!(
            err.to_string(),
            "Another ErrorHandler implementation was already registered"
        );
    }

    #[test]
    fn test_not_found_names_extension_point_and_implementation() {
        let err = PluginError::from_load("ErrorHandler", "acme::Missing", LoadError::NotFound);
        assert_eq!(
            err.to_string(),
            "ErrorHandler implementation not found: acme::Missing"
        );
        assert_eq!(err.extension_point(), Some("ErrorHandler"));
    }

    #[test]
    fn test_instantiation_keeps_source() {
        let err = PluginError::from_load(
            "ErrorHandler",
            "acme::Broken",
            LoadError::Instantiation("boom".into()),
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
        assert!(err.to_string().contains("acme::Broken"));
    }

    #[test]
    fn test_access_denied_maps() {
        let err = PluginError::from_load("ErrorHandler", "acme::Hidden", LoadError::AccessDenied);
        assert!(matches!(err, PluginError::AccessDenied { .. }));
        assert_eq!(
            err.to_string(),
            "ErrorHandler implementation not able to be accessed: acme::Hidden"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = PluginError::TypeMismatch {
            extension_point: "ErrorHandler",
            implementation: "acme::Logger".into(),
        };
        assert_eq!(
            err.to_string(),
            "ErrorHandler implementation is not an instance of ErrorHandler: acme::Logger"
        );
    }

    #[test]
    fn test_invalid_configuration_has_no_extension_point() {
        let err = PluginError::InvalidConfiguration {
            key: "plugin.ErrorHandler.implementation".into(),
            reason: "empty value".into(),
        };
        assert_eq!(err.extension_point(), None);
    }
}
