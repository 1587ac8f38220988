//! Ambient defaults for readers and writers
//!
//! A [`Config`] is resolved once, when a [`DatumWriter`] or [`DatumReader`]
//! is built from it; nothing in this crate reads process-wide mutable state.
//!
//! [`DatumWriter`]: crate::write::DatumWriter
//! [`DatumReader`]: crate::read::DatumReader

use std::sync::Arc;

use crate::logical::LogicalTypeRegistry;
use crate::names::{DashUnderscore, Identity, NameCodec};
use crate::value::ValidationMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde_impls", serde(default, rename_all = "kebab-case"))]
pub struct Config {
    /// Whether named record values must only hold declared fields
    pub strict_fields: bool,
    /// Whether symbolic names are kebab-case (see [`DashUnderscore`])
    pub mangle_names: bool,
    /// Whether the standard logical-type conversions are applied
    pub standard_conversions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_fields: true,
            mangle_names: false,
            standard_conversions: true,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    #[must_use]
    pub fn mangle_names(mut self, mangle: bool) -> Self {
        self.mangle_names = mangle;
        self
    }

    #[must_use]
    pub fn standard_conversions(mut self, enabled: bool) -> Self {
        self.standard_conversions = enabled;
        self
    }

    pub fn validation_mode(&self) -> ValidationMode {
        ValidationMode::from_strict(self.strict_fields)
    }

    pub fn registry(&self) -> &'static LogicalTypeRegistry {
        if self.standard_conversions {
            LogicalTypeRegistry::standard()
        } else {
            LogicalTypeRegistry::empty()
        }
    }

    pub fn name_codec(&self) -> Arc<dyn NameCodec> {
        if self.mangle_names {
            Arc::new(DashUnderscore)
        } else {
            Arc::new(Identity)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.validation_mode(), ValidationMode::Checked);
        assert!(!config.registry().is_empty());
        assert_eq!(config.name_codec().mangle("a-b"), "a-b");
    }

    #[test]
    fn builder() {
        let config = Config::new()
            .strict_fields(false)
            .mangle_names(true)
            .standard_conversions(false);
        assert_eq!(config.validation_mode(), ValidationMode::Unchecked);
        assert!(config.registry().is_empty());
        assert_eq!(config.name_codec().mangle("a-b"), "a_b");
    }

    #[cfg(feature = "serde_impls")]
    #[test]
    fn partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "strict-fields": false }"#).unwrap();
        assert_eq!(config, Config::default().strict_fields(false));
    }
}
