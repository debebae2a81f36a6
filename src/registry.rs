//! Domain-keyed registry of parser configurations.
//!
//! Configs live as JSON files, one per domain, loaded once at startup and
//! shared read-only behind `Arc` across every worker extracting documents
//! for that domain. Loading fails fast on the first malformed config; a
//! broken selector should never be discovered on a live document.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::presets;

/// Immutable-after-load map from domain to parser config.
#[derive(Debug, Default, Clone)]
pub struct ConfigRegistry {
    configs: HashMap<String, Arc<ParserConfig>>,
}

impl ConfigRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a config under its domain (lowercased).
    /// Re-registering a domain replaces the previous config.
    pub fn insert(&mut self, config: ParserConfig) -> Result<()> {
        let config = config.into_validated()?;
        self.configs.insert(config.domain.to_lowercase(), Arc::new(config));
        Ok(())
    }

    /// Load every `*.json` file under `dir`, recursively.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_dir_into(dir.as_ref())?;
        debug!(configs = registry.len(), "config registry loaded");
        Ok(registry)
    }

    fn load_dir_into(&mut self, dir: &Path) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.load_dir_into(&path)?;
            } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                self.insert(ParserConfig::from_path(&path)?)?;
            }
        }
        Ok(())
    }

    /// Config for a domain, if one is registered.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<Arc<ParserConfig>> {
        let domain = domain.to_lowercase();
        self.configs
            .get(&domain)
            .or_else(|| domain.strip_prefix("www.").and_then(|bare| self.configs.get(bare)))
            .cloned()
    }

    /// Config for a domain, falling back to the generic preset.
    #[must_use]
    pub fn get_or_generic(&self, domain: &str) -> Arc<ParserConfig> {
        self.get(domain).unwrap_or_else(presets::generic_config)
    }

    /// Registered domains, in no particular order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
