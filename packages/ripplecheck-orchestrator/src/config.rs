//! Immutable configuration surface for a run (spec §9 "Configuration
//! surface").

#[derive(Debug, Clone, PartialEq)]
pub struct RippleConfig {
    pub cache_dir_name: String,
    pub project_config_file: String,
    pub batch_yield_size: usize,
    pub max_context_files: usize,
    pub max_context_symbols: usize,
    pub max_resolved_hints: usize,
    pub max_resolved_keywords: usize,
    pub relevance_threshold: f64,
    pub hint_accept_threshold: f64,
    pub keyword_accept_threshold: f64,
    pub confidence_high: f64,
    pub confidence_medium: f64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            cache_dir_name: "blastradius".to_string(),
            project_config_file: "tsconfig.json".to_string(),
            batch_yield_size: 20,
            max_context_files: 150,
            max_context_symbols: 400,
            max_resolved_hints: 20,
            max_resolved_keywords: 10,
            relevance_threshold: 0.30,
            hint_accept_threshold: 0.45,
            keyword_accept_threshold: 0.25,
            confidence_high: 0.85,
            confidence_medium: 0.45,
        }
    }
}

impl RippleConfig {
    pub fn builder() -> RippleConfigBuilder {
        RippleConfigBuilder::default()
    }
}

/// Builder for overriding individual defaults, mirroring the override tier
/// of the teacher's preset/override configuration pattern without the YAML
/// tier this spec has no use for.
#[derive(Debug, Clone, Default)]
pub struct RippleConfigBuilder {
    base: Option<RippleConfig>,
}

impl RippleConfigBuilder {
    pub fn cache_dir_name(mut self, name: impl Into<String>) -> Self {
        self.base_mut().cache_dir_name = name.into();
        self
    }

    pub fn batch_yield_size(mut self, size: usize) -> Self {
        self.base_mut().batch_yield_size = size;
        self
    }

    pub fn build(self) -> RippleConfig {
        self.base.unwrap_or_default()
    }

    fn base_mut(&mut self) -> &mut RippleConfig {
        self.base.get_or_insert_with(RippleConfig::default)
    }
}
