use std::sync::Arc;

use crate::config::Config;
use crate::ml::{Artifacts, InferencePipeline};
use crate::views::TemplateStore;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<InferencePipeline>,
    pub templates: Arc<TemplateStore>,
}

impl AppState {
    /// Load artifacts and check templates. Missing files are logged, not fatal.
    pub fn new(cfg: &Config) -> Self {
        let templates = TemplateStore::new(&cfg.views.templates_dir);
        templates.report();

        let artifacts = Artifacts::load(&cfg.artifacts);

        Self::from_parts(InferencePipeline::new(artifacts), templates)
    }

    pub fn from_parts(pipeline: InferencePipeline, templates: TemplateStore) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            templates: Arc::new(templates),
        }
    }
}
