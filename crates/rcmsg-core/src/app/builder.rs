//! PipelineBuilder - module registration and startup validation
//!
//! # Fail-fast
//! - `expect_modules()` lists the module ids the configuration refers to
//! - `build()` checks "expected ⊆ registered"
//! - anything missing is a `BuildError` before the first message flows

use std::sync::Arc;

use super::dispatcher::Dispatcher;
use super::registry::ModuleRegistry;
use crate::domain::Details;
use crate::error::RcError;
use crate::ports::Module;

/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .register(Arc::new(Announcer))?
///     .expect_modules(&["announcer"])
///     .build()?;
/// let dispatcher = pipeline.dispatcher();
/// ```
pub struct PipelineBuilder<D: Details> {
    registry: ModuleRegistry<D>,
    expected_modules: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing modules: {0:?}. These modules were expected but not registered.")]
    MissingModules(Vec<String>),
}

impl<D: Details> PipelineBuilder<D> {
    pub fn new() -> Self {
        Self {
            registry: ModuleRegistry::new(),
            expected_modules: None,
        }
    }

    pub fn register(mut self, module: Arc<dyn Module<D>>) -> Result<Self, RcError> {
        self.registry.register(module)?;
        Ok(self)
    }

    pub fn expect_modules<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        self.expected_modules = Some(ids.iter().map(|id| id.as_ref().to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Pipeline<D>, BuildError> {
        if let Some(expected) = &self.expected_modules {
            let registered = self.registry.ids();
            let missing: Vec<String> = expected
                .iter()
                .filter(|id| !registered.contains(id))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingModules(missing));
            }
        }
        Ok(Pipeline {
            registry: Arc::new(self.registry),
        })
    }
}

impl<D: Details> Default for PipelineBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated set of modules, ready to dispatch messages.
pub struct Pipeline<D: Details> {
    registry: Arc<ModuleRegistry<D>>,
}

impl<D: Details> Pipeline<D> {
    pub fn registry(&self) -> &ModuleRegistry<D> {
        &self.registry
    }

    pub fn dispatcher(&self) -> Dispatcher<D> {
        Dispatcher::new(Arc::clone(&self.registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::RecordingModule;
    use crate::domain::Properties;

    #[test]
    fn build_success() {
        let pipeline = PipelineBuilder::<Properties>::new()
            .register(Arc::new(RecordingModule::new("moduleA")))
            .unwrap()
            .expect_modules(&["moduleA"])
            .build();
        assert!(pipeline.is_ok());
    }

    #[test]
    fn build_missing_modules() {
        let pipeline = PipelineBuilder::<Properties>::new()
            .register(Arc::new(RecordingModule::new("moduleA")))
            .unwrap()
            .expect_modules(&["moduleA", "moduleB"])
            .build();
        assert!(matches!(
            pipeline,
            Err(BuildError::MissingModules(missing)) if missing == vec!["moduleB".to_string()]
        ));
    }

    #[test]
    fn build_without_expectations() {
        let pipeline = PipelineBuilder::<Properties>::new().build().unwrap();
        assert!(pipeline.registry().is_empty());
    }
}
