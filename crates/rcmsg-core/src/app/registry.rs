//! ModuleRegistry - interested modules by id.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::Details;
use crate::error::RcError;
use crate::ports::Module;

/// Registry of modules (id -> module).
///
/// Design:
/// - Built during initialization (mutable).
/// - Shared behind an `Arc` while messages are dispatched (immutable).
pub struct ModuleRegistry<D: Details> {
    modules: HashMap<String, Arc<dyn Module<D>>>,
}

impl<D: Details> ModuleRegistry<D> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn register(&mut self, module: Arc<dyn Module<D>>) -> Result<(), RcError> {
        let id = module.id().to_string();
        if self.modules.contains_key(&id) {
            return Err(RcError::DuplicateModule(id));
        }
        self.modules.insert(id, module);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Module<D>>> {
        self.modules.get(id).cloned()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.modules.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<D: Details> Default for ModuleRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::RecordingModule;
    use crate::domain::Properties;

    #[test]
    fn register_and_get() {
        let mut registry = ModuleRegistry::<Properties>::new();
        registry.register(Arc::new(RecordingModule::new("moduleA"))).unwrap();

        assert!(registry.get("moduleA").is_some());
        assert!(registry.get("moduleB").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut registry = ModuleRegistry::<Properties>::new();
        registry.register(Arc::new(RecordingModule::new("moduleA"))).unwrap();
        let result = registry.register(Arc::new(RecordingModule::new("moduleA")));

        assert!(matches!(result, Err(RcError::DuplicateModule(id)) if id == "moduleA"));
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = ModuleRegistry::<Properties>::new();
        registry.register(Arc::new(RecordingModule::new("zeta"))).unwrap();
        registry.register(Arc::new(RecordingModule::new("alpha"))).unwrap();

        assert_eq!(registry.ids(), vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
