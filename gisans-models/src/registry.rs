//! Name-based resolution of sample model providers.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::catalog;
use crate::sample::SampleDescription;
use crate::ModelError;

/// A pure function from azimuthal angle (degrees) to a sample description.
pub type ModelProvider = fn(f64) -> SampleDescription;

static REGISTRY: Lazy<RwLock<HashMap<String, ModelProvider>>> = Lazy::new(|| {
    let mut models: HashMap<String, ModelProvider> = HashMap::new();
    models.insert("silica_100nm_air".to_string(), catalog::silica_100nm_air);
    models.insert("hexagonal_spheres".to_string(), catalog::hexagonal_spheres);
    RwLock::new(models)
});

/// Looks a provider up by model name.
pub fn resolve_model(name: &str) -> Result<ModelProvider, ModelError> {
    let models = REGISTRY.read().expect("model registry poisoned");
    models
        .get(name)
        .copied()
        .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
}

/// Registers an additional provider, replacing any previous entry of the
/// same name.
pub fn register_model(name: &str, provider: ModelProvider) {
    let mut models = REGISTRY.write().expect("model registry poisoned");
    models.insert(name.to_string(), provider);
}

/// Names of all registered models, sorted.
pub fn available_models() -> Vec<String> {
    let models = REGISTRY.read().expect("model registry poisoned");
    let mut names: Vec<String> = models.keys().cloned().collect();
    names.sort();
    names
}
