//! Layer model, random selection and population.

pub mod layer;
pub mod selector;
pub mod store;

pub use layer::Layer;
pub use selector::{RandomSelector, UsedIndexSet};
pub use store::{LayerPlan, LayerStore, PopulateParams};
