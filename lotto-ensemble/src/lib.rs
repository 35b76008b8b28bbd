pub mod analysis;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod models;
pub mod progress;
pub mod sampler;
pub mod series;

pub use config::GeneratorConfig;
pub use ensemble::EnsembleGenerator;
pub use error::{EngineError, Result};
pub use series::DrawSeries;
