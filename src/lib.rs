pub mod compress;
pub mod generate;
pub mod output;
pub mod record;

pub use generate::{GenerationReport, GeneratorConfig, Tally, generate, generate_with_rng};
pub use record::{Record, VOCABULARY};
