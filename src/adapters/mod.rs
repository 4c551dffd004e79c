// Adapters layer: concrete collaborators around the pipeline core.

pub mod generator;
pub mod sqlite;

pub use generator::RecordGenerator;
pub use sqlite::StoreInitializer;
