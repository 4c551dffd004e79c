pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{EtlConfig, TomlConfig};

pub use adapters::{RecordGenerator, StoreInitializer};
pub use crate::core::{
    etl::{EtlEngine, RunReport},
    extract::Extractor,
    load::{LoadOutcome, Loader},
    transform::TransformExt,
};
pub use utils::error::{EtlError, Result};
