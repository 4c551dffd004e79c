pub mod etl;
pub mod extract;
pub mod load;
pub mod transform;

pub use crate::domain::model::{RawRecord, TransformedRecord, UserData};
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::Result;
