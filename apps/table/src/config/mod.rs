pub mod table;

pub use table::{ConfigError, StoreKind, TableConfig};
