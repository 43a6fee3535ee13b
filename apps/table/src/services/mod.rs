pub mod table_flow;

pub use table_flow::{open_table, MoveOutcome, TableSession};
