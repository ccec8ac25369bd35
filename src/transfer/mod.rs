//! Paste engine: a `TransferBatch` drives one `TransferItem` per source.

pub mod batch;
pub mod item;
pub mod options;
pub mod policy;

pub use batch::{BatchReport, TransferBatch};
pub use item::{Attempt, TransferItem};
pub use options::{ItemContext, TransferOptions};
pub use policy::{CollisionPolicy, ErrorSolution, ItemState};
