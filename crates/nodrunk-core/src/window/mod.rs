//! Active time windows: ranges, the evaluator and the range list editor.

mod book;
mod policy;
mod range;

pub use book::RangeBook;
pub use policy::{TimeWindowPolicy, WindowConfig};
pub use range::{TimeOfDay, TimeRange};
