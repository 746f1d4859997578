pub mod cell;
pub mod creative;
pub mod performance;

pub use cell::{Cell, RawRow};
pub use creative::CreativeRecord;
pub use performance::PerformanceRecord;
