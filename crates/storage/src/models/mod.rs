pub mod person;
pub mod timing_row;

pub use person::Person;
pub use timing_row::{TimingRow, UNRANKED};
