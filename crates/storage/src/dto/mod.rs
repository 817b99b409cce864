pub mod common;
pub mod view;

pub use common::{PageMeta, Pagination, ResultPage};
pub use view::{ResultKey, ResultQuery, ResultView};
