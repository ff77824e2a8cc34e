mod common;
pub use self::common::{PageQuery, Query};
