pub mod health_checks;
pub mod status;
pub(crate) mod test;
pub mod visitors;

pub use health_checks::*;
pub use status::*;
pub use test::{test_mysql_handler, test_redis_handler};
pub use visitors::*;
