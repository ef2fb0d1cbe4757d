//! Endpoints that write to the stores on purpose. Liveness probes never do.


pub use self::mysql::test_mysql_handler;
pub use self::redis::test_redis_handler;
