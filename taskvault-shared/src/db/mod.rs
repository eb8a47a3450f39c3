/// Database layer for taskvault
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded migration runner

pub mod migrations;
pub mod pool;
