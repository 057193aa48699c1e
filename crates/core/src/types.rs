/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// On-chain membership id. Members are keyed by their chain id, not a serial.
pub type MemberId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
