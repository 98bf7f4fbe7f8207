// Adapters
// データベース、外部プロセス、HTTPリスナーへのアクセスを抽象化

pub mod connection_string;
pub mod database;
pub mod database_migrator;
pub mod placeholder_server;
pub mod process_runner;
