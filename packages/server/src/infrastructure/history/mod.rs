//! 履歴ストアの実装
//!
//! - `inmemory`: プロセス内に保持する上限付きの履歴

pub mod inmemory;

pub use inmemory::InMemoryHistoryStore;
