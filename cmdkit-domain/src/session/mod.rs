//! 会话（Session）与计数器
//!
//! - `Session`：按客户端划分的具名计数器集合，带版本号；
//! - `SessionStore`：会话读写协议，`InMemorySessionStore` 为内存实现；
//! - `Session::increment` 为唯一的领域逻辑：读取计数（缺省为 0），写回加一后的值。

mod session_entity;
mod session_id;
mod store;
mod store_inmemory;

pub use session_entity::Session;
pub use session_id::SessionId;
pub use store::{SessionStore, SessionStoreExt};
pub use store_inmemory::InMemorySessionStore;

/// 计数命令使用的计数器名称
pub const COUNT: &str = "count";
