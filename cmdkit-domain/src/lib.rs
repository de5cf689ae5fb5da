//! 命令分发领域层基础库（cmdkit-domain）
//!
//! 提供会话状态的领域模型与存储协议：
//! - 会话（`session`）：具名计数器、版本号与幂等键记录
//! - 会话存储（`session::SessionStore`）及其内存实现
//! - 实体（`entity`）与值对象（`value_object`）等通用抽象
//!
//! 本 crate 与传输、渲染实现解耦，会话的 cookie 序列化、过期策略等由宿主负责。
//!
pub mod entity;
pub mod error;
pub mod session;
pub mod value_object;
