//! 命令分发应用层（cmdkit-application）
//!
//! - 命令（`command`）与处理器（`command_handler`）的协议定义
//! - 命令注册表（`registry`）：按标识登记、解析处理器
//! - 分发器（`dispatcher`）：注入会话、执行命令、决定是否阻止默认处理
//! - 拦截管线（`interceptor`）：在宿主默认处理前运行命令分发
//! - 内置的会话计数命令（`counter`）
//!
pub mod command;
pub mod command_bus;
pub mod command_context;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod counter;
pub mod dispatcher;
pub mod error;
pub mod interceptor;
pub mod invocation;
pub mod registry;

pub use dispatcher::CommandDispatcher;
pub use registry::CommandRegistry;

// 允许在本 crate 内部通过 ::cmdkit_application 进行自引用，
// 以便 #[command] 宏在本 crate 中也能解析到 ::cmdkit_application 路径。
extern crate self as cmdkit_application;
