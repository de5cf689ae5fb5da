//! 会话计数命令
//!
//! 由带有 `data-command="CounterCommand#increment"` 的元素触发，
//! 将会话中的 `count` 加一，并完全接管响应（阻止宿主的默认处理）。

use crate::{
    command_context::CommandContext, command_handler::CommandHandler, error::AppError,
    registry::CommandRegistry,
};
use async_trait::async_trait;
use cmdkit_domain::session::COUNT;
use cmdkit_macros::command;
use std::sync::Arc;

#[command(name = "CounterCommand#increment", prevent_default)]
pub struct Increment {}

pub struct IncrementHandler;

#[async_trait]
impl CommandHandler<Increment> for IncrementHandler {
    async fn handle(&self, ctx: &mut CommandContext, _cmd: Increment) -> Result<(), AppError> {
        let count = ctx.session_mut().increment(COUNT)?;
        ctx.state_mut().insert(COUNT.to_string(), count.into());
        tracing::trace!(target: "cmdkit::dispatch", count, "counter incremented");
        Ok(())
    }
}

/// 注册计数相关命令
pub fn register_counter_commands(registry: &CommandRegistry) -> Result<(), AppError> {
    registry.register::<Increment, _>(Arc::new(IncrementHandler))
}
