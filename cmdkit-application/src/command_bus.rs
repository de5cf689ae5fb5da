use crate::{command::CommandId, context::AppContext, error::AppError, invocation::CommandInvocation};
use async_trait::async_trait;
use std::sync::Arc;

/// 分发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 命令已执行（或因幂等键命中而重放）
    Performed {
        command: CommandId,
        prevents_default: bool,
        replayed: bool,
    },
    /// 未注册的命令，会话未被读取或修改
    NotFound { command: CommandId },
}

impl DispatchOutcome {
    pub fn command(&self) -> &CommandId {
        match self {
            Self::Performed { command, .. } | Self::NotFound { command } => command,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 宿主是否应继续默认处理
    ///
    /// 未注册的命令不阻止；已执行的命令按其 `prevents_default` 决定。
    pub fn should_continue(&self) -> bool {
        match self {
            Self::Performed {
                prevents_default, ..
            } => !prevents_default,
            Self::NotFound { .. } => true,
        }
    }
}

/// 命令总线（Command Bus）
///
/// - 根据命令标识路由到对应的处理器，并注入调用方会话；
/// - 框架可提供不同实现（如进程内、消息队列等）。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 分发命令到对应处理器
    ///
    /// - `ctx`：应用上下文（链路追踪、幂等键等）
    /// - `invocation`：命令标识、目标会话与参数
    async fn dispatch(
        &self,
        ctx: &AppContext,
        invocation: CommandInvocation,
    ) -> Result<DispatchOutcome, AppError>;
}

#[async_trait]
impl<T> CommandBus for Arc<T>
where
    T: CommandBus + ?Sized,
{
    async fn dispatch(
        &self,
        ctx: &AppContext,
        invocation: CommandInvocation,
    ) -> Result<DispatchOutcome, AppError> {
        (**self).dispatch(ctx, invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CommandId {
        s.parse().unwrap()
    }

    #[test]
    fn not_found_continues() {
        let outcome = DispatchOutcome::NotFound {
            command: id("Unknown#foo"),
        };
        assert!(outcome.is_not_found());
        assert!(outcome.should_continue());
        assert_eq!(outcome.command().as_str(), "Unknown#foo");
    }

    #[test]
    fn performed_follows_prevents_default() {
        let halted = DispatchOutcome::Performed {
            command: id("CounterCommand#increment"),
            prevents_default: true,
            replayed: false,
        };
        assert!(!halted.should_continue());

        let passthrough = DispatchOutcome::Performed {
            command: id("Audit#log"),
            prevents_default: false,
            replayed: false,
        };
        assert!(passthrough.should_continue());
        assert!(!passthrough.is_not_found());
    }
}
