//! 请求拦截管线
//!
//! 在宿主的默认请求处理之前依次运行拦截器，任一拦截器返回 `Flow::Halt` 即短路，
//! 默认处理不再执行。`CommandInterceptor` 负责在此处分发请求携带的命令。

use crate::{
    command::CommandId,
    command_bus::CommandBus,
    context::AppContext,
    error::AppError,
    invocation::{CommandInvocation, Element, Params},
};
use async_trait::async_trait;
use bon::Builder;
use cmdkit_domain::session::SessionId;
use std::future::Future;
use std::sync::Arc;

/// 进入管线的请求（与传输无关）
#[derive(Builder, Debug, Clone)]
pub struct InboundRequest {
    pub session_id: SessionId,
    /// 请求携带的命令标识，普通请求为空
    pub command: Option<CommandId>,
    #[builder(default)]
    pub params: Params,
    pub element: Option<Element>,
}

impl InboundRequest {
    /// 转换为命令调用；未携带命令时返回 `None`
    pub fn invocation(&self) -> Option<CommandInvocation> {
        let command = self.command.clone()?;
        Some(CommandInvocation {
            command,
            session_id: self.session_id.clone(),
            params: self.params.clone(),
            element: self.element.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn before(&self, ctx: &AppContext, request: &InboundRequest) -> Result<Flow, AppError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// 分发请求中的命令；命令阻止默认处理时返回 `Halt`
pub struct CommandInterceptor {
    bus: Arc<dyn CommandBus>,
}

impl CommandInterceptor {
    pub fn new(bus: Arc<dyn CommandBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl Interceptor for CommandInterceptor {
    async fn before(&self, ctx: &AppContext, request: &InboundRequest) -> Result<Flow, AppError> {
        let Some(invocation) = request.invocation() else {
            return Ok(Flow::Continue);
        };

        let outcome = self.bus.dispatch(ctx, invocation).await?;
        Ok(if outcome.should_continue() {
            Flow::Continue
        } else {
            Flow::Halt
        })
    }

    fn name(&self) -> &str {
        "command"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome<T> {
    /// 被拦截器短路，默认处理未执行
    Halted { by: String },
    /// 默认处理已执行
    Completed(T),
}

impl<T> PipelineOutcome<T> {
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(v) => Some(v),
            Self::Halted { .. } => None,
        }
    }
}

#[derive(Default, Clone)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// 依次运行拦截器，全部放行后执行默认处理
    pub async fn run<T, F, Fut>(
        &self,
        ctx: &AppContext,
        request: InboundRequest,
        default_action: F,
    ) -> Result<PipelineOutcome<T>, AppError>
    where
        F: FnOnce(InboundRequest) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        for interceptor in &self.interceptors {
            if interceptor.before(ctx, &request).await? == Flow::Halt {
                tracing::debug!(
                    target: "cmdkit::pipeline",
                    interceptor = interceptor.name(),
                    session = %request.session_id,
                    "default handling prevented"
                );
                return Ok(PipelineOutcome::Halted {
                    by: interceptor.name().to_string(),
                });
            }
        }

        default_action(request).await.map(PipelineOutcome::Completed)
    }
}
