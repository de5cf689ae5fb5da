use crate::{
    command::{Command, CommandId},
    command_context::CommandContext,
    command_handler::CommandHandler,
    error::AppError,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type CmdHandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>>;

pub type CmdHandlerFn =
    Arc<dyn for<'a> Fn(&'a mut CommandContext) -> CmdHandlerFuture<'a> + Send + Sync>;

// 通过泛型约束固定闭包签名（高阶生命周期），再擦除为 trait object
fn handler_fn<F>(f: F) -> CmdHandlerFn
where
    F: for<'a> Fn(&'a mut CommandContext) -> CmdHandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 已注册的命令：标识、是否阻止默认处理与类型擦除后的处理函数
#[derive(Clone)]
pub struct RegisteredCommand {
    id: CommandId,
    prevents_default: bool,
    handler: CmdHandlerFn,
}

impl RegisteredCommand {
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    pub fn prevents_default(&self) -> bool {
        self.prevents_default
    }

    pub async fn invoke(&self, ctx: &mut CommandContext) -> Result<(), AppError> {
        (self.handler)(ctx).await
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("id", &self.id)
            .field("prevents_default", &self.prevents_default)
            .finish_non_exhaustive()
    }
}

/// 命令注册表
/// - 以命令标识（精确匹配、区分大小写）登记处理器
/// - 类型化注册时，请求参数在执行前反序列化为具体命令类型
#[derive(Default)]
pub struct CommandRegistry {
    handlers: DashMap<CommandId, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型化的命令处理器，标识取自 `C::NAME`
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f = handler_fn(move |ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                let params = serde_json::Value::Object(ctx.params().clone());
                let cmd: C =
                    serde_json::from_value(params).map_err(|e| AppError::InvalidParams {
                        command: C::NAME.to_string(),
                        reason: e.to_string(),
                    })?;
                handler.handle(ctx, cmd).await
            })
        });

        self.insert(CommandId::new(C::NAME)?, C::PREVENTS_DEFAULT, f)
    }

    /// 以闭包注册处理器
    ///
    /// ```rust
    /// use cmdkit_application::registry::CommandRegistry;
    ///
    /// let registry = CommandRegistry::new();
    /// registry
    ///     .register_fn("Echo#run", false, |ctx| {
    ///         Box::pin(async move {
    ///             let echoed = ctx.params().clone();
    ///             ctx.state_mut().extend(echoed);
    ///             Ok(())
    ///         })
    ///     })
    ///     .unwrap();
    /// assert!(registry.contains("Echo#run"));
    /// ```
    pub fn register_fn<F>(
        &self,
        identifier: &str,
        prevents_default: bool,
        handler: F,
    ) -> Result<(), AppError>
    where
        F: for<'a> Fn(&'a mut CommandContext) -> CmdHandlerFuture<'a> + Send + Sync + 'static,
    {
        self.insert(CommandId::new(identifier)?, prevents_default, handler_fn(handler))
    }

    fn insert(
        &self,
        id: CommandId,
        prevents_default: bool,
        handler: CmdHandlerFn,
    ) -> Result<(), AppError> {
        match self.handlers.entry(id) {
            Entry::Occupied(occupied) => Err(AppError::AlreadyRegisteredCommand {
                command: occupied.key().to_string(),
            }),
            Entry::Vacant(vacant) => {
                tracing::debug!(
                    target: "cmdkit::registry",
                    command = %vacant.key(),
                    prevents_default,
                    "command registered"
                );
                let id = vacant.key().clone();
                vacant.insert(RegisteredCommand {
                    id,
                    prevents_default,
                    handler,
                });
                Ok(())
            }
        }
    }

    /// 按标识解析处理器，未注册时返回 `HandlerNotFound`
    pub fn resolve(&self, identifier: &str) -> Result<RegisteredCommand, AppError> {
        self.handlers
            .get(identifier)
            .map(|e| e.value().clone())
            .ok_or_else(|| AppError::HandlerNotFound(identifier.to_string()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.handlers.contains_key(identifier)
    }

    /// 已注册的命令标识（按字典序）
    pub fn registered_commands(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.handlers.iter().map(|e| e.key().to_string()).collect();
        ids.sort_unstable();
        ids
    }
}
