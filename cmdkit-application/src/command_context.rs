use crate::command::CommandId;
use crate::context::AppContext;
use crate::error::AppError;
use crate::invocation::{Element, Params};
use cmdkit_domain::session::Session;
use serde::de::DeserializeOwned;

/// 命令执行上下文
///
/// 由分发器为每次执行构造，显式注入会话、参数、触发元素与临时状态。
/// 处理器对会话的修改仅在执行成功后才会被保存。
#[derive(Debug)]
pub struct CommandContext {
    app: AppContext,
    command: CommandId,
    session: Session,
    params: Params,
    element: Option<Element>,
    state: Params,
}

impl CommandContext {
    pub fn new(
        app: AppContext,
        command: CommandId,
        session: Session,
        params: Params,
        element: Option<Element>,
    ) -> Self {
        Self {
            app,
            command,
            session,
            params,
            element,
            state: Params::new(),
        }
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn command(&self) -> &CommandId {
        &self.command
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// 读取单个参数并反序列化，不存在时返回 `None`
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.params
            .get(key)
            .map(|v| {
                serde_json::from_value(v.clone()).map_err(|e| AppError::InvalidParams {
                    command: self.command.to_string(),
                    reason: format!("{key}: {e}"),
                })
            })
            .transpose()
    }

    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// 临时状态：仅在本次执行内有效，不会持久化
    pub fn state(&self) -> &Params {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut Params {
        &mut self.state
    }

    pub(crate) fn into_session(self) -> Session {
        self.session
    }
}
