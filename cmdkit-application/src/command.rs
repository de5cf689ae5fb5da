use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// 应用层命令（Command）
///
/// 由客户端元素触发（如 `data-command="CounterCommand#increment"`）、在服务端执行的写操作。
/// - 不返回业务数据，仅表达执行结果（成功/失败）；
/// - 请求参数以对象形式反序列化为命令实例；
/// - 通常通过 `#[command(...)]` 宏实现。
///
/// 关联常量：
/// - `NAME`：命令的稳定标识，用于路由与日志，约定为 `"<CommandName>#<method>"`。
/// - `PREVENTS_DEFAULT`：执行成功后是否阻止宿主的默认处理（命令完全接管响应）。
pub trait Command: DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;

    const PREVENTS_DEFAULT: bool = false;
}

/// 命令标识
///
/// 不透明字符串，按精确匹配（区分大小写）解析；
/// 约定形如 `"<CommandName>#<method>"`，可通过 `command_name`/`method` 拆分查看。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandId(String);

impl CommandId {
    pub fn new(id: impl Into<String>) -> Result<Self, AppError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::Validation("command identifier must not be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `#` 之前的部分；无 `#` 时为整个标识
    pub fn command_name(&self) -> &str {
        self.0.split_once('#').map_or(self.0.as_str(), |(name, _)| name)
    }

    /// `#` 之后的部分
    pub fn method(&self) -> Option<&str> {
        self.0.split_once('#').map(|(_, method)| method)
    }
}

impl TryFrom<String> for CommandId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandId> for String {
    fn from(id: CommandId) -> Self {
        id.0
    }
}

impl FromStr for CommandId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Borrow<str> for CommandId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
