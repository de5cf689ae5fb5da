use crate::command::CommandId;
use bon::Builder;
use cmdkit_domain::session::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 命令参数（对象形式）
pub type Params = serde_json::Map<String, serde_json::Value>;

/// 触发命令的页面元素描述
///
/// 仅携带元素的标识、标签名与属性，不涉及任何 DOM 操作。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// `data-*` 属性，`key` 不含 `data-` 前缀
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attribute(&format!("data-{key}"))
    }
}

/// 一次命令调用
///
/// 每个请求创建一次，由分发器立即消费，不做持久化。
#[derive(Builder, Debug, Clone)]
pub struct CommandInvocation {
    pub command: CommandId,
    pub session_id: SessionId,
    #[builder(default)]
    pub params: Params,
    pub element: Option<Element>,
}
