//! 会话存储协议
//!
//! 定义会话的读取、保存与销毁接口；具体后端（内存、Redis、cookie 等）由上层实现并注入。
//!
use super::{Session, SessionId};
use crate::entity::Entity;
use crate::error::DomainResult as Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 读取会话，不存在时返回 `None`
    async fn load(&self, id: &SessionId) -> Result<Option<Session>>;

    /// 保存会话并返回持久化后的副本（版本加一）
    ///
    /// 存储中的版本必须与 `session.version()` 一致，否则返回 `VersionConflict`。
    async fn save(&self, session: &Session) -> Result<Session>;

    /// 销毁会话（会话失效），返回是否存在
    async fn destroy(&self, id: &SessionId) -> Result<bool>;
}

#[async_trait]
impl<T> SessionStore for Arc<T>
where
    T: SessionStore + ?Sized,
{
    async fn load(&self, id: &SessionId) -> Result<Option<Session>> {
        (**self).load(id).await
    }

    async fn save(&self, session: &Session) -> Result<Session> {
        (**self).save(session).await
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool> {
        (**self).destroy(id).await
    }
}

/// 会话存储的便捷扩展
#[async_trait]
pub trait SessionStoreExt: SessionStore {
    /// 读取会话；首次交互（不存在）时返回一个新会话（尚未持久化）
    async fn load_or_new(&self, id: &SessionId) -> Result<Session> {
        Ok(match self.load(id).await? {
            Some(session) => session,
            None => Session::new(id.clone()),
        })
    }
}

impl<T: SessionStore + ?Sized> SessionStoreExt for T {}
