//! 内存版会话存储（InMemorySessionStore）
//!
//! 基于 `DashMap` 的会话存储，满足 `SessionStore` 协议：
//! - `save` 按版本做乐观并发校验；
//! - 典型用途：测试环境、示例与本地开发。
//!
use super::{Session, SessionId, SessionStore};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前持有的会话数量
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|s| s.clone()))
    }

    async fn save(&self, session: &Session) -> Result<Session> {
        let expected = session.version();

        let mut saved = session.clone();
        match self.sessions.entry(session.id().clone()) {
            Entry::Occupied(mut occupied) => {
                let actual = occupied.get().version();
                if actual != expected {
                    return Err(DomainError::VersionConflict {
                        session: session.id().to_string(),
                        expected,
                        actual,
                    });
                }
                saved.mark_saved(expected + 1, Utc::now());
                occupied.insert(saved.clone());
            }
            Entry::Vacant(vacant) => {
                if expected != 0 {
                    return Err(DomainError::VersionConflict {
                        session: session.id().to_string(),
                        expected,
                        actual: 0,
                    });
                }
                saved.mark_saved(1, Utc::now());
                vacant.insert(saved.clone());
            }
        }

        tracing::trace!(
            target: "cmdkit::session",
            session = %saved.id(),
            version = saved.version(),
            "session saved"
        );
        Ok(saved)
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool> {
        let existed = self.sessions.remove(id).is_some();
        if existed {
            tracing::debug!(target: "cmdkit::session", session = %id, "session destroyed");
        }
        Ok(existed)
    }
}
