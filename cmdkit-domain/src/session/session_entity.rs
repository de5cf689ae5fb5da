use super::SessionId;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// 会话（Session）
///
/// 按客户端划分、跨请求持久化的状态，持有若干具名计数器。
/// - 首次交互时创建（存储中不存在即视为新会话）；
/// - 过期由外部管理，失效时由存储销毁；
/// - `version` 记录成功持久化的次数，用于乐观并发控制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    version: usize,
    counters: BTreeMap<String, u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    recent_idempotency_keys: VecDeque<String>,
}

impl Entity for Session {
    type Id = SessionId;

    fn new(id: Self::Id) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: 0,
            counters: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            recent_idempotency_keys: VecDeque::new(),
        }
    }

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> usize {
        self.version
    }
}

impl Session {
    /// 以给定计数器值构造（用于从外部恢复既有状态）
    pub fn with_counter(mut self, name: impl Into<String>, value: u64) -> Self {
        self.counters.insert(name.into(), value);
        self
    }

    /// 读取计数器，不存在时视为 0
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// 计数器自增 1，返回自增后的值
    ///
    /// 溢出时返回 `InvalidState`，计数器保持原值。
    pub fn increment(&mut self, name: &str) -> DomainResult<u64> {
        let current = self.counter(name);
        let next = current
            .checked_add(1)
            .ok_or_else(|| DomainError::InvalidState {
                reason: format!("counter '{name}' overflowed at {current}"),
            })?;
        self.counters.insert(name.to_string(), next);
        Ok(next)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 是否为尚未持久化的新会话
    pub fn is_new(&self) -> bool {
        self.version == 0
    }

    /// 幂等键是否已被处理过
    pub fn has_processed(&self, idempotency_key: &str) -> bool {
        self.recent_idempotency_keys
            .iter()
            .any(|k| k == idempotency_key)
    }

    /// 记录已处理的幂等键，仅保留最近 `capacity` 个
    pub fn remember_processed(&mut self, idempotency_key: impl Into<String>, capacity: usize) {
        if capacity == 0 {
            return;
        }
        self.recent_idempotency_keys.push_back(idempotency_key.into());
        while self.recent_idempotency_keys.len() > capacity {
            self.recent_idempotency_keys.pop_front();
        }
    }

    // 仅由存储在持久化成功后调用
    pub(crate) fn mark_saved(&mut self, version: usize, at: DateTime<Utc>) {
        self.version = version;
        self.updated_at = at;
    }
}
