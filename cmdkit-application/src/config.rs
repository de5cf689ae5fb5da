use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// 分发器配置
///
/// 可由 TOML 解析，缺省字段取默认值：
///
/// ```toml
/// session_lock_timeout_ms = 5000
/// idempotency_capacity = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// 等待会话锁的最长时间（毫秒），为空或 0 则一直等待
    pub session_lock_timeout_ms: Option<u64>,
    /// 每个会话记住的最近幂等键数量，0 表示不做幂等去重
    pub idempotency_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            session_lock_timeout_ms: Some(5_000),
            idempotency_capacity: 32,
        }
    }
}

impl DispatcherConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        toml::from_str(s).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn session_lock_timeout(&self) -> Option<Duration> {
        self.session_lock_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = DispatcherConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DispatcherConfig::default());
        assert_eq!(cfg.session_lock_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = DispatcherConfig::from_toml_str(
            "session_lock_timeout_ms = 250\nidempotency_capacity = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.session_lock_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cfg.idempotency_capacity, 0);

        let cfg = DispatcherConfig::from_toml_str("session_lock_timeout_ms = 0").unwrap();
        assert_eq!(cfg.session_lock_timeout(), None);
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let err = DispatcherConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
