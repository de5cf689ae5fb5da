use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次命令分发所需的横切信息，例如：
/// - 关联追踪 `correlation_id`、执行者 `actor_id`：写入日志字段；
/// - 幂等键（`idempotency_key`）：同一会话内重复提交的同一键不会再次执行命令。
///
/// 典型用法：
/// ```rust
/// use cmdkit_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".to_string())
///     .idempotency_key("idem-xyz".to_string())
///     .build();
/// assert_eq!(ctx.idempotency_key.as_deref(), Some("idem-xyz"));
/// assert!(ctx.actor_id.is_none());
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 关联 ID（链路追踪）
    pub correlation_id: Option<String>,
    /// 执行者 ID（审计）
    pub actor_id: Option<String>,
    /// 幂等键（可选）：为空则每次分发都会执行
    pub idempotency_key: Option<String>,
}
