use crate::{
    command::CommandId,
    command_bus::{CommandBus, DispatchOutcome},
    command_context::CommandContext,
    config::DispatcherConfig,
    context::AppContext,
    error::AppError,
    invocation::CommandInvocation,
    registry::{CommandRegistry, RegisteredCommand},
};
use async_trait::async_trait;
use cmdkit_domain::entity::Entity;
use cmdkit_domain::session::{SessionId, SessionStore, SessionStoreExt};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::Instrument;

/// 会话锁租约
///
/// 释放时（包括分发被取消）先解锁，再在无人持有或等待时回收锁表条目，
/// 锁表不会随会话数无限增长。
struct SessionLease<'a> {
    locks: &'a DashMap<SessionId, Arc<Mutex<()>>>,
    id: SessionId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

// 幂等键按命令区分，同一键用于不同命令时互不影响
fn idempotency_scope(command: &CommandId, key: &str) -> String {
    format!("{command}\u{0}{key}")
}

/// 进程内命令分发器
/// - 通过 `CommandRegistry` 按标识解析处理器
/// - 同一会话的分发串行执行（按会话加锁），不同会话互不阻塞
/// - 处理器成功后才保存会话；失败时丢弃修改并原样返回错误
pub struct CommandDispatcher<S> {
    registry: Arc<CommandRegistry>,
    store: S,
    config: DispatcherConfig,
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl<S> CommandDispatcher<S>
where
    S: SessionStore,
{
    pub fn new(registry: Arc<CommandRegistry>, store: S) -> Self {
        Self::with_config(registry, store, DispatcherConfig::default())
    }

    pub fn with_config(registry: Arc<CommandRegistry>, store: S, config: DispatcherConfig) -> Self {
        Self {
            registry,
            store,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    async fn lock_session(&self, id: &SessionId) -> Result<SessionLease<'_>, AppError> {
        let lock = self.locks.entry(id.clone()).or_default().clone();
        let mut lease = SessionLease {
            locks: &self.locks,
            id: id.clone(),
            guard: None,
        };

        let guard = match self.config.session_lock_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, lock.lock_owned())
                .await
                .map_err(|_| AppError::SessionBusy {
                    session: id.to_string(),
                })?,
            None => lock.lock_owned().await,
        };
        lease.guard = Some(guard);
        Ok(lease)
    }

    async fn perform(
        &self,
        ctx: &AppContext,
        registered: &RegisteredCommand,
        invocation: CommandInvocation,
    ) -> Result<DispatchOutcome, AppError> {
        let CommandInvocation {
            command,
            session_id,
            params,
            element,
        } = invocation;

        let session = self.store.load_or_new(&session_id).await?;

        let idempotency_key = ctx
            .idempotency_key
            .as_deref()
            .filter(|_| self.config.idempotency_capacity > 0)
            .map(|key| idempotency_scope(&command, key));

        if let Some(key) = idempotency_key.as_deref() {
            if session.has_processed(key) {
                tracing::debug!(
                    target: "cmdkit::dispatch",
                    idempotency_key = ctx.idempotency_key.as_deref(),
                    "duplicate submission, skipping handler"
                );
                return Ok(DispatchOutcome::Performed {
                    command,
                    prevents_default: registered.prevents_default(),
                    replayed: true,
                });
            }
        }

        let started = Instant::now();
        let mut command_ctx =
            CommandContext::new(ctx.clone(), command.clone(), session, params, element);

        if let Err(err) = registered.invoke(&mut command_ctx).await {
            tracing::warn!(target: "cmdkit::dispatch", error = %err, "command failed");
            return Err(err);
        }

        let mut session = command_ctx.into_session();
        if let Some(key) = idempotency_key {
            session.remember_processed(key, self.config.idempotency_capacity);
        }
        let saved = self.store.save(&session).await?;

        tracing::debug!(
            target: "cmdkit::dispatch",
            version = saved.version(),
            elapsed = ?started.elapsed(),
            prevents_default = registered.prevents_default(),
            "command performed"
        );

        Ok(DispatchOutcome::Performed {
            command,
            prevents_default: registered.prevents_default(),
            replayed: false,
        })
    }
}

#[async_trait]
impl<S> CommandBus for CommandDispatcher<S>
where
    S: SessionStore,
{
    async fn dispatch(
        &self,
        ctx: &AppContext,
        invocation: CommandInvocation,
    ) -> Result<DispatchOutcome, AppError> {
        let registered = match self.registry.resolve(invocation.command.as_str()) {
            Ok(registered) => registered,
            Err(AppError::HandlerNotFound(_)) => {
                tracing::debug!(
                    target: "cmdkit::dispatch",
                    command = %invocation.command,
                    "command not registered, falling through"
                );
                return Ok(DispatchOutcome::NotFound {
                    command: invocation.command,
                });
            }
            Err(err) => return Err(err),
        };

        let span = tracing::debug_span!(
            target: "cmdkit::dispatch",
            "dispatch",
            command = invocation.command.command_name(),
            method = invocation.command.method(),
            session = %invocation.session_id,
            correlation_id = ctx.correlation_id.as_deref(),
            actor_id = ctx.actor_id.as_deref(),
        );

        let _lease = self.lock_session(&invocation.session_id).await?;
        self.perform(ctx, &registered, invocation)
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::register_counter_commands;
    use cmdkit_domain::session::{COUNT, InMemorySessionStore};

    fn dispatcher() -> CommandDispatcher<Arc<InMemorySessionStore>> {
        let registry = Arc::new(CommandRegistry::new());
        register_counter_commands(&registry).unwrap();
        CommandDispatcher::new(registry, Arc::new(InMemorySessionStore::new()))
    }

    fn increment(session: &str) -> CommandInvocation {
        CommandInvocation::builder()
            .command("CounterCommand#increment".parse().unwrap())
            .session_id(session.parse().unwrap())
            .build()
    }

    #[tokio::test]
    async fn lock_table_is_released_after_dispatch() {
        let d = dispatcher();
        d.dispatch(&AppContext::default(), increment("s-1"))
            .await
            .unwrap();
        assert!(d.locks.is_empty());
    }

    #[tokio::test]
    async fn busy_session_times_out() {
        let registry = Arc::new(CommandRegistry::new());
        register_counter_commands(&registry).unwrap();
        let d = CommandDispatcher::with_config(
            registry,
            Arc::new(InMemorySessionStore::new()),
            DispatcherConfig {
                session_lock_timeout_ms: Some(20),
                ..Default::default()
            },
        );

        let sid: SessionId = "s-busy".parse().unwrap();
        let held = d.lock_session(&sid).await.unwrap();

        let err = d
            .dispatch(&AppContext::default(), increment("s-busy"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SessionBusy { session } if session == "s-busy"));

        drop(held);
        d.dispatch(&AppContext::default(), increment("s-busy"))
            .await
            .unwrap();
        let session = d.store().load(&sid).await.unwrap().unwrap();
        assert_eq!(session.counter(COUNT), 1);
    }

    #[tokio::test]
    async fn replay_with_same_idempotency_key_does_not_increment() {
        let d = dispatcher();
        let ctx = AppContext::builder()
            .idempotency_key("submit-1".to_string())
            .build();

        let first = d.dispatch(&ctx, increment("s-2")).await.unwrap();
        let second = d.dispatch(&ctx, increment("s-2")).await.unwrap();

        assert!(matches!(first, DispatchOutcome::Performed { replayed: false, .. }));
        assert!(matches!(second, DispatchOutcome::Performed { replayed: true, .. }));
        assert!(!second.should_continue());

        let sid: SessionId = "s-2".parse().unwrap();
        let session = d.store().load(&sid).await.unwrap().unwrap();
        assert_eq!(session.counter(COUNT), 1);
        assert_eq!(session.version(), 1);
    }

    #[tokio::test]
    async fn idempotency_disabled_by_zero_capacity() {
        let registry = Arc::new(CommandRegistry::new());
        register_counter_commands(&registry).unwrap();
        let d = CommandDispatcher::with_config(
            registry,
            Arc::new(InMemorySessionStore::new()),
            DispatcherConfig {
                idempotency_capacity: 0,
                ..Default::default()
            },
        );
        let ctx = AppContext::builder()
            .idempotency_key("submit-1".to_string())
            .build();

        d.dispatch(&ctx, increment("s-3")).await.unwrap();
        d.dispatch(&ctx, increment("s-3")).await.unwrap();

        let sid: SessionId = "s-3".parse().unwrap();
        let session = d.store().load(&sid).await.unwrap().unwrap();
        assert_eq!(session.counter(COUNT), 2);
    }

    #[tokio::test]
    async fn cancelled_dispatch_releases_its_lock() {
        let registry = Arc::new(CommandRegistry::new());
        registry
            .register_fn("Slow#run", false, |_ctx| {
                Box::pin(async {
                    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                    Ok(())
                })
            })
            .unwrap();
        let d = Arc::new(CommandDispatcher::new(
            registry,
            Arc::new(InMemorySessionStore::new()),
        ));

        let mut handles = Vec::new();
        for i in 0..20 {
            let d = d.clone();
            let invocation = CommandInvocation::builder()
                .command("Slow#run".parse().unwrap())
                .session_id(format!("s-slow-{i}").parse().unwrap())
                .build();
            handles.push(tokio::spawn(async move {
                d.dispatch(&AppContext::default(), invocation).await
            }));
        }

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(d.locks.len(), 20);

        for handle in handles {
            handle.abort();
            assert!(handle.await.unwrap_err().is_cancelled());
        }
        assert!(d.locks.is_empty());
    }

    #[tokio::test]
    async fn idempotency_keys_are_scoped_per_command() {
        let d = dispatcher();
        d.registry()
            .register_fn("Audit#touch", false, |ctx| {
                Box::pin(async move {
                    ctx.session_mut().increment("audits")?;
                    Ok::<_, AppError>(())
                })
            })
            .unwrap();
        let ctx = AppContext::builder().idempotency_key("k".to_string()).build();

        let audit = d
            .dispatch(
                &ctx,
                CommandInvocation::builder()
                    .command("Audit#touch".parse().unwrap())
                    .session_id("s-x".parse().unwrap())
                    .build(),
            )
            .await
            .unwrap();
        let counted = d.dispatch(&ctx, increment("s-x")).await.unwrap();

        assert!(matches!(audit, DispatchOutcome::Performed { replayed: false, .. }));
        assert!(matches!(counted, DispatchOutcome::Performed { replayed: false, .. }));

        let sid: SessionId = "s-x".parse().unwrap();
        let session = d.store().load(&sid).await.unwrap().unwrap();
        assert_eq!(session.counter("audits"), 1);
        assert_eq!(session.counter(COUNT), 1);

        let again = d.dispatch(&ctx, increment("s-x")).await.unwrap();
        assert!(matches!(again, DispatchOutcome::Performed { replayed: true, .. }));
    }
}
