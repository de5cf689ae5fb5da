use cmdkit_application::command_bus::CommandBus;
use cmdkit_application::context::AppContext;
use cmdkit_application::counter::register_counter_commands;
use cmdkit_application::interceptor::{CommandInterceptor, InboundRequest, Pipeline};
use cmdkit_application::{CommandDispatcher, CommandRegistry};
use cmdkit_domain::session::{COUNT, InMemorySessionStore, SessionId, SessionStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cmdkit=debug")),
        )
        .init();

    let registry = Arc::new(CommandRegistry::new());
    register_counter_commands(&registry)?;

    let store = Arc::new(InMemorySessionStore::new());
    let bus: Arc<dyn CommandBus> = Arc::new(CommandDispatcher::new(registry, store.clone()));
    let pipeline = Pipeline::new().with(Arc::new(CommandInterceptor::new(bus)));

    let session_id = SessionId::generate();
    let ctx = AppContext::builder()
        .correlation_id("cor-1".to_string())
        .build();

    // 按钮点击三次：命令接管响应，默认处理不会执行
    for _ in 0..3 {
        let request = InboundRequest::builder()
            .session_id(session_id.clone())
            .command("CounterCommand#increment".parse()?)
            .build();
        let outcome = pipeline
            .run(&ctx, request, |_req| async { Ok("page rendered") })
            .await?;
        println!("halted={}", outcome.is_halted());
    }

    // 未注册的命令 -> 继续默认处理
    let request = InboundRequest::builder()
        .session_id(session_id.clone())
        .command("Unknown#foo".parse()?)
        .build();
    let outcome = pipeline
        .run(&ctx, request, |_req| async { Ok("page rendered") })
        .await?;
    println!("unknown command -> {:?}", outcome.completed());

    if let Some(session) = store.load(&session_id).await? {
        println!("{COUNT} = {}", session.counter(COUNT));
    }
    Ok(())
}
