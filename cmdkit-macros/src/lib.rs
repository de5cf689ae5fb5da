use proc_macro::TokenStream;

mod command;
mod utils;

/// 命令宏
/// - 为具名字段结构体实现 `::cmdkit_application::command::Command`
/// - 追加 `Debug` 与 `serde::Deserialize` 派生（若缺失），请求参数据此反序列化为命令
/// - 参数：
///   - `name = "..."`：命令标识（必填），约定为 `"<CommandName>#<method>"`
///   - `prevent_default` / `prevent_default = true|false`：执行后是否阻止宿主的默认处理（默认 false）
///
/// ```ignore
/// #[command(name = "CounterCommand#increment", prevent_default)]
/// pub struct Increment {}
/// ```
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}
