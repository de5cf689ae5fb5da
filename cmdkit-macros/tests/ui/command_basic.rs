use cmdkit_application::command::Command;
use cmdkit_macros::command;

#[command(name = "CounterCommand#increment", prevent_default)]
struct Increment {}

#[command(name = "Greeter#hello")]
struct Hello {
    name: String,
}

#[command(name = "Toggle#flip", prevent_default = false)]
#[derive(Clone)]
struct Flip {
    #[serde(default)]
    times: u32,
}

fn main() {
    assert_eq!(Increment::NAME, "CounterCommand#increment");
    assert!(Increment::PREVENTS_DEFAULT);

    assert_eq!(Hello::NAME, "Greeter#hello");
    assert!(!Hello::PREVENTS_DEFAULT);

    assert!(!Flip::PREVENTS_DEFAULT);

    // 派生的 Debug 可用
    let _ = format!("{:?}", Increment {});
    let hello = Hello { name: "a".into() };
    let _ = format!("{:?}", hello.name);
    let flip = Flip { times: 2 }.clone();
    let _ = flip.times;
}
