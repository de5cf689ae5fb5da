use cmdkit_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("invalid params: command={command}, reason={reason}")]
    InvalidParams { command: String, reason: String },

    #[error("handler not found: {0}")]
    HandlerNotFound(String),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: String },

    #[error("handler failed: command={command}, reason={reason}")]
    Handler { command: String, reason: String },

    #[error("session busy: {session}")]
    SessionBusy { session: String },

    #[error("config: {0}")]
    Config(String),
}

impl AppError {
    /// 以命令标识包装处理器内部的失败原因
    pub fn handler(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::Handler {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}
