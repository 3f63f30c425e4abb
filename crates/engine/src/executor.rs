//! Single-call executor.
//!
//! # Stop waiting, not stop working
//!
//! Every invocation runs on its own tokio task while the caller waits on
//! either that task or the context. When the context finishes first the caller
//! gets [`ToolError::Timeout`] right away, but the task is **not aborted**: a
//! tool that never looks at its [`Context`] keeps running until it returns, and
//! its result is dropped. With `cancel_on_timeout` (the default) the tool's
//! context is also cancelled at that moment so tools that watch it can exit.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tools::{Arguments, Context, Registry, Tool, ToolError, ToolSpec};

use crate::config::ExecutorConfig;

/// Run `tool` on its own task and wait for it or for `ctx`, whichever is first.
///
/// The tool receives a clone of `ctx`. A panicking tool is reported as
/// [`ToolError::Execution`].
pub(crate) async fn invoke(
    tool: Arc<dyn Tool>,
    ctx: &Context,
    args: Arguments,
) -> Result<Value, ToolError> {
    let name = tool.name().to_string();
    let started = Instant::now();
    let tool_ctx = ctx.clone();
    let mut task = tokio::spawn(async move { tool.execute(tool_ctx, args).await });

    tokio::select! {
        biased;
        _ = ctx.done() => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::warn!(tool = %name, elapsed_ms, "stopped waiting for tool");
            Err(ToolError::timeout(name, elapsed_ms))
        }
        joined = &mut task => match joined {
            Ok(outcome) => {
                tracing::debug!(
                    tool = %name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    ok = outcome.is_ok(),
                    "tool finished"
                );
                outcome
            }
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool task did not complete");
                Err(ToolError::execution(name, format!("tool task failed: {e}")))
            }
        }
    }
}

/// Looks up one tool by name and runs it under an optional timeout.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<Registry>,
    timeout: Option<Duration>,
    cancel_on_timeout: bool,
}

impl Executor {
    /// Create an executor with no timeout.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            timeout: None,
            cancel_on_timeout: true,
        }
    }

    pub fn from_config(registry: Arc<Registry>, config: &ExecutorConfig) -> Self {
        Self {
            registry,
            timeout: config.timeout(),
            cancel_on_timeout: config.cancel_on_timeout,
        }
    }

    /// Bound every invocation by `timeout`. A zero duration disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn with_cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.cancel_on_timeout = cancel;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Specifications of every registered tool.
    pub async fn specs(&self) -> Vec<ToolSpec> {
        self.registry.specs().await
    }

    /// Execute the tool registered as `name`.
    ///
    /// Returns [`ToolError::NotFound`] without invoking anything if the name is
    /// unknown, [`ToolError::Timeout`] if `ctx` or the configured timeout ends
    /// first, and otherwise exactly what the tool returned.
    pub async fn execute(
        &self,
        ctx: &Context,
        name: &str,
        args: Arguments,
    ) -> Result<Value, ToolError> {
        let Some(tool) = self.registry.get(name).await else {
            tracing::debug!(tool = %name, "tool not found");
            return Err(ToolError::not_found(name));
        };

        // Always a child, so post-hoc cancellation never reaches the caller.
        let call_ctx = match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.child(),
        };

        let outcome = invoke(tool, &call_ctx, args).await;
        if self.cancel_on_timeout && outcome.as_ref().is_err_and(ToolError::is_timeout) {
            call_ctx.cancel();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tools::ParameterSchema;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the x argument"
        }

        fn schema(&self) -> ParameterSchema {
            ParameterSchema::object().required_property("x", "string", "")
        }

        async fn execute(&self, _ctx: Context, args: Arguments) -> Result<Value, ToolError> {
            Ok(args.get("x").cloned().unwrap_or(Value::Null))
        }
    }

    /// Sleeps, then records whether its context was cancelled.
    struct Stubborn {
        delay: Duration,
        saw_cancel: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Tool for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn description(&self) -> &str {
            "Ignores cancellation"
        }

        fn schema(&self) -> ParameterSchema {
            ParameterSchema::object()
        }

        async fn execute(&self, ctx: Context, _args: Arguments) -> Result<Value, ToolError> {
            tokio::time::sleep(self.delay).await;
            self.saw_cancel.store(ctx.is_cancelled(), Ordering::SeqCst);
            Ok(json!("done"))
        }
    }

    struct Panics;

    #[async_trait]
    impl Tool for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn description(&self) -> &str {
            ""
        }

        fn schema(&self) -> ParameterSchema {
            ParameterSchema::object()
        }

        async fn execute(&self, _ctx: Context, _args: Arguments) -> Result<Value, ToolError> {
            panic!("tool bug")
        }
    }

    async fn registry_with(tool: Arc<dyn Tool>) -> Arc<Registry> {
        let registry = Arc::new(Registry::new());
        registry.register(tool).await;
        registry
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let executor = Executor::new(Arc::new(Registry::new()));
        let err = executor
            .execute(&Context::new(), "missing", Arguments::new())
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::not_found("missing"));
    }

    #[tokio::test]
    async fn result_passes_through() {
        let executor = Executor::new(registry_with(Arc::new(Echo)).await)
            .with_timeout(Duration::from_secs(5));
        let mut args = Arguments::new();
        args.insert("x".into(), json!("hi"));
        let out = executor.execute(&Context::new(), "echo", args).await.unwrap();
        assert_eq!(out, json!("hi"));
    }

    #[tokio::test]
    async fn max_timeout_runs_without_deadline() {
        let executor =
            Executor::new(registry_with(Arc::new(Echo)).await).with_timeout(Duration::MAX);
        let mut args = Arguments::new();
        args.insert("x".into(), json!("unbounded"));
        let out = executor.execute(&Context::new(), "echo", args).await.unwrap();
        assert_eq!(out, json!("unbounded"));
    }

    #[tokio::test]
    async fn zero_timeout_disables_deadline() {
        let executor = Executor::new(Arc::new(Registry::new())).with_timeout(Duration::ZERO);
        assert_eq!(executor.timeout(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn timeout_cancels_tool_context_but_not_caller() {
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let tool = Arc::new(Stubborn {
            delay: Duration::from_millis(150),
            saw_cancel: saw_cancel.clone(),
        });
        let executor =
            Executor::new(registry_with(tool).await).with_timeout(Duration::from_millis(20));

        let ctx = Context::new();
        let err = executor
            .execute(&ctx, "stubborn", Arguments::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(!ctx.is_done());

        // The tool was not aborted; it finishes and sees the cancellation.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn without_cancel_on_timeout_tool_context_stays_live() {
        let saw_cancel = Arc::new(AtomicBool::new(true));
        let tool = Arc::new(Stubborn {
            delay: Duration::from_millis(100),
            saw_cancel: saw_cancel.clone(),
        });
        let executor = Executor::new(registry_with(tool).await)
            .with_timeout(Duration::from_millis(10))
            .with_cancel_on_timeout(false);

        let err = executor
            .execute(&Context::new(), "stubborn", Arguments::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn caller_cancellation_is_timeout() {
        let tool = Arc::new(Stubborn {
            delay: Duration::from_secs(5),
            saw_cancel: Arc::new(AtomicBool::new(false)),
        });
        let executor = Executor::new(registry_with(tool).await);
        let ctx = Context::new();
        ctx.cancel();
        let err = executor
            .execute(&ctx, "stubborn", Arguments::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn panic_becomes_execution_error() {
        let executor = Executor::new(registry_with(Arc::new(Panics)).await);
        let err = executor
            .execute(&Context::new(), "panics", Arguments::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution { ref tool, .. } if tool == "panics"));
    }

    #[tokio::test]
    async fn specs_expose_schema_unchanged() {
        let executor = Executor::new(registry_with(Arc::new(Echo)).await);
        let specs = executor.specs().await;
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].input_schema, Echo.schema().to_value());
    }
}
