//! Batch call resolver.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tools::{Arguments, Context, Tool, ToolError, ToolSet};

use crate::call::{CallResult, PendingCall};
use crate::config::{FallbackContinuation, ResolverConfig};
use crate::executor::invoke;

/// Per-call results of a batch plus the aggregate error.
///
/// The aggregate error is a convenience signal only. Inspect each
/// [`CallResult`] for the full picture of partial failure.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub results: Vec<CallResult>,
    pub error: Option<ToolError>,
}

impl Resolution {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Results that carry an error.
    pub fn failures(&self) -> impl Iterator<Item = &CallResult> {
        self.results.iter().filter(|r| r.is_err())
    }

    /// Drop the per-call results if the batch has an aggregate error.
    pub fn into_result(self) -> Result<Vec<CallResult>, ToolError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.results),
        }
    }
}

/// A call with its target resolved and arguments decoded.
struct Prepared {
    call: PendingCall,
    target: Result<(Arc<dyn Tool>, Arguments), ToolError>,
    used_fallback: bool,
}

impl Prepared {
    async fn run(self, ctx: Context) -> CallResult {
        let outcome = match self.target {
            Ok((tool, args)) => invoke(tool, &ctx, args).await,
            Err(e) => Err(e),
        };
        CallResult::from_outcome(self.call, outcome, self.used_fallback)
    }
}

/// Resolves a batch of pending calls against a [`ToolSet`].
///
/// Unknown names go to the fallback tool when one is set, otherwise their
/// result carries [`ToolError::NotFound`]. The resolver applies no timeout of
/// its own; give `ctx` a deadline to bound the batch.
#[derive(Clone, Default)]
pub struct Resolver {
    fallback: Option<Arc<dyn Tool>>,
    concurrent: bool,
    continuation: FallbackContinuation,
}

impl Resolver {
    /// A sequential resolver with no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            fallback: None,
            concurrent: config.concurrent,
            continuation: config.fallback_continues,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Tool>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_continuation(mut self, continuation: FallbackContinuation) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn fallback(&self) -> Option<&Arc<dyn Tool>> {
        self.fallback.as_ref()
    }

    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    /// Resolve and run every call.
    ///
    /// Results come back in submission order. Sequential mode (the default, and
    /// always for a single call) stops at the first failure unless a fallback
    /// is configured. Concurrent mode runs every call and reports the first
    /// failure to complete as the aggregate error.
    pub async fn resolve_all(
        &self,
        ctx: &Context,
        calls: Vec<PendingCall>,
        tools: &ToolSet,
    ) -> Resolution {
        let concurrent = self.concurrent && calls.len() > 1;
        tracing::debug!(calls = calls.len(), concurrent, "resolving tool calls");

        if concurrent {
            self.resolve_concurrent(ctx, calls, tools).await
        } else {
            self.resolve_sequential(ctx, calls, tools).await
        }
    }

    async fn resolve_sequential(
        &self,
        ctx: &Context,
        calls: Vec<PendingCall>,
        tools: &ToolSet,
    ) -> Resolution {
        let mut results = Vec::with_capacity(calls.len());
        for (index, call) in calls.into_iter().enumerate() {
            let result = self.prepare(call, tools).run(ctx.clone()).await;
            let stop = match &result.error {
                Some(e) if self.stops_on(&result) => Some(e.clone()),
                _ => None,
            };
            results.push(result);

            if let Some(error) = stop {
                tracing::debug!(index, error = %error, "stopping batch on failed call");
                return Resolution {
                    results,
                    error: Some(error),
                };
            }
        }
        Resolution {
            results,
            error: None,
        }
    }

    async fn resolve_concurrent(
        &self,
        ctx: &Context,
        calls: Vec<PendingCall>,
        tools: &ToolSet,
    ) -> Resolution {
        let total = calls.len();
        let (tx, mut rx) = mpsc::channel::<(usize, CallResult)>(total);

        // Placeholders keep one result per call even if a unit never reports.
        let mut results = Vec::with_capacity(total);
        for (index, call) in calls.into_iter().enumerate() {
            let prepared = self.prepare(call, tools);
            results.push(CallResult::from_outcome(
                prepared.call.clone(),
                Err(ToolError::execution(
                    prepared.call.name.clone(),
                    "invocation did not complete",
                )),
                prepared.used_fallback,
            ));

            let tx = tx.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                let result = prepared.run(ctx).await;
                let _ = tx.send((index, result)).await;
            });
        }
        drop(tx);

        let mut error = None;
        let mut completed = 0;
        while completed < total {
            let Some((index, result)) = rx.recv().await else {
                break;
            };
            if error.is_none() {
                error = result.error.clone();
            }
            results[index] = result;
            completed += 1;
        }

        if completed < total {
            tracing::warn!(completed, total, "some tool calls never reported");
            if error.is_none() {
                error = results.iter().find_map(|r| r.error.clone());
            }
        }

        Resolution { results, error }
    }

    fn prepare(&self, call: PendingCall, tools: &ToolSet) -> Prepared {
        let (tool, used_fallback) = match tools.get(&call.name) {
            Some(tool) => (Some(tool), false),
            None => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        tool = %call.name,
                        fallback = %fallback.name(),
                        "unknown tool, substituting fallback"
                    );
                    (Some(fallback.clone()), true)
                }
                None => (None, false),
            },
        };

        let target = match tool {
            Some(tool) => call.arguments.decode(&call.name).map(|args| (tool, args)),
            None => Err(ToolError::not_found(&call.name)),
        };

        Prepared {
            call,
            target,
            used_fallback,
        }
    }

    /// Whether a failed result ends a sequential batch.
    fn stops_on(&self, result: &CallResult) -> bool {
        match (&self.fallback, self.continuation) {
            (None, _) => true,
            (Some(_), FallbackContinuation::AllErrors) => false,
            (Some(_), FallbackContinuation::NotFoundOnly) => !result.used_fallback,
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("fallback", &self.fallback.as_ref().map(|t| t.name().to_string()))
            .field("concurrent", &self.concurrent)
            .field("continuation", &self.continuation)
            .finish()
    }
}
