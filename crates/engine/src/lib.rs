//! Tool invocation engine.
//!
//! This crate runs [`tools::Tool`]s on behalf of an agent loop, either one
//! call at a time or as a batch of calls emitted by a single model turn.
//!
//! # Overview
//!
//! - **Executor**: looks up one tool by name in a [`tools::Registry`] and runs
//!   it on its own task, racing it against an optional timeout.
//! - **Resolver**: resolves a batch of [`PendingCall`]s against a
//!   [`tools::ToolSet`], optionally substituting a fallback tool for unknown
//!   names, and runs them sequentially or concurrently. Results always come
//!   back one per call, in submission order.
//! - **Dispatcher**: binds a resolver to a state type implementing
//!   [`ToolCallState`], pulling pending calls out and folding results back in.
//!
//! Cancellation means "stop waiting, not stop working": when a context ends,
//! callers get a timeout error immediately, but a running tool is never
//! aborted. Tools should watch their [`tools::Context`] and exit.
//!
//! # Example
//!
//! ```ignore
//! use engine::{PendingCall, Resolver};
//! use tools::{Context, ToolSet};
//!
//! # async fn example(tools: ToolSet) {
//! let calls = vec![
//!     PendingCall::encoded("search", r#"{"query": "rust"}"#).with_id("call_1"),
//!     PendingCall::encoded("calculator", "2 + 2").with_id("call_2"),
//! ];
//!
//! let resolution = Resolver::new()
//!     .with_concurrency(true)
//!     .resolve_all(&Context::new(), calls, &tools)
//!     .await;
//!
//! for result in &resolution.results {
//!     println!("{}: {:?}", result.correlation_id(), result.output);
//! }
//! # }
//! ```

mod call;
mod config;
mod dispatch;
mod error;
mod executor;
mod resolver;

pub use call::{CallResult, PendingCall, RAW_INPUT_KEY, RawArguments};
pub use config::{EngineConfig, ExecutorConfig, FallbackContinuation, ResolverConfig};
pub use dispatch::{Dispatcher, ToolCallState};
pub use error::{Error, Result};
pub use executor::Executor;
pub use resolver::{Resolution, Resolver};
