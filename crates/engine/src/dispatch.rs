//! Dispatching tool calls out of agent state.

use std::marker::PhantomData;

use tools::{Context, ToolError, ToolSet};

use crate::call::{CallResult, PendingCall};
use crate::resolver::Resolver;

/// State that can hand out pending tool calls and take back their results.
///
/// Any state type an agent loop routes through tool dispatch implements this,
/// so a mismatched state is a compile error rather than a silent no-op.
pub trait ToolCallState {
    /// Take the calls awaiting execution, leaving none behind.
    fn pending_calls(&mut self) -> Vec<PendingCall>;

    /// Fold resolved results back into the state.
    fn receive_results(&mut self, results: Vec<CallResult>);
}

/// Binds a [`Resolver`] and a [`ToolSet`] to one state type.
pub struct Dispatcher<S> {
    resolver: Resolver,
    tools: ToolSet,
    _state: PhantomData<fn(&mut S)>,
}

impl<S: ToolCallState> Dispatcher<S> {
    pub fn new(resolver: Resolver, tools: ToolSet) -> Self {
        Self {
            resolver,
            tools,
            _state: PhantomData,
        }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve the state's pending calls and return the results to it.
    ///
    /// All produced results are delivered even when the batch fails. Returns
    /// the number of results delivered, or the batch's aggregate error.
    pub async fn dispatch(&self, ctx: &Context, state: &mut S) -> Result<usize, ToolError> {
        let calls = state.pending_calls();
        if calls.is_empty() {
            return Ok(0);
        }

        let resolution = self.resolver.resolve_all(ctx, calls, &self.tools).await;
        let delivered = resolution.results.len();
        state.receive_results(resolution.results);

        match resolution.error {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("resolver", &self.resolver)
            .field("tools", &self.tools)
            .finish()
    }
}
