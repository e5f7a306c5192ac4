// ctxlog/src/scope.rs
//
// Implicit context propagation for code that cannot thread a Context
// through its call signatures.

use std::future::Future;

use crate::context::Context;

tokio::task_local! {
    static CURRENT: Context;
}

/// Run `future` with `ctx` as the current context of the task
pub async fn scope<F: Future>(ctx: Context, future: F) -> F::Output {
    CURRENT.scope(ctx, future).await
}

/// Run `f` with `ctx` as the current context
pub fn sync_scope<F: FnOnce() -> R, R>(ctx: Context, f: F) -> R {
    CURRENT.sync_scope(ctx, f)
}

/// The current context, or the background context outside any scope
pub fn current() -> Context {
    CURRENT
        .try_with(|ctx| ctx.clone())
        .unwrap_or_else(|_| Context::background())
}
