//! Per-request trace id, carried in Tokio task-local storage.
//!
//! `RequestTrace` opens the scope; Problem Details rendering and log events
//! read it back through [`trace_id`].

use std::future::Future;

use tokio::task_local;

const NO_TRACE: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the request being served, or `"unknown"` outside one.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| NO_TRACE.to_string())
}

/// Poll `future` with `trace_id` visible to [`trace_id()`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_a_request_the_id_is_unknown() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn scoped_future_sees_its_id() {
        let seen = with_trace_id("req-1".to_string(), async { trace_id() }).await;
        assert_eq!(seen, "req-1");
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn inner_scope_shadows_outer() {
        let (inner, outer_after) = with_trace_id("outer".to_string(), async {
            let inner = with_trace_id("inner".to_string(), async { trace_id() }).await;
            (inner, trace_id())
        })
        .await;

        assert_eq!(inner, "inner");
        assert_eq!(outer_after, "outer");
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_scope() {
        let spawned = with_trace_id("req-2".to_string(), async {
            tokio::spawn(async { trace_id() }).await
        })
        .await
        .unwrap();
        assert_eq!(spawned, "unknown");
    }
}
