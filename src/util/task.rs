use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Spawned loads use this so a panic still produces a completion event and
/// the UI never waits on a task that silently died.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "task panicked".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_through_value() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_captures_panic_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("fetch exploded") }).await;
        assert_eq!(result, Err("fetch exploded".to_string()));
    }

    #[tokio::test]
    async fn test_captures_formatted_panic() {
        let code = 42;
        let result: Result<(), String> = catch_task_panic(async move { panic!("code {}", code) }).await;
        assert_eq!(result, Err("code 42".to_string()));
    }
}
