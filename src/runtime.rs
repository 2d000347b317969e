//! Runtime abstraction layer for async operations
//!
//! Lookups and geolocation requests are spawned through [`AsyncSpawner`] so the
//! controller does not care which executor drives them. Nothing here cancels
//! work for correctness: stale results are dropped by sequence token instead.

use futures::future::BoxFuture;

/// A trait for spawning detached async tasks (object-safe)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Abort the task. Only used at shutdown.
    fn cancel(&self);
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner. Must be used from inside a Tokio runtime.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle> {
                Box::new(TokioHandle(::tokio::spawn(future)))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

#[cfg(feature = "tokio-runtime")]
pub use spawners::tokio_impl::TokioSpawner;

/// The spawner used when none is configured explicitly
#[cfg(feature = "tokio-runtime")]
pub fn default_spawner() -> Option<std::sync::Arc<dyn AsyncSpawner>> {
    Some(std::sync::Arc::new(TokioSpawner))
}

#[cfg(not(feature = "tokio-runtime"))]
pub fn default_spawner() -> Option<std::sync::Arc<dyn AsyncSpawner>> {
    None
}
