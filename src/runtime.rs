//! Runtime abstraction layer for async operations
//!
//! Polling loops, the globe frame loop and dashboard refresh timers all run
//! through the spawner here, so the same code drives a Tokio runtime natively
//! and the browser event loop under WASM.

use crate::prelude::{Future, Pin};
#[cfg(any(feature = "wasm", test))]
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

#[cfg(not(any(feature = "tokio-runtime", feature = "wasm")))]
compile_error!("No async runtime available. Enable the 'tokio-runtime' or 'wasm' feature.");

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task. Cancelling a finished task does nothing.
    fn cancel(&self);
}

/// Convenience function for spawning with type safety
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("runtime::spawn()");
    runtime().spawn_boxed(Box::pin(future))
}

/// Sleeps without blocking the executor
pub async fn async_delay(duration: Duration) {
    #[cfg(feature = "tokio-runtime")]
    {
        ::tokio::time::sleep(duration).await;
    }

    #[cfg(all(feature = "wasm", not(feature = "tokio-runtime")))]
    {
        spawners::wasm::timeout(duration).await;
    }
}

/// Shared finished flag for spawners that can't query their executor
#[cfg(any(feature = "wasm", test))]
#[derive(Debug, Clone, Default)]
struct FinishedFlag(Arc<AtomicBool>);

#[cfg(any(feature = "wasm", test))]
impl FinishedFlag {
    fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
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

    #[cfg(feature = "wasm")]
    pub mod wasm {
        use super::*;
        use futures::future::{AbortHandle, Abortable};
        use wasm_bindgen::{closure::Closure, JsCast};

        /// WASM-compatible async spawner
        pub struct WasmSpawner;

        impl AsyncSpawner for WasmSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let (abort, registration) = AbortHandle::new_pair();
                let finished = FinishedFlag::default();
                let flag = finished.clone();

                wasm_bindgen_futures::spawn_local(async move {
                    let _ = Abortable::new(future, registration).await;
                    flag.set();
                });

                Box::new(WasmHandle { abort, finished })
            }
        }

        struct WasmHandle {
            abort: AbortHandle,
            finished: FinishedFlag,
        }

        impl AsyncHandle for WasmHandle {
            fn is_finished(&self) -> bool {
                self.finished.get()
            }

            fn cancel(&self) {
                self.abort.abort();
                self.finished.set();
            }
        }

        /// Resolves after `duration` using the window's timer queue. Only the
        /// oneshot receiver is held across the await, so the future stays `Send`.
        pub(crate) async fn timeout(duration: Duration) {
            let millis = duration.as_millis().min(i32::MAX as u128) as i32;
            let (tx, rx) = futures::channel::oneshot::channel::<()>();
            let scheduled = {
                let callback = Closure::once_into_js(move || {
                    let _ = tx.send(());
                });
                web_sys::window().map(|window| {
                    window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(
                            callback.unchecked_ref(),
                            millis,
                        )
                        .is_ok()
                })
            };
            if scheduled != Some(true) {
                log::warn!("no window timer available, delay of {:?} skipped", duration);
                return;
            }
            let _ = rx.await;
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner. Only the first call wins.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::debug!("runtime already initialized, keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(all(feature = "wasm", not(feature = "tokio-runtime")))]
            {
                Box::new(spawners::wasm::WasmSpawner)
            }
        })
        .as_ref()
}
