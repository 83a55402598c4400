//! Session implementations
//!
//! [`AsyncDatabase`] hands out sqlx transactions. [`BlockingDatabase`] hands
//! out pooled rusqlite connections with an explicit `BEGIN`; their queries
//! run inside [`run_blocking`].

mod async_session;
mod blocking_session;

pub use async_session::{AsyncDatabase, AsyncSession};
pub use blocking_session::{BlockingDatabase, BlockingSession};

use tokio::runtime::{Handle, RuntimeFlavor};

/// Run blocking work from async code.
///
/// On a multi-threaded runtime the worker hands its other tasks off first
/// (`block_in_place`). A current-thread runtime cannot do that, so the work
/// runs inline and stalls the whole runtime for its duration.
pub fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}
