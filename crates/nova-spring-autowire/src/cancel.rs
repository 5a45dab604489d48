use thiserror::Error;

pub use tokio_util::sync::CancellationToken;

/// The caller cancelled the request; no partial result is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Error)]
#[error("autowire resolution cancelled")]
pub struct Cancelled;

pub(crate) fn check(token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}
