use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancels `cancelation` once the process receives Ctrl-C. Used to stop the live ticker of
/// `status --watch`.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("Received Ctrl-C");
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
