//! Stdin/stdout bridge for the query controller.
//!
//! Each newline-terminated line read from stdin replaces the raw query, as if
//! the user had typed it into a search box. Every snapshot change is written
//! to stdout as one line of JSON.
//!
//! Stdout is exclusively reserved for snapshots; all diagnostic output
//! (tracing, logs) must be routed to stderr.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use typeahead_search::{IndexClient, QueryController, QuerySnapshot, SummaryResolver};

use crate::error::{HostError, Result};

/// Run the bridge on the process's stdin and stdout until stdin closes.
///
/// After EOF the bridge waits up to `settle_timeout` for the last attempt to
/// commit or fail so that its snapshot is written before exiting.
pub async fn run_stdio_bridge<I, R>(
    controller: QueryController<I, R>,
    settle_timeout: Duration,
) -> Result<()>
where
    I: IndexClient + 'static,
    R: SummaryResolver + 'static,
{
    let input = BufReader::new(tokio::io::stdin());
    let output = BufWriter::new(tokio::io::stdout());
    run_bridge(controller, input, output, settle_timeout).await
}

/// Bridge arbitrary line input to JSON snapshot output.
///
/// Two tasks operate concurrently:
///
/// 1. **Reader** -- runs on the current task, feeding each line to
///    [`QueryController::set_query`].
/// 2. **Snapshot forwarder** -- watches the controller's state and writes
///    every observed snapshot as a JSON line.
pub async fn run_bridge<I, R, In, Out>(
    controller: QueryController<I, R>,
    input: In,
    output: Out,
    settle_timeout: Duration,
) -> Result<()>
where
    I: IndexClient + 'static,
    R: SummaryResolver + 'static,
    In: AsyncBufRead + Unpin,
    Out: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(output));
    let shutdown = CancellationToken::new();

    let mut rx = controller.subscribe();
    let forward_writer = Arc::clone(&writer);
    let forward_shutdown = shutdown.clone();
    let forwarder = tokio::spawn(async move {
        loop {
            let stopping = tokio::select! {
                changed = rx.changed() => changed.is_err(),
                _ = forward_shutdown.cancelled() => true,
            };
            if stopping && !rx.has_changed().unwrap_or(false) {
                break;
            }

            let snapshot = rx.borrow_and_update().clone();
            let mut w = forward_writer.lock().await;
            if let Err(e) = write_snapshot(&mut *w, &snapshot).await {
                tracing::warn!(error = %e, "failed to write snapshot; stopping forwarder");
                break;
            }
            drop(w);

            if stopping {
                break;
            }
        }
    });

    let reader_result = run_reader(&controller, input).await;

    if matches!(reader_result, Ok(true)) {
        match tokio::time::timeout(settle_timeout, controller.settled()).await {
            Ok(snapshot) => tracing::debug!(
                generation = %snapshot.generation,
                failed = snapshot.failure.is_some(),
                "last attempt settled"
            ),
            Err(_) => tracing::warn!(
                timeout_ms = settle_timeout.as_millis() as u64,
                "last attempt did not settle before shutdown"
            ),
        }
    }

    shutdown.cancel();
    if let Err(e) = forwarder.await {
        tracing::error!(error = %e, "snapshot forwarder panicked");
    }
    writer
        .lock()
        .await
        .flush()
        .await
        .map_err(|e| HostError::Channel(format!("failed to flush output: {e}")))?;

    reader_result.map(|_| ())
}

/// Read input line by line, submitting each as the new raw query.
///
/// Returns whether any query was submitted.
async fn run_reader<I, R, In>(controller: &QueryController<I, R>, mut input: In) -> Result<bool>
where
    I: IndexClient + 'static,
    R: SummaryResolver + 'static,
    In: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let mut submitted = false;

    loop {
        line.clear();
        let bytes_read = input
            .read_line(&mut line)
            .await
            .map_err(|e| HostError::Channel(format!("failed to read input: {e}")))?;

        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down bridge");
            break;
        }

        let raw = line.trim_end_matches(['\r', '\n']);
        let generation = controller.set_query(raw);
        tracing::trace!(%generation, query = raw, "query submitted");
        submitted = true;
    }

    Ok(submitted)
}

/// Write one snapshot as a JSON line and flush.
async fn write_snapshot<W: AsyncWrite + Unpin>(writer: &mut W, snapshot: &QuerySnapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot)
        .map_err(|e| HostError::Channel(format!("failed to serialize snapshot: {e}")))?;
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| HostError::Channel(format!("failed to write output: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| HostError::Channel(format!("failed to write newline to output: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| HostError::Channel(format!("failed to flush output: {e}")))?;
    Ok(())
}
