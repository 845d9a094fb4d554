//! Stop-signal handling for the record command

use std::io;

/// How the user ended the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enter pressed: flush and run the pipeline
    Enter,
    /// Ctrl+C: discard the session
    Interrupt,
}

/// Wait until the user stops the recording.
///
/// Resolves on the first of: a line on stdin (Enter) or SIGINT
/// (Ctrl+C).
pub async fn wait_for_stop() -> io::Result<StopReason> {
    let stdin_line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|_| ())
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            Ok(StopReason::Interrupt)
        }
        result = stdin_line => {
            result.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))??;
            Ok(StopReason::Enter)
        }
    }
}
