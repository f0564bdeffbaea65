//! Line-oriented scripted pointer source.
//!
//! Drives the bridge from a plain text stream (stdin in the binary), one
//! event per line:
//!
//! ```text
//! press 10 10
//! drag 20 20
//! drag 30 30
//! release 30 30
//! quit
//! ```
//!
//! Unrecognized lines are logged at WARN and skipped.  End of input is
//! treated as a quit request so the bridge closes its port on a piped
//! script ending.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::mpsc;
use tracing::warn;

use super::{PointerSource, RawPointerEvent, SourceError};

/// Parses one script line into an event.
///
/// Returns `None` for blank lines, comments (`#`), and malformed input.
pub fn parse_line(line: &str) -> Option<RawPointerEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;

    let mut coords = || -> Option<(i32, i32)> {
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        Some((x, y))
    };

    match verb {
        "press" => coords().map(|(x, y)| RawPointerEvent::Press { x, y }),
        "drag" => coords().map(|(x, y)| RawPointerEvent::Drag { x, y }),
        "release" => coords().map(|(x, y)| RawPointerEvent::Release { x, y }),
        "quit" => Some(RawPointerEvent::Quit),
        _ => None,
    }
}

/// A [`PointerSource`] reading events from a buffered line stream.
pub struct ScriptSource<R> {
    reader: Option<R>,
}

impl ScriptSource<BufReader<Stdin>> {
    /// A source reading from standard input.
    pub fn stdin() -> Self {
        Self {
            reader: Some(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl<R> ScriptSource<R> {
    /// A source reading from any buffered line stream.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R> PointerSource for ScriptSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<RawPointerEvent>, SourceError> {
        let reader = self.reader.take().ok_or(SourceError::AlreadyStarted)?;
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match parse_line(&line) {
                        Some(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        None if line.trim().is_empty() || line.trim_start().starts_with('#') => {}
                        None => warn!(line = %line, "unrecognized script line skipped"),
                    },
                    // Stream ended or failed; either way the session is over.
                    Ok(None) => {
                        let _ = tx.send(RawPointerEvent::Quit);
                        break;
                    }
                    Err(err) => {
                        warn!(%err, "script stream read failed; quitting");
                        let _ = tx.send(RawPointerEvent::Quit);
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_press_drag_release() {
        assert_eq!(
            parse_line("press 10 20"),
            Some(RawPointerEvent::Press { x: 10, y: 20 })
        );
        assert_eq!(
            parse_line("drag -5 480"),
            Some(RawPointerEvent::Drag { x: -5, y: 480 })
        );
        assert_eq!(
            parse_line("release 30 30"),
            Some(RawPointerEvent::Release { x: 30, y: 30 })
        );
    }

    #[test]
    fn test_parse_quit_and_noise() {
        assert_eq!(parse_line("quit"), Some(RawPointerEvent::Quit));
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line("press ten twenty"), None);
        assert_eq!(parse_line("wiggle 1 2"), None);
    }

    #[tokio::test]
    async fn test_script_stream_yields_events_then_quit_at_eof() {
        let script = b"press 10 10\ndrag 20 20\n" as &[u8];
        let mut source = ScriptSource::from_reader(BufReader::new(script));
        let mut rx = source.start().unwrap();

        assert_eq!(
            rx.recv().await,
            Some(RawPointerEvent::Press { x: 10, y: 10 })
        );
        assert_eq!(rx.recv().await, Some(RawPointerEvent::Drag { x: 20, y: 20 }));
        assert_eq!(rx.recv().await, Some(RawPointerEvent::Quit));
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let mut source = ScriptSource::from_reader(BufReader::new(b"" as &[u8]));
        let _rx = source.start().unwrap();

        assert!(matches!(source.start(), Err(SourceError::AlreadyStarted)));
    }
}
