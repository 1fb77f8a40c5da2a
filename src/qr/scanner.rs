//! The QR scanning state machine and its cooperative polling loop.
//!
//! Scanning samples video frames continuously. Almost every frame is not a
//! QR code, so unreadable frames and payloads that are not JSON at all are
//! treated as noise and skipped silently. Only a payload that parses as
//! JSON but fails schema validation is surfaced as an error.

use async_trait::async_trait;
use image::GrayImage;
use tokio::sync::watch;

use crate::{
    Error,
    qr::codec::{PaymentRequest, extract_payload_text, json_payload, payment_request_from_value},
};

/// The state of a QR scanning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Not scanning. The camera is not being sampled.
    Idle,
    /// Sampling frames, looking for a payment request.
    Scanning,
    /// A well-formed payment request was found.
    Decoded(PaymentRequest),
}

/// Decodes a stream of video frames into a payment request.
///
/// The scanner itself performs no I/O; frames are pushed into
/// [process_frame](Self::process_frame) by a driver such as
/// [scan_until_decoded].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    state: ScanState,
}

impl Scanner {
    /// Create a scanner in the [ScanState::Idle] state.
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
        }
    }

    /// The current session state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Begin a scanning session, discarding any previously decoded result.
    pub fn start(&mut self) {
        self.state = ScanState::Scanning;
    }

    /// End the session and return to [ScanState::Idle].
    pub fn cancel(&mut self) {
        self.state = ScanState::Idle;
    }

    /// Try to decode a payment request from a single frame.
    ///
    /// Returns `Ok(None)` and stays in [ScanState::Scanning] when the frame
    /// holds no readable QR code or its payload is not JSON. Returns the
    /// request and moves to [ScanState::Decoded] on success. Frames are
    /// ignored entirely unless the scanner is scanning.
    ///
    /// # Errors
    /// Returns [Error::MalformedPayload] for a payload that is JSON but is
    /// not a valid payment request; the scanner stays in
    /// [ScanState::Scanning] so the caller decides whether to continue.
    pub fn process_frame(&mut self, frame: &GrayImage) -> Result<Option<PaymentRequest>, Error> {
        if self.state != ScanState::Scanning {
            return Ok(None);
        }

        let Some(text) = extract_payload_text(frame) else {
            return Ok(None);
        };

        let Some(value) = json_payload(&text) else {
            return Ok(None);
        };

        let request = payment_request_from_value(&value)?;
        self.state = ScanState::Decoded(request.clone());

        Ok(Some(request))
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// A source of video frames, typically a camera.
///
/// Acquiring the camera happens when the source is constructed and releasing
/// it happens when the source is dropped, so a scan loop that owns its
/// source frees the camera on every exit path.
#[async_trait]
pub trait FrameSource: Send {
    /// The next sampled frame, or `None` once the source is closed.
    async fn next_frame(&mut self) -> Option<GrayImage>;
}

/// Poll frames from `source` until a payment request is decoded, the
/// cancellation signal fires, or the source runs out of frames.
///
/// Returns `Ok(None)` when the session was cancelled or the source closed
/// before a request was found. Dropping the `cancel` sender also ends the
/// session, mirroring the session owner being torn down. The source is
/// consumed, so the camera is released on every exit path, including
/// errors.
///
/// # Errors
/// Returns [Error::MalformedPayload] when a frame carried a JSON payload
/// that is not a valid payment request.
pub async fn scan_until_decoded<S: FrameSource>(
    mut source: S,
    mut cancel: watch::Receiver<bool>,
) -> Result<Option<PaymentRequest>, Error> {
    let mut scanner = Scanner::new();
    scanner.start();

    loop {
        tokio::select! {
            _ = cancel.changed() => {
                scanner.cancel();
                return Ok(None);
            }
            frame = source.next_frame() => {
                let Some(frame) = frame else {
                    scanner.cancel();
                    return Ok(None);
                };

                match scanner.process_frame(&frame) {
                    Ok(Some(request)) => return Ok(Some(request)),
                    Ok(None) => {}
                    Err(error) => return Err(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod scanner_tests {
    use crate::{Error, account::AccountRef, qr::codec::PaymentRequest};

    use super::{ScanState, Scanner};
    use super::scanner_tests_support::{noise_frame, qr_frame, valid_frame};

    #[test]
    fn starts_idle() {
        let scanner = Scanner::new();

        assert_eq!(scanner.state(), &ScanState::Idle);
    }

    #[test]
    fn start_and_cancel_move_between_states() {
        let mut scanner = Scanner::new();

        scanner.start();
        assert_eq!(scanner.state(), &ScanState::Scanning);

        scanner.cancel();
        assert_eq!(scanner.state(), &ScanState::Idle);
    }

    #[test]
    fn frames_are_ignored_while_idle() {
        let mut scanner = Scanner::new();

        let got = scanner.process_frame(&valid_frame());

        assert_eq!(got, Ok(None));
        assert_eq!(scanner.state(), &ScanState::Idle);
    }

    #[test]
    fn noise_frames_are_skipped_silently() {
        let mut scanner = Scanner::new();
        scanner.start();

        let got = scanner.process_frame(&noise_frame());

        assert_eq!(got, Ok(None));
        assert_eq!(scanner.state(), &ScanState::Scanning);
    }

    #[test]
    fn non_json_qr_payloads_are_noise() {
        let mut scanner = Scanner::new();
        scanner.start();

        let got = scanner.process_frame(&qr_frame("hello world"));

        assert_eq!(got, Ok(None));
        assert_eq!(scanner.state(), &ScanState::Scanning);
    }

    #[test]
    fn json_payload_with_bad_schema_is_surfaced() {
        let mut scanner = Scanner::new();
        scanner.start();

        let got = scanner.process_frame(&qr_frame(r#"{"identifier":"acct-42"}"#));

        assert!(
            matches!(got, Err(Error::MalformedPayload(_))),
            "want MalformedPayload, got {got:?}"
        );
        assert_eq!(scanner.state(), &ScanState::Scanning);
    }

    #[test]
    fn valid_payload_moves_to_decoded() {
        let mut scanner = Scanner::new();
        scanner.start();

        let got = scanner.process_frame(&valid_frame()).unwrap();

        let want = PaymentRequest {
            identifier: AccountRef::new("estudiante2@luka.com"),
            amount: 75,
        };
        assert_eq!(got, Some(want.clone()));
        assert_eq!(scanner.state(), &ScanState::Decoded(want));
    }
}
