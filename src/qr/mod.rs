//! QR payment requests: encoding, decoding, and the scanning loop.

pub(crate) mod codec;
mod payment_request_endpoint;
mod scanner;

pub use codec::{
    PaymentRequest, QR_MIN_SIZE, decode_payment_request, encode_payment_request,
    encode_payment_request_png,
};
pub use payment_request_endpoint::{PaymentRequestParams, payment_request_endpoint};
pub use scanner::{FrameSource, ScanState, Scanner, scan_until_decoded};
