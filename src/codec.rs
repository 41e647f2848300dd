//! Snappy-compressed protobuf framing used by remote write and remote read
//!
//! Both directions use the snappy *block* format (no stream framing), as
//! required by the remote storage protocol.

use crate::{Error, Result};
use prost::Message;

/// `Content-Type` of remote-storage payloads.
pub const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";
/// `Content-Encoding` of remote-storage payloads.
pub const CONTENT_ENCODING_SNAPPY: &str = "snappy";
pub const REMOTE_WRITE_VERSION_HEADER: &str = "X-Prometheus-Remote-Write-Version";
pub const REMOTE_READ_VERSION_HEADER: &str = "X-Prometheus-Remote-Read-Version";
pub const REMOTE_PROTOCOL_VERSION: &str = "0.1.0";

/// Upper bound on a single decompressed payload (32 MiB).
pub const MAX_DECOMPRESSED_BYTES: usize = 32 * 1024 * 1024;

/// Protobuf-encode `message` and snappy-compress the result.
pub fn encode<M: Message>(message: &M) -> Result<Vec<u8>> {
    let raw = message.encode_to_vec();
    Ok(snap::raw::Encoder::new().compress_vec(&raw)?)
}

/// Snappy-decompress `payload` and protobuf-decode it as `M`.
pub fn decode<M: Message + Default>(payload: &[u8]) -> Result<M> {
    decode_with_limit(payload, MAX_DECOMPRESSED_BYTES)
}

/// Like [`decode`], rejecting payloads that expand beyond `limit` bytes.
pub fn decode_with_limit<M: Message + Default>(payload: &[u8], limit: usize) -> Result<M> {
    let size = snap::raw::decompress_len(payload)?;
    if size > limit {
        return Err(Error::PayloadTooLarge { size, limit });
    }
    let raw = snap::raw::Decoder::new().decompress_vec(payload)?;
    Ok(M::decode(raw.as_slice())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Label, Sample, TimeSeries, WriteRequest};

    fn request() -> WriteRequest {
        WriteRequest {
            timeseries: vec![TimeSeries {
                labels: vec![
                    Label::new("__name__", "cpu_usage"),
                    Label::new("host", "server1"),
                ],
                samples: vec![Sample::new(0.85, 1000), Sample::new(0.90, 2000)],
                exemplars: vec![],
            }],
            metadata: vec![],
        }
    }

    #[test]
    fn test_encode_decode() {
        let original = request();
        let payload = encode(&original).unwrap();
        let decoded: WriteRequest = decode(&payload).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_payload_is_snappy_block() {
        let payload = encode(&request()).unwrap();
        let raw = snap::raw::Decoder::new().decompress_vec(&payload).unwrap();
        assert_eq!(raw, prost::Message::encode_to_vec(&request()));
    }

    #[test]
    fn test_empty_message_encodes() {
        let payload = encode(&WriteRequest::default()).unwrap();
        let decoded: WriteRequest = decode(&payload).unwrap();
        assert!(decoded.timeseries.is_empty());
    }

    #[test]
    fn test_rejects_garbage_payload() {
        let result: Result<WriteRequest> = decode(&[0xff; 12]);
        assert!(matches!(result, Err(Error::Compression(_))));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let payload = encode(&request()).unwrap();
        let result: Result<WriteRequest> = decode_with_limit(&payload, 4);
        assert!(matches!(result, Err(Error::PayloadTooLarge { limit: 4, .. })));
    }
}
