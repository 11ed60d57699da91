//! Fixed, length-prefixed binary message encoding for signatures.
//!
//! Every signed message in the system is the concatenation of its fields,
//! each prefixed with its byte length as a big-endian `u32`. Length
//! prefixing makes the encoding injective: no two distinct field sequences
//! produce the same byte stream, so a signature over the stream binds every
//! field unambiguously.

/// Builder for a length-prefixed signing message.
#[derive(Debug, Default)]
pub struct WireMessage {
    bytes: Vec<u8>,
}

impl WireMessage {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a byte field with its length prefix.
    #[must_use]
    pub fn field(mut self, value: &[u8]) -> Self {
        let len = u32::try_from(value.len()).unwrap_or(u32::MAX);
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(&value[..len as usize]);
        self
    }

    /// Appends a UTF-8 string field.
    #[must_use]
    pub fn str_field(self, value: &str) -> Self {
        self.field(value.as_bytes())
    }

    /// Appends a `u64` field as 8 big-endian bytes (length-prefixed like any
    /// other field).
    #[must_use]
    pub fn u64_field(self, value: u64) -> Self {
        self.field(&value.to_be_bytes())
    }

    /// Finishes the message and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The canonical signing message for a lease:
/// `task_id ‖ issued_at ‖ expires_at`, length-prefixed.
#[must_use]
pub fn lease_message(task_id: &str, issued_at_ms: u64, expires_at_ms: u64) -> Vec<u8> {
    WireMessage::new()
        .str_field(task_id)
        .u64_field(issued_at_ms)
        .u64_field(expires_at_ms)
        .into_bytes()
}

/// The canonical signing message for an execution result:
/// `task_id ‖ capability_id ‖ status ‖ canonical(output|error)`,
/// length-prefixed.
#[must_use]
pub fn result_message(
    task_id: &str,
    capability_id: &str,
    status: &str,
    canonical_payload: &str,
) -> Vec<u8> {
    WireMessage::new()
        .str_field(task_id)
        .str_field(capability_id)
        .str_field(status)
        .str_field(canonical_payload)
        .into_bytes()
}
