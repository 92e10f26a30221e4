#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PduParseErr {
    #[error("buffer ended while reading {field:?}")]
    BufferEnded { field: Option<&'static str> },
    #[error("invalid PDU type: expected {expected}, found {found}")]
    InvalidPduType { expected: u64, found: u64 },
    #[error("invalid value {value} for field {field}")]
    InvalidValue { field: &'static str, value: u64 },
    #[error("inconsistent length: expected {expected}, found {found}")]
    InconsistentLength { expected: usize, found: usize },
}

/// Checks whether a PDU type value matches the expected value. If not, returns PduParseErr::InvalidPduType
#[macro_export]
macro_rules! expect_pdu_type {
    ($value:expr, $expected:expr) => {{
        let raw_expected = $expected.into_raw();
        if $value == raw_expected {
            Ok(())
        } else {
            Err($crate::pdu_parse_error::PduParseErr::InvalidPduType {
                expected: raw_expected as u64,
                found: $value as u64,
            })
        }
    }};
}

/// Returns the byte at `idx`, or PduParseErr::BufferEnded naming the field
pub fn octet(data: &[u8], idx: usize, field: &'static str) -> Result<u8, PduParseErr> {
    data.get(idx).copied().ok_or(PduParseErr::BufferEnded { field: Some(field) })
}
