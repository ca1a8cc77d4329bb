#![forbid(unsafe_code)]

use crate::pak::error::{PakError, PakResult};
use crate::pak::format::{is_packed, SIGNATURE};

/// Byte-level compression algorithm behind the pak envelope.
pub trait Codec {
    fn encode(&self, raw: &[u8]) -> std::io::Result<Vec<u8>>;
    fn decode(&self, payload: &[u8]) -> std::io::Result<Vec<u8>>;
}

#[cfg(feature = "zstd")]
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

#[cfg(feature = "zstd")]
impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

#[cfg(feature = "zstd")]
impl Codec for ZstdCodec {
    fn encode(&self, raw: &[u8]) -> std::io::Result<Vec<u8>> {
        zstd::encode_all(raw, self.level)
    }

    fn decode(&self, payload: &[u8]) -> std::io::Result<Vec<u8>> {
        zstd::decode_all(payload)
    }
}

/// Build the default codec for this binary.
pub fn default_codec(level: i32) -> PakResult<Box<dyn Codec>> {
    #[cfg(feature = "zstd")]
    {
        Ok(Box::new(ZstdCodec::new(level)))
    }
    #[cfg(not(feature = "zstd"))]
    {
        let _ = level;
        Err(PakError::NoZstd)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compressed {
    /// Signature followed by the encoded payload; strictly shorter than the input.
    Packed(Vec<u8>),
    /// Encoding did not shrink the input.
    NotSmaller,
}

/// Wraps a [`Codec`] in the signature envelope. This is the only place the
/// signature gets written.
pub struct Compressor<'a> {
    codec: &'a dyn Codec,
}

impl<'a> Compressor<'a> {
    pub fn new(codec: &'a dyn Codec) -> Self {
        Self { codec }
    }

    pub fn compress(&self, raw: &[u8]) -> PakResult<Compressed> {
        let payload = self.codec.encode(raw)?;
        if SIGNATURE.len() + payload.len() >= raw.len() {
            return Ok(Compressed::NotSmaller);
        }
        let mut envelope = Vec::with_capacity(SIGNATURE.len() + payload.len());
        envelope.extend_from_slice(&SIGNATURE);
        envelope.extend_from_slice(&payload);
        Ok(Compressed::Packed(envelope))
    }

    /// Inverse of [`Compressor::compress`] for a `Packed` envelope.
    pub fn expand(&self, envelope: &[u8]) -> PakResult<Vec<u8>> {
        if !is_packed(envelope) {
            return Err(PakError::Invalid("missing pak signature".into()));
        }
        self.codec
            .decode(&envelope[SIGNATURE.len()..])
            .map_err(|e| PakError::Invalid(format!("payload does not decode: {e}")))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RleCodec;
    use super::*;

    #[test]
    fn packed_output_starts_with_signature() {
        let raw = vec![b'a'; 100];
        let c = Compressor::new(&RleCodec);
        match c.compress(&raw).unwrap() {
            Compressed::Packed(env) => {
                assert!(is_packed(&env));
                assert!(env.len() < raw.len());
                assert_eq!(c.expand(&env).unwrap(), raw);
            }
            Compressed::NotSmaller => panic!("expected packed output"),
        }
    }

    #[test]
    fn incompressible_input_is_not_smaller() {
        let raw: Vec<u8> = (0u8..=255).collect();
        let c = Compressor::new(&RleCodec);
        assert_eq!(c.compress(&raw).unwrap(), Compressed::NotSmaller);
    }

    #[test]
    fn envelope_overhead_counts() {
        // 6 bytes -> 2 byte payload + 4 byte signature: not a win.
        let raw = vec![b'x'; 6];
        let c = Compressor::new(&RleCodec);
        assert_eq!(c.compress(&raw).unwrap(), Compressed::NotSmaller);

        let raw = vec![b'x'; 7];
        assert!(matches!(c.compress(&raw).unwrap(), Compressed::Packed(_)));
    }

    #[test]
    fn expand_rejects_unsigned() {
        let c = Compressor::new(&RleCodec);
        assert!(matches!(c.expand(b"plain"), Err(PakError::Invalid(_))));
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_round_trip() {
        let raw = b"the quick brown fox ".repeat(200);
        let codec = ZstdCodec::new(6);
        let c = Compressor::new(&codec);
        let env = match c.compress(&raw).unwrap() {
            Compressed::Packed(env) => env,
            Compressed::NotSmaller => panic!("repetitive text should shrink"),
        };
        assert_eq!(&env[..4], &SIGNATURE);
        assert_eq!(c.expand(&env).unwrap(), raw);
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_tiny_input_not_smaller() {
        let codec = ZstdCodec::new(6);
        let c = Compressor::new(&codec);
        assert_eq!(c.compress(b"hi").unwrap(), Compressed::NotSmaller);
    }
}
