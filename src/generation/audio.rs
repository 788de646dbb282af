//! WAV encoding of generated audio

use crate::utils::error::{Result, ServiceError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io::Cursor;

pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Encode mono samples in [-1.0, 1.0] as 16-bit PCM WAV
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(value).map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
    }
    Ok(cursor.into_inner())
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn wav_error(e: hound::Error) -> ServiceError {
    ServiceError::internal(format!("WAV encoding failed: {}", e))
}
