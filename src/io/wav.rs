//! WAV decoding and encoding at the crate boundary.
//!
//! The stretch core itself never clips; samples are clamped to [-1, 1] only
//! here, when quantizing to 16-bit PCM.

use crate::core::types::{AudioBlock, Sample};
use crate::error::StretchError;
use std::io::{Read, Write};

/// WAV audio format codes.
const WAV_FORMAT_PCM: u16 = 1;
const WAV_FORMAT_IEEE_FLOAT: u16 = 3;

/// Fields of a parsed `fmt ` chunk.
struct FormatChunk {
    code: u16,
    channel_count: u16,
    sample_rate: u32,
    bits: u16,
}

impl FormatChunk {
    fn parse(body: &[u8]) -> Result<Self, StretchError> {
        if body.len() < 16 {
            return Err(StretchError::InvalidFormat(
                "fmt chunk too short".to_string(),
            ));
        }
        Ok(Self {
            code: u16::from_le_bytes([body[0], body[1]]),
            channel_count: u16::from_le_bytes([body[2], body[3]]),
            sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
            // bytes 8..14 hold byte rate and block align, both derivable
            bits: u16::from_le_bytes([body[14], body[15]]),
        })
    }
}

/// Decodes an interleaved sample payload according to the format chunk.
fn decode_samples(payload: &[u8], format: &FormatChunk) -> Result<Vec<Sample>, StretchError> {
    match (format.code, format.bits) {
        (WAV_FORMAT_PCM, 16) => Ok(payload
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect()),
        (WAV_FORMAT_PCM, 24) => Ok(payload
            .chunks_exact(3)
            .map(|b| {
                // Load into the top three bytes; the arithmetic shift back
                // down sign-extends.
                let raw = i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8;
                raw as f32 / 8388608.0
            })
            .collect()),
        (WAV_FORMAT_IEEE_FLOAT, 32) => Ok(payload
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()),
        (code, bits) => Err(StretchError::InvalidFormat(format!(
            "Unsupported WAV format: code={}, bits={}",
            code, bits
        ))),
    }
}

/// Reads a WAV file from a byte slice.
pub fn read_wav(data: &[u8]) -> Result<AudioBlock, StretchError> {
    let riff_body = data
        .strip_prefix(b"RIFF")
        .ok_or_else(|| StretchError::InvalidFormat("Missing RIFF header".to_string()))?;
    if riff_body.len() < 8 || &riff_body[4..8] != b"WAVE" {
        return Err(StretchError::InvalidFormat(
            "Missing WAVE identifier".to_string(),
        ));
    }

    // Walk the chunk list. A truncated final chunk yields whatever bytes are
    // actually present.
    let mut remaining = &riff_body[8..];
    let mut format: Option<FormatChunk> = None;
    let mut payload: &[u8] = &[];
    while remaining.len() >= 8 {
        let (header, rest) = remaining.split_at(8);
        let declared = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let body = &rest[..declared.min(rest.len())];
        match &header[..4] {
            b"fmt " => format = Some(FormatChunk::parse(body)?),
            b"data" => payload = body,
            _ => {}
        }
        // Chunks are word-aligned; odd sizes carry a pad byte.
        let advance = (declared + declared % 2).min(rest.len());
        remaining = &rest[advance..];
    }

    let format = format
        .ok_or_else(|| StretchError::InvalidFormat("No fmt chunk found".to_string()))?;
    if format.channel_count == 0 {
        return Err(StretchError::InvalidFormat(
            "WAV has zero channels".to_string(),
        ));
    }
    if format.sample_rate == 0 {
        return Err(StretchError::InvalidFormat(
            "WAV has zero sample rate".to_string(),
        ));
    }

    let samples = decode_samples(payload, &format)?;
    Ok(AudioBlock::from_interleaved(
        &samples,
        format.channel_count as usize,
        format.sample_rate,
    ))
}

/// Reads a WAV file from disk.
pub fn read_wav_file(path: &str) -> Result<AudioBlock, StretchError> {
    let mut file =
        std::fs::File::open(path).map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    read_wav(&data)
}

/// Writes the 44-byte RIFF/fmt/data header.
fn write_header(out: &mut Vec<u8>, block: &AudioBlock, format_code: u16, bits_per_sample: u16) {
    let num_channels = block.channel_count() as u16;
    let bytes_per_sample = bits_per_sample as u32 / 8;
    let byte_rate = block.sample_rate * num_channels as u32 * bytes_per_sample;
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = (block.frame_count() * num_channels as usize) as u32 * bytes_per_sample;
    let file_size = 36 + data_size;

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    out.extend_from_slice(&format_code.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&block.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
}

/// Encodes an audio block as a WAV file (16-bit PCM).
///
/// Samples are clipped to [-1, 1], then negative values scale by 32768 and
/// non-negative by 32767 so both rails map onto the full i16 range.
pub fn write_wav_16bit(block: &AudioBlock) -> Vec<u8> {
    let interleaved = block.to_interleaved();
    let mut out = Vec::with_capacity(44 + interleaved.len() * 2);
    write_header(&mut out, block, WAV_FORMAT_PCM, 16);

    for &sample in &interleaved {
        let clamped = sample.clamp(-1.0, 1.0);
        let raw = if clamped < 0.0 {
            (clamped * 32768.0) as i16
        } else {
            (clamped * 32767.0) as i16
        };
        out.extend_from_slice(&raw.to_le_bytes());
    }

    out
}

/// Encodes an audio block as a WAV file (32-bit float).
pub fn write_wav_float(block: &AudioBlock) -> Vec<u8> {
    let interleaved = block.to_interleaved();
    let mut out = Vec::with_capacity(44 + interleaved.len() * 4);
    write_header(&mut out, block, WAV_FORMAT_IEEE_FLOAT, 32);

    for &sample in &interleaved {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    out
}

/// Writes a WAV file to disk (16-bit PCM).
pub fn write_wav_file_16bit(path: &str, block: &AudioBlock) -> Result<(), StretchError> {
    let data = write_wav_16bit(block);
    let mut file = std::fs::File::create(path)
        .map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    file.write_all(&data)
        .map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    Ok(())
}

/// Writes a WAV file to disk (32-bit float).
pub fn write_wav_file_float(path: &str, block: &AudioBlock) -> Result<(), StretchError> {
    let data = write_wav_float(block);
    let mut file = std::fs::File::create(path)
        .map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    file.write_all(&data)
        .map_err(|e| StretchError::IoError(format!("{}: {}", path, e)))?;
    Ok(())
}
