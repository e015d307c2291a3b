//! Linear-PCM WAV writing

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::domain::recording::SampleBuffer;

/// Scale a float sample in [-1.0, 1.0] to signed 16-bit.
///
/// Input is clamped first so clipped audio saturates instead of
/// wrapping on the integer conversion.
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Write the buffer as a canonical 16-bit PCM WAV file.
pub fn write(buffer: &SampleBuffer, path: &Path) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()
}
