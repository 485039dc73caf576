/// Scale used when handing output blocks to the playback device.
pub const PLAYBACK_SCALER: f32 = 32767.0;

/// Convert one sample to 16-bit PCM by truncating `sample * scaler`.
///
/// Values beyond the i16 range saturate; NaN becomes 0.
#[inline]
pub fn to_pcm16(sample: f32, scaler: f32) -> i16 {
    (sample * scaler) as i16
}

/// Convert a block sample by sample. Stops at the shorter of the two slices.
pub fn block_to_pcm16(input: &[f32], out: &mut [i16], scaler: f32) {
    for (o, &sample) in out.iter_mut().zip(input) {
        *o = to_pcm16(sample, scaler);
    }
}

/// Convert interleaved stereo floats for playback.
///
/// Each channel is scaled on its own; left and right are never summed.
pub fn stereo_to_pcm16(interleaved: &[f32], out: &mut [i16]) {
    block_to_pcm16(interleaved, out, PLAYBACK_SCALER);
}
