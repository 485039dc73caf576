//! Live playback through the default audio device

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Sample,
};
use patchbay::{Driver, SAMPLE_RATE};
use rtrb::RingBuffer;
use tracing::{error, info, warn};

/// Blocks of headroom between the render loop and the audio callback.
const QUEUED_BLOCKS: usize = 4;

/// Render blocks on this thread and stream them to the audio device.
///
/// The graph never leaves the calling thread: finished blocks travel to the
/// device callback as interleaved i16 through a lock-free ring buffer. Runs
/// until the process is interrupted or a block fails to render.
pub fn play(mut driver: Driver, block_size: usize) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let channels = config.channels() as usize;
    let sample_rate = config.sample_rate().0;
    if sample_rate != SAMPLE_RATE {
        warn!(sample_rate, expected = SAMPLE_RATE, "device rate differs, pitch will be off");
    }
    info!(channels, sample_rate, block_size, "opening audio stream");

    let (mut producer, mut consumer) = RingBuffer::<i16>::new(block_size * 2 * QUEUED_BLOCKS);

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            for frame in data.chunks_mut(channels) {
                let left = consumer.pop().unwrap_or(0);
                let right = consumer.pop().unwrap_or(0);
                for (ch, out) in frame.iter_mut().enumerate() {
                    let sample = match ch {
                        0 => left,
                        1 => right,
                        _ => 0,
                    };
                    *out = f32::from_sample(sample);
                }
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    stream.play()?;
    info!("playing, press Ctrl+C to stop");

    let mut pcm = vec![0i16; block_size * 2];
    loop {
        while producer.slots() < pcm.len() {
            thread::sleep(Duration::from_millis(1));
        }

        let frames = driver.render_pcm(&mut pcm)?;
        for &sample in &pcm[..frames * 2] {
            // slots were checked above, a full queue cannot happen here
            let _ = producer.push(sample);
        }
    }
}
