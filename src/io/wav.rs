use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::warn;

use crate::{
    error::{Error, Result},
    io::converter::to_pcm16,
    SAMPLE_RATE,
};

/*
Recording
=========

Canonical 16-bit PCM WAV at 44100 Hz, one or two channels. With at most two
channels and 16 bits the header is the plain 44-byte form:

  offset 4    data bytes + 36
  offset 40   data bytes

The writer is flushed after every block, which rewrites both size fields, so
the file stays playable if the process dies mid-run.
*/

pub const HEADER_LEN: usize = 44;
/// Default sample scale for recordings.
pub const DEFAULT_SCALER: f32 = 32768.0;

/// Most samples a file can hold before `data bytes + 36` leaves u32.
const MAX_SAMPLES: u64 = (u32::MAX as u64 - 36) / 2;

fn spec(channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn into_io(err: hound::Error) -> io::Error {
    match err {
        hound::Error::IoError(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

/// Streams a module's blocks into a 16-bit PCM WAV file.
pub struct WavRecorder {
    writer: Option<WavWriter<BufWriter<File>>>,
    path: PathBuf,
    scaler: f32,
    samples_written: u64,
}

impl WavRecorder {
    /// Create `path` and write a header with empty size fields.
    pub fn create(path: impl AsRef<Path>, channels: u16, scaler: f32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = WavWriter::create(&path, spec(channels))
            .and_then(|mut writer| writer.flush().map(|()| writer))
            .map_err(|err| Error::Record {
                path: path.clone(),
                source: into_io(err),
            })?;

        Ok(Self {
            writer: Some(writer),
            path,
            scaler,
            samples_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Samples written so far, counting both channels of a stereo frame.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Append a block and rewrite both size fields.
    ///
    /// Fails without writing anything once the file would outgrow the
    /// 32-bit RIFF size fields.
    pub fn write_block(&mut self, samples: &[f32]) -> io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        let total = self.samples_written + samples.len() as u64;
        if total > MAX_SAMPLES {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exceeds the WAV size limit", self.path.display()),
            ));
        }

        for &sample in samples {
            writer
                .write_sample(to_pcm16(sample, self.scaler))
                .map_err(into_io)?;
        }
        self.samples_written = total;

        writer.flush().map_err(into_io)
    }

    /// Patch the header one last time and close the file.
    pub fn finish(mut self) -> io::Result<()> {
        self.close()
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(into_io),
            None => Ok(()),
        }
    }
}

impl Drop for WavRecorder {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(path = %self.path.display(), %err, "failed to finalize recording");
        }
    }
}
