// Purpose - external interfaces, format conversions

pub mod converter;
pub mod wav;

pub use wav::{WavRecorder, DEFAULT_SCALER};
