use std::{io, path::PathBuf};

use crate::{graph::OutputRange, patch::ParamKind};

/// Errors raised while building or evaluating a patch.
///
/// None of these are recoverable at this layer: a malformed patch fails before
/// any audio is produced and a contract violation stops evaluation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An input's declared range is wider than what its consumer accepts.
    #[error("invalid input range: {input} {input_range} for {module} {accepted}")]
    InvalidInputRange {
        input: String,
        input_range: OutputRange,
        module: String,
        accepted: OutputRange,
    },

    /// A module emitted a sample outside its own declared range.
    #[error("invalid output range: {module}: {} <= {value} <= {}", .range.min, .range.max)]
    InvalidOutputRange {
        module: String,
        range: OutputRange,
        value: f32,
    },

    #[error("no output module: the patch must define an instance named `output`")]
    NoOutputModule,

    #[error("output not stereo: the `output` instance must be a stereo module")]
    OutputNotStereo,

    #[error("unknown module instance `{0}`")]
    UnknownInstance(String),

    #[error("unknown parameter type `{0}`")]
    UnknownParamKind(String),

    /// A factory asked for a parameter of a kind its schema did not bind.
    #[error("parameter {index} is not a {expected}")]
    ParameterMismatch { index: usize, expected: ParamKind },

    #[error("couldn't open {} for writing", .path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A patch line that failed to parse, with the offending line and token.
#[derive(Debug, thiserror::Error)]
#[error("parse error on line {line_number}: {kind} at `{token}` in `{line}`")]
pub struct ParseError {
    pub line_number: usize,
    pub line: String,
    pub token: String,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line_number: usize, line: &str, token: &str) -> Self {
        Self {
            line_number,
            line: line.trim_end().to_owned(),
            token: token.to_owned(),
            kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unknown module type")]
    UnknownModuleType,
    #[error("missing instance name")]
    MissingInstanceName,
    #[error("expecting a float")]
    ExpectingFloat,
    #[error("expecting an int")]
    ExpectingInt,
    #[error("expecting module name")]
    ExpectingModule,
    #[error("unknown module instance")]
    UnknownModuleInstance,
    #[error("unknown type")]
    UnknownType,
    #[error("module not stereo")]
    NotStereo,
    #[error("module not mono")]
    NotMono,
    #[error("too many parameters")]
    TooManyParams,
    #[error("too few parameters")]
    TooFewParams,
    #[error("failed to instantiate module")]
    Instantiate(#[source] Box<Error>),
}
