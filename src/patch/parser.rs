use std::{fs, path::Path};

use tracing::debug;

use crate::{
    error::{ParseError, ParseErrorKind, Result},
    graph::{Constant, Graph, ModuleRef},
    patch::registry::{ParamKind, ParamValue, Params, Registry},
};

/*
Patch Text
==========

One module per line:

    type name(param, param, ...)

Commas, parentheses and whitespace all separate tokens, so
`Add mix(a,b)` and `Add mix a b` read the same. Parameters bind positionally
against the type's schema:

  float          must start with a digit           440, 0.5
  int            must start with a digit, truncated 2
  Module         digit → anonymous Constant         3
                 otherwise a mono instance name     lfo
  StereoModule   a stereo instance name             left_bus

Numbers are read up to the first character that cannot continue them, so
`440hz` binds 440.

Names can only refer to lines above them, so the file is its own topological
order and cycles cannot be written down. Redefining a name rebinds it; lines
that already used the old instance keep it.

Blank lines and lines starting with `#` are ignored.

Example:
    Sine lfo(0.5)
    Rescaler pitch(lfo, 200, 400)
    Sine tone(pitch)
    Pan output(tone, 0)
*/

const DELIMITERS: &[char] = &[',', '(', ')', ' ', '\t', '\r', '\n'];

fn starts_with_digit(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
}

/// Builds modules from patch lines into a [`Graph`].
pub struct PatchParser<'a> {
    registry: &'a Registry,
    graph: &'a mut Graph,
    line_number: usize,
}

impl<'a> PatchParser<'a> {
    pub fn new(registry: &'a Registry, graph: &'a mut Graph) -> Self {
        Self {
            registry,
            graph,
            line_number: 0,
        }
    }

    /// Parse every line of `text`, stopping at the first error.
    pub fn parse(&mut self, text: &str) -> Result<(), ParseError> {
        for line in text.lines() {
            self.add_module(line)?;
        }
        Ok(())
    }

    /// Parse one definition and bind the new module under its name.
    ///
    /// Returns `None` for blank and comment lines.
    pub fn add_module(&mut self, line: &str) -> Result<Option<ModuleRef>, ParseError> {
        self.line_number += 1;
        let line_number = self.line_number;
        let fail = |kind, token: &str| ParseError::new(kind, line_number, line, token);

        let body = line.trim();
        if body.is_empty() || body.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = line.split(DELIMITERS).filter(|token| !token.is_empty());
        let type_name = tokens.next().unwrap_or_default();
        let registry = self.registry;
        let descriptor = registry
            .get(type_name)
            .ok_or_else(|| fail(ParseErrorKind::UnknownModuleType, type_name))?;
        let name = tokens
            .next()
            .ok_or_else(|| fail(ParseErrorKind::MissingInstanceName, type_name))?;

        let mut values = Vec::with_capacity(descriptor.parameter_count());
        let mut last_token = name;
        for token in tokens {
            let spec = descriptor
                .parameter(values.len())
                .map_err(|kind| fail(kind, token))?;
            let value = self.bind(spec.kind, token).map_err(|kind| fail(kind, token))?;
            values.push(value);
            last_token = token;
        }

        if values.len() != descriptor.parameter_count() {
            return Err(fail(ParseErrorKind::TooFewParams, last_token));
        }

        let module = descriptor
            .instantiate(&Params::new(values))
            .map_err(|err| fail(ParseErrorKind::Instantiate(Box::new(err)), type_name))?;
        let module = ModuleRef::from_boxed(module);

        debug!(line = line_number, module = type_name, instance = name, "module instantiated");
        self.graph.insert(name, module.clone());
        Ok(Some(module))
    }

    fn bind(&mut self, kind: ParamKind, token: &str) -> Result<ParamValue, ParseErrorKind> {
        match kind {
            ParamKind::Float => parse_number(token)
                .map(ParamValue::Float)
                .ok_or(ParseErrorKind::ExpectingFloat),
            ParamKind::Int => parse_number(token)
                .map(|value| ParamValue::Int(value.trunc() as i64))
                .ok_or(ParseErrorKind::ExpectingInt),
            ParamKind::Module if starts_with_digit(token) => {
                let value = parse_number(token).ok_or(ParseErrorKind::ExpectingFloat)?;
                let constant = ModuleRef::new(Constant::new(value));
                self.graph.insert_anonymous(constant.clone());
                Ok(ParamValue::Module(constant))
            }
            ParamKind::Module => {
                let module = self.lookup(token)?;
                if module.is_stereo() {
                    return Err(ParseErrorKind::NotMono);
                }
                Ok(ParamValue::Module(module))
            }
            ParamKind::StereoModule => {
                if !token.starts_with(char::is_alphabetic) {
                    return Err(ParseErrorKind::ExpectingModule);
                }
                let module = self.lookup(token)?;
                if !module.is_stereo() {
                    return Err(ParseErrorKind::NotStereo);
                }
                Ok(ParamValue::StereoModule(module))
            }
            ParamKind::String => Err(ParseErrorKind::UnknownType),
        }
    }

    fn lookup(&self, name: &str) -> Result<ModuleRef, ParseErrorKind> {
        self.graph
            .get(name)
            .cloned()
            .ok_or(ParseErrorKind::UnknownModuleInstance)
    }
}

/// Numeric tokens must start with a digit; `-1` and `.5` are not numbers.
///
/// Only the leading number is read and anything after it is ignored, so
/// `440hz` is 440 and `1.5.2` is 1.5.
fn parse_number(token: &str) -> Option<f32> {
    if !starts_with_digit(token) {
        return None;
    }
    token[..numeric_prefix_len(token)].parse().ok()
}

/// Length of the longest `digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(token: &str) -> usize {
    let bytes = token.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = digits_from(0);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }
    end
}

/// Parse a whole patch into `graph`.
pub fn parse_patch(registry: &Registry, graph: &mut Graph, text: &str) -> Result<(), ParseError> {
    PatchParser::new(registry, graph).parse(text)
}

/// Read and parse a patch file into `graph`.
pub fn load_patch(registry: &Registry, graph: &mut Graph, path: impl AsRef<Path>) -> Result<()> {
    let text = fs::read_to_string(path)?;
    parse_patch(registry, graph, &text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        error::Error,
        graph::{HeldControls, Module, OutputRange},
        patch::ModuleDescriptor,
    };

    struct Probe;

    impl Module for Probe {
        fn name(&self) -> &str {
            "Probe"
        }

        fn output_range(&self) -> OutputRange {
            OutputRange::BIPOLAR
        }

        fn fill(&mut self, _timestamp: u64, out: &mut [f32]) -> Result<()> {
            out.fill(0.0);
            Ok(())
        }
    }

    fn registry() -> Registry {
        let extra = [
            ModuleDescriptor::new("Pitch", |params| {
                let _ = params.float(0)?;
                let _ = params.int(1)?;
                Ok(Box::new(Probe))
            })
            .with_param("hz", ParamKind::Float)
            .with_param("octave", ParamKind::Int),
            ModuleDescriptor::new("Label", |_| Ok(Box::new(Probe)))
                .with_param("text", ParamKind::String),
            ModuleDescriptor::new("Broken", |params| {
                params.stereo(0)?;
                Ok(Box::new(Probe))
            })
            .with_param("input", ParamKind::Module),
        ];
        let mut registry = Registry::standard(Rc::new(HeldControls::new()));
        for descriptor in extra {
            registry.register(descriptor);
        }
        registry
    }

    fn parse(text: &str) -> (Graph, Result<(), ParseError>) {
        let registry = registry();
        let mut graph = Graph::new();
        let result = parse_patch(&registry, &mut graph, text);
        (graph, result)
    }

    fn error_kind(text: &str) -> ParseErrorKind {
        parse(text).1.unwrap_err().kind
    }

    #[test]
    fn binds_positional_parameters() {
        let (graph, result) = parse("Sine lfo(2)\nAdd sum(lfo, 1)\n");
        result.unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("lfo"));
        assert!(graph.contains("sum"));
        // one literal for the frequency, one for the offset
        assert_eq!(graph.anonymous_count(), 2);
    }

    #[test]
    fn any_delimiter_separates_tokens() {
        let (graph, result) = parse("Add\tsum ( 1 ,2 )\r\n");
        result.unwrap();
        assert!(graph.contains("sum"));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let (graph, result) = parse("\n# a comment\n   \nConstant c(1)\n");
        result.unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn unknown_type_names_the_token_and_line() {
        let (_, result) = parse("Constant a(1)\nWobble w(1)\n");
        let err = result.unwrap_err();

        assert!(matches!(err.kind, ParseErrorKind::UnknownModuleType));
        assert_eq!(err.line_number, 2);
        assert_eq!(err.line, "Wobble w(1)");
        assert_eq!(err.token, "Wobble");
    }

    #[test]
    fn missing_instance_name() {
        assert!(matches!(
            error_kind("Constant"),
            ParseErrorKind::MissingInstanceName
        ));
    }

    #[test]
    fn float_and_int_need_leading_digit() {
        assert!(matches!(
            error_kind("Constant c(-1)"),
            ParseErrorKind::ExpectingFloat
        ));
        assert!(matches!(
            error_kind("Constant c(.5)"),
            ParseErrorKind::ExpectingFloat
        ));
        assert!(matches!(
            error_kind("Pitch p(440, x)"),
            ParseErrorKind::ExpectingInt
        ));
    }

    #[test]
    fn trailing_characters_after_number_are_ignored() {
        assert_eq!(parse_number("440hz"), Some(440.0));
        assert_eq!(parse_number("1.5.2"), Some(1.5));
        assert_eq!(parse_number("2x"), Some(2.0));
        assert_eq!(parse_number("3."), Some(3.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("5e-x"), Some(5.0));
        assert_eq!(parse_number("x1"), None);

        let (graph, result) = parse("Sine a(440hz)\nConstant c(1.5.2)\nInput i(2x)\nInput j(1st)\n");
        result.unwrap();

        assert_eq!(graph.anonymous_count(), 1);
        assert_eq!(graph.get("c").unwrap().output_range(), OutputRange::point(1.5));
        // axis 2 is the only unipolar one
        assert_eq!(graph.get("i").unwrap().output_range(), OutputRange::UNIPOLAR);
        assert_eq!(graph.get("j").unwrap().output_range(), OutputRange::BIPOLAR);
    }

    #[test]
    fn literal_prefix_feeds_anonymous_constant() {
        let (graph, result) = parse("Add sum(3volts, 4)\n");
        result.unwrap();

        let sum = graph.get("sum").unwrap();
        assert_eq!(sum.output_range(), OutputRange::point(7.0));
    }

    #[test]
    fn int_is_truncated() {
        let (graph, result) = parse("Input pressure(2.9)");
        result.unwrap();
        let input = graph.get("pressure").unwrap();
        assert_eq!(input.output_range(), OutputRange::UNIPOLAR);
    }

    #[test]
    fn forward_reference_is_unknown_instance() {
        let err = parse("Add sum(later, 1)\nConstant later(1)\n").1.unwrap_err();

        assert!(matches!(err.kind, ParseErrorKind::UnknownModuleInstance));
        assert_eq!(err.token, "later");
    }

    #[test]
    fn stereo_into_mono_slot_is_not_mono() {
        assert!(matches!(
            error_kind("Pan wide(0, 0)\nSine s(wide)\n"),
            ParseErrorKind::NotMono
        ));
    }

    #[test]
    fn mono_into_stereo_slot_is_not_stereo() {
        assert!(matches!(
            error_kind("Pan wide(0, 0)\nConstant c(1)\nStereoAdd both(wide, c)\n"),
            ParseErrorKind::NotStereo
        ));
    }

    #[test]
    fn stereo_literal_is_rejected() {
        assert!(matches!(
            error_kind("Pan wide(0, 0)\nStereoAdd both(wide, 1)\n"),
            ParseErrorKind::ExpectingModule
        ));
    }

    #[test]
    fn string_parameters_are_unsupported() {
        assert!(matches!(
            error_kind("Label l(hello)"),
            ParseErrorKind::UnknownType
        ));
    }

    #[test]
    fn arity_is_exact() {
        assert!(matches!(
            error_kind("Add sum(1, 2, 3)"),
            ParseErrorKind::TooManyParams
        ));
        assert!(matches!(
            error_kind("Add sum(1)"),
            ParseErrorKind::TooFewParams
        ));
        assert!(matches!(error_kind("Add sum"), ParseErrorKind::TooFewParams));
    }

    #[test]
    fn factory_errors_are_wrapped() {
        let kind = error_kind("Broken b(1)");
        match kind {
            ParseErrorKind::Instantiate(inner) => assert!(matches!(
                *inner,
                Error::ParameterMismatch {
                    index: 0,
                    expected: ParamKind::StereoModule
                }
            )),
            other => panic!("expected Instantiate, got {other:?}"),
        }
    }

    #[test]
    fn redefinition_keeps_earlier_references() {
        let (graph, result) = parse("Constant x(1)\nAdd y(x, 0)\nConstant x(5)\n");
        result.unwrap();

        let y = graph.get("y").unwrap();
        assert!(y.output(1, 4).unwrap().iter().all(|&s| s == 1.0));
        let x = graph.get("x").unwrap();
        assert_eq!(x.output_range(), OutputRange::point(5.0));
    }

    #[test]
    fn parser_counts_lines_across_calls() {
        let registry = registry();
        let mut graph = Graph::new();
        let mut parser = PatchParser::new(&registry, &mut graph);

        parser.add_module("Constant a(1)").unwrap();
        parser.add_module("").unwrap();
        let err = parser.add_module("Constant b(x)").unwrap_err();
        assert_eq!(err.line_number, 3);
    }
}
