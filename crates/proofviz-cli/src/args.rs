//! Command-line argument definitions for the ProofViz CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input documents, the output path
//! and format, an optional selection, configuration file selection, and
//! logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the ProofViz tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Graph documents (JSON), applied in order to one session
    #[arg(required = true, num_args = 1.., help = "Paths to the input graph documents")]
    pub inputs: Vec<String>,

    /// Output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    pub format: Format,

    /// Focus the neighborhood of this node id
    #[arg(long, conflicts_with = "concept")]
    pub select: Option<String>,

    /// Focus the nodes that use this key concept
    #[arg(long)]
    pub concept: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Output format of the final scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Svg,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["proofviz", "proof.json"]).unwrap();
        assert_eq!(args.inputs, vec!["proof.json"]);
        assert_eq!(args.format, Format::Svg);
        assert!(args.output.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_multiple_inputs_and_json() {
        let args = Args::try_parse_from([
            "proofviz", "v1.json", "v2.json", "--format", "json", "-o", "out.json",
        ])
        .unwrap();
        assert_eq!(args.inputs, vec!["v1.json", "v2.json"]);
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.output.as_deref(), Some("out.json"));
    }

    #[test]
    fn test_select_conflicts_with_concept() {
        let result = Args::try_parse_from([
            "proofviz", "p.json", "--select", "N1", "--concept", "Lemma",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["proofviz"]).is_err());
    }
}
