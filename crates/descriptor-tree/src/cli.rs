//! Core of the `descriptor-convert` binary: converts a document between
//! JSON text, XML text and the binary codec.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::descriptor::Descriptor;
use crate::error::DescriptorError;
use crate::xml::{XmlElement, XmlOptions};

/// Environment variable holding the log filter, in `RUST_LOG` syntax.
pub const LOG_ENV: &str = "DESCRIPTOR_LOG";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Document encodings the converter reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
    Bin,
}

impl FromStr for Format {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "bin" | "binary" => Ok(Format::Bin),
            other => Err(CliError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Indent JSON and XML output.
    pub pretty: bool,
    pub xml: XmlOptions,
}

/// Parsed command line of `descriptor-convert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub from: Format,
    pub to: Format,
    pub options: ConvertOptions,
}

impl Args {
    /// Parses the arguments after the program name. Both formats default
    /// to JSON.
    pub fn parse<I, S>(args: I) -> Result<Args, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Args {
            from: Format::Json,
            to: Format::Json,
            options: ConvertOptions::default(),
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let mut value = || {
                args.next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| CliError::MissingValue(arg.to_string()))
            };
            match arg {
                "--from" => parsed.from = value()?.parse()?,
                "--to" => parsed.to = value()?.parse()?,
                "--root" => parsed.options.xml.root_tag = value()?,
                "--item" => parsed.options.xml.item_tag = value()?,
                "--pretty" => parsed.options.pretty = true,
                other => return Err(CliError::UnknownArgument(other.to_string())),
            }
        }
        Ok(parsed)
    }
}

/// Reads `input` as `from` and re-encodes it as `to`.
pub fn convert(
    input: &[u8],
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<Vec<u8>, CliError> {
    let document = match from {
        Format::Bin => Descriptor::decode(input)?,
        Format::Json => Descriptor::from_json_str(text(input)?.trim())?,
        Format::Xml => Descriptor::from_xml(&XmlElement::parse(text(input)?)?),
    };

    let output = match to {
        Format::Bin => return Ok(document.encode()),
        Format::Json if options.pretty => document.to_json_string_pretty()?,
        Format::Json => document.to_json_string()?,
        Format::Xml => {
            let element = document.to_xml_with(&options.xml);
            if options.pretty {
                element.to_xml_string_pretty()
            } else {
                element.to_xml_string()
            }
        }
    };
    Ok(output.into_bytes())
}

fn text(input: &[u8]) -> Result<&str, CliError> {
    std::str::from_utf8(input).map_err(|_| CliError::InvalidUtf8)
}

/// Installs a stderr `fmt` subscriber filtered by [`LOG_ENV`], falling back
/// to `RUST_LOG`. Does nothing when neither variable is set.
pub fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };
    // A subscriber installed by the embedding program takes precedence.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
