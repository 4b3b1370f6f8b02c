// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Text loader for model taxonomies.
//!
//! The format is line oriented. Each non-empty line is one statement; `#`
//! starts a comment that runs to the end of the line.
//!
//! ```raw
//! model <id>
//! subtype <child> <parent>
//! functionality <id>
//! restriction <owner> <model> <min> <max|*>
//! ```
//!
//! `restriction` attaches a cardinality restriction to a functionality (what
//! it requires) or to a resource model (what each instance offers). A `*` in
//! the `max` position means unbounded.

use crate::{
    resource::{CardinalityRestriction, ResourceModel},
    taxonomy::{InMemoryTaxonomy, TaxonomyBuilder},
};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// The error type for the taxonomy loading process.
#[derive(Debug)]
pub enum TaxonomyLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// A numeric token could not be parsed.
    Parse(ParseTokenError),
    /// A statement keyword is not recognised.
    UnexpectedToken { line: usize, token: String },
    /// A statement has too few or too many arguments.
    Arity {
        line: usize,
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    /// A statement references a model that was never declared while
    /// undeclared models are rejected.
    UnknownModel { line: usize, model: String },
    /// A restriction has `min > max`.
    InvalidRestriction { line: usize, min: u32, max: u32 },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The 1-based line the token appeared on.
    pub line: usize,
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into.
    pub type_name: &'static str,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: could not parse token '{}' as type {}",
            self.line, self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for TaxonomyLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::UnexpectedToken { line, token } => {
                write!(f, "Line {}: unexpected statement '{}'", line, token)
            }
            Self::Arity {
                line,
                keyword,
                expected,
                found,
            } => write!(
                f,
                "Line {}: '{}' expects {} arguments, found {}",
                line, keyword, expected, found
            ),
            Self::UnknownModel { line, model } => {
                write!(f, "Line {}: model '{}' was never declared", line, model)
            }
            Self::InvalidRestriction { line, min, max } => write!(
                f,
                "Line {}: restriction minimum {} exceeds maximum {}",
                line, min, max
            ),
        }
    }
}

impl std::error::Error for TaxonomyLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TaxonomyLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for TaxonomyLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

/// A configurable loader for taxonomy descriptions.
///
/// # Configuration
/// * `allow_unknown_models`: If false, `subtype` and `restriction` statements may
///   only reference models declared earlier with `model` (or, for restriction
///   owners, with `functionality`). Defaults to true.
///
/// # Examples
///
/// ```rust
/// # use muster_model::{loading::TaxonomyLoader, resource::ResourceModel, taxonomy::Taxonomy};
///
/// let text = "subtype StereoCamera Camera\n\
///             functionality ImageProvider\n\
///             restriction ImageProvider Camera 1 *\n";
/// let taxonomy = TaxonomyLoader::new().from_str(text).unwrap();
/// assert!(taxonomy.is_subtype_of(&"StereoCamera".into(), &"Camera".into()));
/// assert_eq!(taxonomy.all_functionalities(), vec![ResourceModel::new("ImageProvider")]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyLoader {
    allow_unknown_models: bool,
}

impl Default for TaxonomyLoader {
    fn default() -> Self {
        Self {
            allow_unknown_models: true,
        }
    }
}

impl TaxonomyLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether statements may reference undeclared models.
    #[inline]
    pub fn allow_unknown_models(mut self, yes: bool) -> Self {
        self.allow_unknown_models = yes;
        self
    }

    /// Loads a taxonomy from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<InMemoryTaxonomy, TaxonomyLoaderError> {
        let mut builder = TaxonomyBuilder::new();

        for (index, line) in rdr.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let Some((&keyword, args)) = tokens.split_first() else {
                continue;
            };

            match keyword {
                "model" => {
                    expect_arity(line_no, "model", args, 1)?;
                    builder.add_model(ResourceModel::new(args[0]));
                }
                "functionality" => {
                    expect_arity(line_no, "functionality", args, 1)?;
                    builder.add_functionality(ResourceModel::new(args[0]));
                }
                "subtype" => {
                    expect_arity(line_no, "subtype", args, 2)?;
                    let child = ResourceModel::new(args[0]);
                    let parent = ResourceModel::new(args[1]);
                    self.check_declared(&builder, line_no, &child)?;
                    self.check_declared(&builder, line_no, &parent)?;
                    builder.add_subtype(child, parent);
                }
                "restriction" => {
                    expect_arity(line_no, "restriction", args, 4)?;
                    let owner = ResourceModel::new(args[0]);
                    let model = ResourceModel::new(args[1]);
                    self.check_declared(&builder, line_no, &owner)?;
                    self.check_declared(&builder, line_no, &model)?;
                    let min = parse_u32(line_no, args[2])?;
                    let max = match args[3] {
                        "*" => None,
                        token => Some(parse_u32(line_no, token)?),
                    };
                    if let Some(max) = max.filter(|&max| min > max) {
                        return Err(TaxonomyLoaderError::InvalidRestriction {
                            line: line_no,
                            min,
                            max,
                        });
                    }
                    builder.add_restriction(owner, CardinalityRestriction::new(model, min, max));
                }
                other => {
                    return Err(TaxonomyLoaderError::UnexpectedToken {
                        line: line_no,
                        token: other.to_string(),
                    });
                }
            }
        }

        Ok(builder.build())
    }

    /// Loads a taxonomy from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<InMemoryTaxonomy, TaxonomyLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a taxonomy from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<InMemoryTaxonomy, TaxonomyLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a taxonomy from a string slice.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<InMemoryTaxonomy, TaxonomyLoaderError> {
        self.from_reader(s.as_bytes())
    }

    fn check_declared(
        &self,
        builder: &TaxonomyBuilder,
        line: usize,
        model: &ResourceModel,
    ) -> Result<(), TaxonomyLoaderError> {
        if self.allow_unknown_models || builder.is_declared(model) {
            return Ok(());
        }
        Err(TaxonomyLoaderError::UnknownModel {
            line,
            model: model.to_string(),
        })
    }
}

#[inline]
fn expect_arity(
    line: usize,
    keyword: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), TaxonomyLoaderError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(TaxonomyLoaderError::Arity {
            line,
            keyword,
            expected,
            found: args.len(),
        })
    }
}

#[inline]
fn parse_u32(line: usize, token: &str) -> Result<u32, ParseTokenError> {
    token.parse::<u32>().map_err(|_| ParseTokenError {
        line,
        token: token.to_string(),
        type_name: "u32",
    })
}
