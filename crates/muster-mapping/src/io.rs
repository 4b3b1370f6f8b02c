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

//! Text persistence for functionality mappings.
//!
//! ```raw
//! # AVAILABLE RESOURCES
//! <model> <count>
//! # AVAILABLE FUNCTIONALITIES
//! <functionality>
//! # SATURATION BOUND
//! <model> <count>
//! ---
//! # FUNCTIONALITY
//! <functionality>
//! # AGENTS (MODEL POOLS)
//! <model> <count>
//!
//! <model> <count>
//! ```
//!
//! The five headers and `---` are structural. Any other line starting with
//! `#` is a comment. Inside an agents section a blank line ends one
//! combination. Loading fails as a whole on the first malformed line.

use crate::mapping::FunctionalityMapping;
use muster_model::{
    pool::ModelPool,
    resource::{Functionality, ResourceModel},
};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

const RESOURCES_HEADER: &str = "# AVAILABLE RESOURCES";
const FUNCTIONALITIES_HEADER: &str = "# AVAILABLE FUNCTIONALITIES";
const SATURATION_HEADER: &str = "# SATURATION BOUND";
const BLOCK_SEPARATOR: &str = "---";
const FUNCTIONALITY_HEADER: &str = "# FUNCTIONALITY";
const AGENTS_HEADER: &str = "# AGENTS (MODEL POOLS)";

/// The error type for reading and writing mapping files.
#[derive(Debug)]
pub enum MappingFileError {
    /// An I/O error occurred while reading or writing.
    Io(std::io::Error),
    /// A line does not fit the format.
    Malformed { line: usize, reason: String },
    /// An identifier cannot be written without breaking the format.
    InvalidIdentifier(String),
    /// A recorded combination is empty and has no textual form.
    EmptyCombination(Functionality),
}

impl Display for MappingFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Malformed { line, reason } => {
                write!(f, "Line {}: malformed mapping file: {}", line, reason)
            }
            Self::InvalidIdentifier(id) => write!(f, "invalid identifier '{}'", id),
            Self::EmptyCombination(functionality) => {
                write!(f, "functionality '{}' has an empty combination", functionality)
            }
        }
    }
}

impl std::error::Error for MappingFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MappingFileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

fn check_identifier(id: &ResourceModel) -> Result<(), MappingFileError> {
    let s = id.as_str();
    if s.is_empty() || id.contains_whitespace() || s.starts_with('#') || s == BLOCK_SEPARATOR {
        return Err(MappingFileError::InvalidIdentifier(s.to_string()));
    }
    Ok(())
}

fn write_pool<W: Write>(w: &mut W, pool: &ModelPool) -> Result<(), MappingFileError> {
    for (model, count) in pool.iter().filter(|&(_, count)| count > 0) {
        check_identifier(model)?;
        writeln!(w, "{} {}", model, count)?;
    }
    Ok(())
}

/// Writes `mapping` to `writer`.
pub fn save<W: Write>(mapping: &FunctionalityMapping, mut w: W) -> Result<(), MappingFileError> {
    writeln!(w, "{}", RESOURCES_HEADER)?;
    write_pool(&mut w, mapping.model_pool())?;
    writeln!(w, "{}", FUNCTIONALITIES_HEADER)?;
    for functionality in mapping.functionalities() {
        check_identifier(functionality)?;
        writeln!(w, "{}", functionality)?;
    }
    writeln!(w, "{}", SATURATION_HEADER)?;
    write_pool(&mut w, mapping.saturation_bound())?;

    for (functionality, pools) in mapping.iter() {
        writeln!(w, "{}", BLOCK_SEPARATOR)?;
        writeln!(w, "{}", FUNCTIONALITY_HEADER)?;
        writeln!(w, "{}", functionality)?;
        writeln!(w, "{}", AGENTS_HEADER)?;
        for (i, pool) in pools.iter().enumerate() {
            if pool.is_empty() {
                return Err(MappingFileError::EmptyCombination(functionality.clone()));
            }
            if i > 0 {
                writeln!(w)?;
            }
            write_pool(&mut w, pool)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Writes `mapping` to the file at `path`, replacing it.
pub fn save_to_path<P: AsRef<Path>>(
    mapping: &FunctionalityMapping,
    path: P,
) -> Result<(), MappingFileError> {
    let file = File::create(path)?;
    save(mapping, BufWriter::new(file))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Resources,
    Functionalities,
    Saturation,
    BlockStart,
    FunctionalityName,
    AgentsHeader,
    Agents,
}

fn malformed(line: usize, reason: impl Into<String>) -> MappingFileError {
    MappingFileError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn parse_entry(line_no: usize, content: &str) -> Result<(ResourceModel, u32), MappingFileError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let [model, count] = tokens.as_slice() else {
        return Err(malformed(line_no, format!("expected '<model> <count>', found '{}'", content)));
    };
    let count: u32 = count
        .parse()
        .map_err(|_| malformed(line_no, format!("could not parse count '{}'", count)))?;
    if count == 0 {
        return Err(malformed(line_no, format!("zero count for model '{}'", model)));
    }
    Ok((ResourceModel::new(model), count))
}

fn parse_name(line_no: usize, content: &str) -> Result<ResourceModel, MappingFileError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens.as_slice() {
        [name] => Ok(ResourceModel::new(name)),
        _ => Err(malformed(line_no, format!("expected one identifier, found '{}'", content))),
    }
}

fn add_entry(
    line_no: usize,
    pool: &mut ModelPool,
    (model, count): (ResourceModel, u32),
) -> Result<(), MappingFileError> {
    if pool.contains(&model) {
        return Err(malformed(line_no, format!("model '{}' listed twice", model)));
    }
    pool.add(model, count);
    Ok(())
}

/// Collects the state of a partially read file.
#[derive(Debug, Default)]
struct Reader {
    model_pool: ModelPool,
    functionalities: Vec<Functionality>,
    saturation_bound: ModelPool,
    mapping: Option<FunctionalityMapping>,
    current: Option<Functionality>,
    combination: ModelPool,
}

impl Reader {
    fn mapping(&mut self) -> &mut FunctionalityMapping {
        self.mapping.get_or_insert_with(|| {
            FunctionalityMapping::new(
                self.model_pool.clone(),
                self.functionalities.iter().cloned(),
                self.saturation_bound.clone(),
            )
        })
    }

    fn finish_combination(&mut self, line_no: usize) -> Result<(), MappingFileError> {
        if self.combination.is_empty() {
            return Ok(());
        }
        let combination = std::mem::take(&mut self.combination);
        let Some(functionality) = self.current.clone() else {
            return Err(malformed(line_no, "combination outside of a functionality block"));
        };
        let added = self
            .mapping()
            .add(functionality, combination)
            .map_err(|e| malformed(line_no, e.to_string()))?;
        if !added {
            return Err(malformed(line_no, "combination listed twice"));
        }
        Ok(())
    }

    fn into_mapping(self) -> FunctionalityMapping {
        match self.mapping {
            Some(mapping) => mapping,
            None => FunctionalityMapping::new(
                self.model_pool,
                self.functionalities,
                self.saturation_bound,
            ),
        }
    }
}

/// Reads a mapping from a type implementing `BufRead`.
pub fn load<R: BufRead>(reader: R) -> Result<FunctionalityMapping, MappingFileError> {
    let mut section = Section::Start;
    let mut state = Reader::default();
    let mut last_line = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let line = line?;
        let content = line.trim();

        if content.is_empty() {
            if section == Section::Agents {
                state.finish_combination(line_no)?;
            }
            continue;
        }

        section = match (section, content) {
            (Section::Start, RESOURCES_HEADER) => Section::Resources,
            (Section::Resources, FUNCTIONALITIES_HEADER) => Section::Functionalities,
            (Section::Functionalities, SATURATION_HEADER) => Section::Saturation,
            (Section::Saturation | Section::Agents, BLOCK_SEPARATOR) => {
                state.finish_combination(line_no)?;
                state.current = None;
                Section::BlockStart
            }
            (Section::BlockStart, FUNCTIONALITY_HEADER) => Section::FunctionalityName,
            (Section::AgentsHeader, AGENTS_HEADER) => Section::Agents,
            (
                _,
                RESOURCES_HEADER | FUNCTIONALITIES_HEADER | SATURATION_HEADER | BLOCK_SEPARATOR
                | FUNCTIONALITY_HEADER | AGENTS_HEADER,
            ) => {
                return Err(malformed(line_no, format!("unexpected section marker '{}'", content)));
            }
            (current, _) if content.starts_with('#') => current,
            (Section::Resources, _) => {
                add_entry(line_no, &mut state.model_pool, parse_entry(line_no, content)?)?;
                Section::Resources
            }
            (Section::Functionalities, _) => {
                state.functionalities.push(parse_name(line_no, content)?);
                Section::Functionalities
            }
            (Section::Saturation, _) => {
                add_entry(line_no, &mut state.saturation_bound, parse_entry(line_no, content)?)?;
                Section::Saturation
            }
            (Section::FunctionalityName, _) => {
                let functionality = parse_name(line_no, content)?;
                if !state.functionalities.contains(&functionality) {
                    return Err(malformed(
                        line_no,
                        format!("functionality '{}' was not declared", functionality),
                    ));
                }
                state.current = Some(functionality);
                Section::AgentsHeader
            }
            (Section::Agents, _) => {
                add_entry(line_no, &mut state.combination, parse_entry(line_no, content)?)?;
                Section::Agents
            }
            (Section::Start | Section::BlockStart | Section::AgentsHeader, _) => {
                return Err(malformed(line_no, format!("unexpected line '{}'", content)));
            }
        };
    }

    match section {
        Section::Saturation | Section::Agents => {
            state.finish_combination(last_line)?;
            Ok(state.into_mapping())
        }
        _ => Err(malformed(last_line, "unexpected end of file")),
    }
}

/// Reads a mapping from a type implementing `Read`.
#[inline]
pub fn load_from_reader<R: Read>(reader: R) -> Result<FunctionalityMapping, MappingFileError> {
    load(BufReader::new(reader))
}

/// Reads a mapping from a string.
#[inline]
pub fn load_from_str(s: &str) -> Result<FunctionalityMapping, MappingFileError> {
    load(s.as_bytes())
}

/// Reads a mapping from the file at `path`.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FunctionalityMapping, MappingFileError> {
    let file = File::open(path)?;
    load_from_reader(file)
}
