//! Rename target derivation.
//!
//! A rule is a literal prefix plus an optional template. Template tokens:
//! `{n}` zero-padded sequence index, `{name}` original stem, `{num}` the
//! episode number found in the stem (`EP<digits>` first, else the first run of
//! digits). The original extension is always appended verbatim.

use std::collections::HashMap;
use std::ffi::OsStr;

use regex::Regex;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::SkipReason;
use crate::validate::name_fragment;

const EPISODE_PATTERN: &str = r"EP(\d+)";
const DIGITS_PATTERN: &str = r"\d+";
const MIN_SEQUENCE_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Sequence,
    Stem,
    Number,
}

/// Extracts the episode number from a file stem.
#[derive(Debug, Clone)]
struct NumberExtractor {
    episode: Regex,
    digits: Regex,
}

impl NumberExtractor {
    fn new() -> FsOpsResult<Self> {
        let compile = |pattern: &'static str| {
            Regex::new(pattern).map_err(|source| FsOpsError::Pattern { pattern, source })
        };
        Ok(Self {
            episode: compile(EPISODE_PATTERN)?,
            digits: compile(DIGITS_PATTERN)?,
        })
    }

    fn extract<'h>(&self, stem: &'h str) -> Option<&'h str> {
        self.episode
            .captures(stem)
            .and_then(|captures| captures.get(1))
            .or_else(|| self.digits.find(stem))
            .map(|found| found.as_str())
    }
}

/// Parsed `custom_pattern`.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
    numbers: Option<NumberExtractor>,
}

impl Template {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on an unknown token, an unclosed `{`, a path
    /// separator in the literal text, or a template that contains neither
    /// `{n}` nor `{num}` (every file would receive the same name).
    pub fn parse(raw: &str) -> FsOpsResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                FsOpsError::invalid("custom_pattern", "unclosed_brace", Some(raw.to_string()))
            })?;
            let segment = match &after[..close] {
                "n" => Segment::Sequence,
                "name" => Segment::Stem,
                "num" => Segment::Number,
                token => {
                    return Err(FsOpsError::invalid(
                        "custom_pattern",
                        "unknown_token",
                        Some(format!("{{{token}}}")),
                    ));
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for segment in &segments {
            if let Segment::Literal(text) = segment {
                name_fragment("custom_pattern", text)?;
            }
        }
        if !segments
            .iter()
            .any(|segment| matches!(segment, Segment::Sequence | Segment::Number))
        {
            return Err(FsOpsError::invalid(
                "custom_pattern",
                "missing_placeholder",
                Some(raw.to_string()),
            ));
        }

        let numbers = if segments.contains(&Segment::Number) {
            Some(NumberExtractor::new()?)
        } else {
            None
        };
        Ok(Self { segments, numbers })
    }

    fn uses_sequence(&self) -> bool {
        self.segments.contains(&Segment::Sequence)
    }

    /// Render for one file; `None` when `{num}` is present but the stem has no digits.
    fn render(&self, stem: &str, sequence: usize, width: usize) -> Option<String> {
        let number = match &self.numbers {
            Some(extractor) => Some(extractor.extract(stem)?),
            None => None,
        };
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Sequence => rendered.push_str(&format!("{sequence:0width$}")),
                Segment::Stem => rendered.push_str(stem),
                Segment::Number => rendered.push_str(number.unwrap_or_default()),
            }
        }
        Some(rendered)
    }
}

/// Outcome of name derivation for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedName {
    /// New base name.
    Name(String),
    /// File is left alone.
    Skip(SkipReason),
}

impl DerivedName {
    fn checked(name: String) -> Self {
        if name == "." || name == ".." {
            Self::Skip(SkipReason::ReservedName)
        } else {
            Self::Name(name)
        }
    }
}

/// Prefix plus optional template.
#[derive(Debug, Clone)]
pub struct RenameRule {
    prefix: String,
    template: Option<Template>,
}

impl RenameRule {
    /// Build a rule from the raw request fields.
    ///
    /// A blank `custom_pattern` means no template. A whitespace-only prefix is
    /// treated as empty; otherwise the prefix is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when both fields are blank, when the prefix holds
    /// a path separator, or when the template fails to parse.
    pub fn new(prefix: &str, custom_pattern: &str) -> FsOpsResult<Self> {
        let pattern = custom_pattern.trim();
        let template = if pattern.is_empty() {
            None
        } else {
            Some(Template::parse(pattern)?)
        };
        let prefix = if prefix.trim().is_empty() {
            if template.is_none() {
                return Err(FsOpsError::invalid("prefix", "blank", None));
            }
            String::new()
        } else {
            name_fragment("prefix", prefix)?;
            prefix.to_string()
        };
        Ok(Self { prefix, template })
    }

    /// Literal prefix prepended to every new name.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive new names for the files of one folder, in the given order.
    ///
    /// The sequence index starts at 1 and advances once per file that consumes it.
    #[must_use]
    pub fn derive_names(&self, names: &[&OsStr]) -> Vec<DerivedName> {
        let width = sequence_width(names.len());
        match &self.template {
            Some(template) => self.derive_templated(template, names, width),
            None => self.derive_plain(names, width),
        }
    }

    fn derive_templated(
        &self,
        template: &Template,
        names: &[&OsStr],
        width: usize,
    ) -> Vec<DerivedName> {
        let mut sequence = 0usize;
        let mut derived = Vec::with_capacity(names.len());
        for name in names {
            let Some(name) = name.to_str() else {
                derived.push(DerivedName::Skip(SkipReason::InvalidName));
                continue;
            };
            let (stem, extension) = split_extension(name);
            match template.render(stem, sequence + 1, width) {
                Some(rendered) => {
                    if template.uses_sequence() {
                        sequence += 1;
                    }
                    derived.push(DerivedName::checked(format!(
                        "{}{rendered}{extension}",
                        self.prefix
                    )));
                }
                None => derived.push(DerivedName::Skip(SkipReason::NoNumber)),
            }
        }
        derived
    }

    fn derive_plain(&self, names: &[&OsStr], width: usize) -> Vec<DerivedName> {
        let extensions: Vec<Option<&str>> = names
            .iter()
            .map(|name| name.to_str().map(|name| split_extension(name).1))
            .collect();
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for extension in extensions.iter().flatten() {
            *occurrences.entry(*extension).or_default() += 1;
        }

        let mut sequence = 0usize;
        extensions
            .iter()
            .map(|extension| match extension {
                None => DerivedName::Skip(SkipReason::InvalidName),
                Some(extension) if occurrences.get(extension).copied().unwrap_or(0) > 1 => {
                    sequence += 1;
                    DerivedName::checked(format!("{}{sequence:0width$}{extension}", self.prefix))
                }
                Some(extension) => DerivedName::checked(format!("{}{extension}", self.prefix)),
            })
            .collect()
    }
}

/// Split at the last `.`; a leading dot alone is not an extension.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => (&name[..index], &name[index..]),
        _ => (name, ""),
    }
}

fn sequence_width(count: usize) -> usize {
    let mut digits = 1;
    let mut remaining = count / 10;
    while remaining > 0 {
        digits += 1;
        remaining /= 10;
    }
    digits.max(MIN_SEQUENCE_WIDTH)
}
