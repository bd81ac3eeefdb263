//! Credential line matching module
//!
//! Recognizes the supported credential line layouts, pulls out the
//! identifier/secret pair and decides whether a pair belongs in the
//! requested output (email or username combos).

use crate::error::ExtractError;
use clap::ValueEnum;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Strict email shape used when email validation is enabled
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Line layouts, in the order they are tried
pub mod patterns {
    /// `http(s)://host:identifier:secret`
    pub const URL_TRIPLE: &str = r"^https?://[^:]+:([^:]+):(.+)$";

    /// `identifier:secret` with no pipe, tab or extra colon on either side
    pub const COLON_PAIR: &str = r"^([^:|\t]+):([^:|\t]+)$";

    /// `identifier|secret`
    pub const PIPE_PAIR: &str = r"^([^|]+)\|(.+)$";

    /// `identifier<TAB>secret`
    pub const TAB_PAIR: &str = r"^([^\t]+)\t(.+)$";
}

/// Which line layout produced a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialFormat {
    UrlTriple,
    ColonPair,
    PipePair,
    TabPair,
}

impl CredentialFormat {
    /// All formats in matching priority order
    pub const ALL: [CredentialFormat; 4] = [
        CredentialFormat::UrlTriple,
        CredentialFormat::ColonPair,
        CredentialFormat::PipePair,
        CredentialFormat::TabPair,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Self::UrlTriple => patterns::URL_TRIPLE,
            Self::ColonPair => patterns::COLON_PAIR,
            Self::PipePair => patterns::PIPE_PAIR,
            Self::TabPair => patterns::TAB_PAIR,
        }
    }
}

/// Requested kind of identifier in the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Keep only email-shaped identifiers
    #[default]
    Email,
    /// Keep only non-email identifiers
    User,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::User => "user",
        }
    }

    /// Whether an identifier with the given email-ness belongs in this output
    #[inline]
    pub fn accepts(&self, is_email: bool) -> bool {
        match self {
            Self::Email => is_email,
            Self::User => !is_email,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "user" => Ok(Self::User),
            other => Err(ExtractError::InvalidOptions(format!(
                "unsupported output format '{}' (expected 'email' or 'user')",
                other
            ))),
        }
    }
}

/// An identifier/secret pair pulled from one line, both sides trimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub identifier: &'a str,
    pub secret: &'a str,
    pub format: CredentialFormat,
}

impl Credential<'_> {
    /// Output form without the line terminator
    pub fn formatted(&self) -> String {
        let mut out = String::with_capacity(self.identifier.len() + self.secret.len() + 1);
        out.push_str(self.identifier);
        out.push(':');
        out.push_str(self.secret);
        out
    }
}

/// Outcome of classifying a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Matched a layout and passed the output-mode filter
    Accepted(Credential<'a>),
    /// Matched a layout but the identifier is the wrong kind for this output
    Filtered,
    /// No layout matched
    Unmatched,
}

/// Email check applied to identifiers
#[derive(Debug)]
enum EmailCheck {
    Strict(Regex),
    Loose,
}

/// Classifies raw lines against the credential layouts and the output filter
#[derive(Debug)]
pub struct LineClassifier {
    patterns: Vec<(CredentialFormat, Regex)>,
    email: EmailCheck,
    output_format: OutputFormat,
}

impl LineClassifier {
    pub fn new(output_format: OutputFormat, validate_email: bool) -> Result<Self, ExtractError> {
        let patterns = CredentialFormat::ALL
            .iter()
            .map(|&format| -> Result<_, ExtractError> {
                Ok((format, Regex::new(format.pattern())?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let email = if validate_email {
            EmailCheck::Strict(Regex::new(EMAIL_PATTERN)?)
        } else {
            EmailCheck::Loose
        };

        Ok(Self { patterns, email, output_format })
    }

    /// Try each layout in priority order; the first match wins
    pub fn extract<'a>(&self, line: &'a str) -> Option<Credential<'a>> {
        let line = line.trim();

        self.patterns.iter().find_map(|(format, regex)| {
            let caps = regex.captures(line)?;
            Some(Credential {
                identifier: caps.get(1)?.as_str().trim(),
                secret: caps.get(2)?.as_str().trim(),
                format: *format,
            })
        })
    }

    /// Whether the identifier counts as an email address
    #[inline]
    pub fn is_email(&self, identifier: &str) -> bool {
        match &self.email {
            EmailCheck::Strict(regex) => regex.is_match(identifier),
            EmailCheck::Loose => looks_like_email(identifier),
        }
    }

    /// Extract and apply the output-mode filter
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        match self.extract(line) {
            Some(cred) if self.output_format.accepts(self.is_email(cred.identifier)) => {
                LineClass::Accepted(cred)
            }
            Some(_) => LineClass::Filtered,
            None => LineClass::Unmatched,
        }
    }
}

/// Loose email heuristic: an `@` with a dot somewhere after it
#[inline]
pub fn looks_like_email(identifier: &str) -> bool {
    identifier
        .split_once('@')
        .map_or(false, |(_, domain)| domain.contains('.'))
}
