// ABOUTME: Line-oriented parsing of idetools tab-separated records
// ABOUTME: Suggestion records need 8 fields, definition records 6

use nimtide_types::{CompletionCandidate, TokenKind};

use crate::error::CompleterError;

/// Minimum field count of a well-formed suggestion record.
const SUGGESTION_FIELDS: usize = 8;

/// Minimum field count of a well-formed definition record.
const DEFINITION_FIELDS: usize = 6;

/// Parse one suggestion-mode line.
///
/// Records with fewer than 8 tab-separated fields are partial or noise
/// output from the tool and yield `None`; fields beyond the eighth are
/// ignored.
pub fn parse_suggestion_line(line: &str) -> Option<CompletionCandidate> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < SUGGESTION_FIELDS {
        return None;
    }

    let kind = TokenKind::from_code(fields[1]);
    let qualified_name = fields[2];
    let signature = fields[3];
    let doc = fields[7];

    let insert_text = qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
        .to_string();

    Some(CompletionCandidate {
        insert_text,
        short_description: format!("{}: {}", kind.label(), signature),
        detail_text: format!("{signature}\n\n{doc}"),
    })
}

/// A parsed definition-mode record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub kind: TokenKind,
    pub qualified_name: String,
    pub return_type: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub doc: String,
}

impl DefinitionRecord {
    /// Parse the first line of definition-mode output. Fewer than 6 fields
    /// means the tool could not resolve the symbol; the trailing column and
    /// doc fields may be truncated.
    pub fn parse(line: &str) -> Result<Self, CompleterError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < DEFINITION_FIELDS {
            return Err(CompleterError::NoSuchSymbol);
        }

        let line_no = parse_numeric_field(fields[5], "line")?;
        let column = match fields.get(6) {
            Some(raw) => parse_numeric_field(raw, "column")?,
            None => 0,
        };

        Ok(Self {
            kind: TokenKind::from_code(fields[1]),
            qualified_name: fields[2].to_string(),
            return_type: fields[3].to_string(),
            file: fields[4].to_string(),
            line: line_no,
            column,
            doc: fields.get(7).copied().unwrap_or_default().to_string(),
        })
    }
}

fn parse_numeric_field(raw: &str, name: &str) -> Result<u32, CompleterError> {
    raw.parse().map_err(|_| {
        CompleterError::MalformedDefinition(format!("{name} field '{raw}' is not a number"))
    })
}
