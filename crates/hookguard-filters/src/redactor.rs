//! Span redaction
//!
//! Matches are spliced back to front so that replacing a span never shifts
//! the offsets of spans still waiting to be replaced. Placeholders may be
//! longer or shorter than the text they replace.

use crate::catalog::PatternKind;
use crate::scanner::Match;
use tracing::warn;

/// Text after redaction, with the types replaced in left-to-right order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub text: String,
    pub types: Vec<String>,
}

impl Redaction {
    /// Number of spans replaced
    pub fn count(&self) -> usize {
        self.types.len()
    }
}

/// Replace every match in `text` with `label(match)`.
///
/// Matches must be offsets into `text`. A match that overlaps one already
/// replaced, or whose offsets do not fall on character boundaries, is
/// skipped with a warning.
pub fn redact<F>(text: &str, matches: &[Match], label: F) -> Redaction
where
    F: Fn(&Match) -> String,
{
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    let mut types = Vec::with_capacity(ordered.len());
    // Everything at or after `bound` has already been rewritten
    let mut bound = text.len();

    for m in ordered {
        let valid = m.start < m.end
            && m.end <= bound
            && text.is_char_boundary(m.start)
            && text.is_char_boundary(m.end);
        if !valid {
            warn!(
                match_type = %m.match_type,
                start = m.start,
                end = m.end,
                "Skipping unusable redaction span"
            );
            continue;
        }

        result.replace_range(m.start..m.end, &label(m));
        types.push(m.match_type.clone());
        bound = m.start;
    }

    types.reverse();
    Redaction {
        text: result,
        types,
    }
}

/// Redact with the placeholder of `kind`
pub fn redact_with_kind(text: &str, matches: &[Match], kind: PatternKind) -> Redaction {
    redact(text, matches, |m| kind.placeholder(&m.match_type))
}
