//! Query preparation and parsing.
//!
//! [`prepare_query`] turns what the user typed into a query string;
//! [`parse_query`] turns a query string into clauses for [`TermIndex`].
//!
//! The clause syntax follows lunr: `+term` requires a term, `-term`
//! excludes it, `field:term` scopes it, `*` at either end is a wildcard and
//! `term^N` boosts it.
//!
//! [`TermIndex`]: crate::TermIndex

use docfind_core::{QueryMode, SearchField};

use crate::{SearchError, tokenize};

/// Build the query string for the index from raw input.
///
/// Returns `None` for blank input so callers can skip the index entirely:
/// an empty query must never match everything.
pub fn prepare_query(input: &str, mode: QueryMode) -> Option<String> {
    let tokens: Vec<String> = input
        .split_whitespace()
        .map(|token| match mode {
            QueryMode::Exact => token.to_string(),
            QueryMode::Wildcard => wrap_wildcard(token),
        })
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Wrap the term part of a token in `*`, keeping presence and field prefixes.
fn wrap_wildcard(token: &str) -> String {
    let (presence, rest) = match token.chars().next() {
        Some(c @ ('+' | '-')) => (Some(c), &token[1..]),
        _ => (None, token),
    };
    let (field, term) = match rest.split_once(':') {
        Some((field, term)) => (Some(field), term),
        None => (None, rest),
    };

    let mut wrapped = String::with_capacity(token.len() + 2);
    if let Some(c) = presence {
        wrapped.push(c);
    }
    if let Some(field) = field {
        wrapped.push_str(field);
        wrapped.push(':');
    }
    wrapped.push('*');
    wrapped.push_str(term.trim_matches('*'));
    wrapped.push('*');
    wrapped
}

/// Whether a clause must, may, or must not match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    /// Contributes to the score when it matches.
    #[default]
    Optional,
    /// Documents must match.
    Required,
    /// Documents must not match.
    Prohibited,
}

/// One term of a parsed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Required, optional or prohibited.
    pub presence: Presence,

    /// Field scope; `None` searches every indexed field.
    pub field: Option<SearchField>,

    /// Lowercased term without wildcards. Empty means "any term".
    pub term: String,

    /// Term may be preceded by anything.
    pub leading_wildcard: bool,

    /// Term may be followed by anything.
    pub trailing_wildcard: bool,

    /// Score multiplier.
    pub boost: f32,
}

impl Clause {
    /// Whether the clause matches index terms by pattern rather than equality.
    pub fn is_wildcard(&self) -> bool {
        self.leading_wildcard || self.trailing_wildcard
    }

    /// Check an index term against this clause's pattern.
    pub fn matches_term(&self, candidate: &str) -> bool {
        match (self.leading_wildcard, self.trailing_wildcard) {
            (false, false) => candidate == self.term,
            (true, false) => candidate.ends_with(&self.term),
            (false, true) => candidate.starts_with(&self.term),
            (true, true) => candidate.contains(&self.term),
        }
    }
}

/// Parse a query string into clauses.
///
/// Separator characters inside a term split it into several clauses sharing
/// the same presence, field and boost. Words too short to be indexed are
/// dropped unless they carry a wildcard.
pub fn parse_query(query: &str) -> Result<Vec<Clause>, SearchError> {
    let mut clauses = Vec::new();

    for token in query.split_whitespace() {
        parse_token(token, &mut clauses)?;
    }

    Ok(clauses)
}

fn parse_token(token: &str, clauses: &mut Vec<Clause>) -> Result<(), SearchError> {
    let (presence, rest) = if let Some(rest) = token.strip_prefix('+') {
        (Presence::Required, rest)
    } else if let Some(rest) = token.strip_prefix('-') {
        (Presence::Prohibited, rest)
    } else {
        (Presence::Optional, token)
    };

    let (rest, boost) = match rest.rsplit_once('^') {
        Some((rest, boost)) => {
            let boost: f32 = boost
                .parse()
                .map_err(|_| SearchError::query(format!("invalid boost in '{token}'")))?;
            if !(boost.is_finite() && boost > 0.0) {
                return Err(SearchError::query(format!(
                    "boost must be positive in '{token}'"
                )));
            }
            (rest, boost)
        }
        None => (rest, 1.0),
    };

    let (field, rest) = match rest.split_once(':') {
        Some((name, rest)) => {
            let field = SearchField::from_name(&name.to_lowercase()).ok_or_else(|| {
                SearchError::query(format!("unrecognised field '{name}' in '{token}'"))
            })?;
            (Some(field), rest)
        }
        None => (None, rest),
    };

    let leading_wildcard = rest.starts_with('*');
    let trailing_wildcard = rest.len() > 1 && rest.ends_with('*') || rest == "*";
    let body = rest.trim_matches('*');

    if body.is_empty() {
        if leading_wildcard || trailing_wildcard {
            clauses.push(Clause {
                presence,
                field,
                term: String::new(),
                leading_wildcard: true,
                trailing_wildcard: true,
                boost,
            });
            return Ok(());
        }
        return Err(SearchError::query(format!("missing term in '{token}'")));
    }

    let parts: Vec<String> = tokenize::words(body).collect();
    let last = parts.len().saturating_sub(1);
    for (i, part) in parts.into_iter().enumerate() {
        let leading = leading_wildcard && i == 0;
        let trailing = trailing_wildcard && i == last;
        if part.len() < tokenize::MIN_TERM_LENGTH && !(leading || trailing) {
            continue;
        }
        clauses.push(Clause {
            presence,
            field,
            term: part,
            leading_wildcard: leading,
            trailing_wildcard: trailing,
            boost,
        });
    }

    Ok(())
}
