//! Directed-message parser - Splits a leading `@mention` off chat text

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// `@name`, optional `:`/`,`, then whitespace or end of text
static MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@([A-Za-z0-9_.-]+)[:,]?(?:\s+|$)").expect("mention pattern is valid")
});

/// Result of parsing one chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub addressee: Option<String>,
    pub body: String,
}

/// Parse raw chat text into an optional addressee and the remaining body.
///
/// The first leading mention becomes the addressee. Further leading mentions
/// are dropped too, so parsing the body again never finds an addressee.
/// Text without a leading mention is returned unchanged.
pub fn parse(text: &str) -> ParsedText {
    let mut rest = text.trim_start();
    let mut addressee = None;

    while let Some(caps) = MENTION.captures(rest) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if addressee.is_none() {
            addressee = Some(name.as_str().to_string());
        }
        rest = rest[whole.end()..].trim_start();
    }

    match addressee {
        Some(name) => ParsedText {
            addressee: Some(name),
            body: rest.to_string(),
        },
        None => ParsedText {
            addressee: None,
            body: text.to_string(),
        },
    }
}
