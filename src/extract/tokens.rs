use regex::Regex;

use crate::error::Result;
use crate::model::CandidatePair;

/// A gate.line-shaped token: one or two digits, a period, one digit.
const TOKEN_PATTERN: &str = r"\d{1,2}\.\d";

/// Anything other than digits, periods and whitespace is OCR noise.
const NOISE_PATTERN: &str = r"[^\d.\s]";

const WHITESPACE_PATTERN: &str = r"\s+";

/// Extracts gate.line tokens from raw OCR text in reading order.
///
/// Values are not range-checked here; `87.2` is a valid token.
pub fn extract_tokens(text: &str) -> Result<Vec<String>> {
    let noise = Regex::new(NOISE_PATTERN)?;
    let whitespace = Regex::new(WHITESPACE_PATTERN)?;
    let token = Regex::new(TOKEN_PATTERN)?;

    let cleaned = noise.replace_all(text, " ");
    let cleaned = whitespace.replace_all(&cleaned, " ");

    Ok(token
        .find_iter(cleaned.trim())
        .map(|m| m.as_str().to_string())
        .collect())
}

/// Groups tokens pairwise: (red, black) = (token[2i], token[2i+1]).
///
/// A trailing unpaired token is dropped.
pub fn pair_tokens(tokens: &[String]) -> Vec<CandidatePair> {
    tokens
        .chunks_exact(2)
        .map(|chunk| CandidatePair::new(chunk[0].clone(), chunk[1].clone()))
        .collect()
}

/// `extract_tokens` followed by `pair_tokens`.
pub fn parse_pairs(text: &str) -> Result<Vec<CandidatePair>> {
    Ok(pair_tokens(&extract_tokens(text)?))
}
