// Candidate scanner - find digit runs that could be epoch timestamps
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII boundaries: a number right after CJK or accented letters still counts
    static ref CANDIDATE_REGEX: Regex =
        Regex::new(r"(?-u:\b)[0-9]{9,13}(?-u:\b)").unwrap();
}

/// A digit run found in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub raw: &'a str,
    /// Byte offset of the first digit
    pub offset: usize,
    pub value: u64,
}

impl Candidate<'_> {
    /// Byte length of the matched run
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Byte offset just past the last digit
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }
}

/// Lazily scan `text` left to right for runs of 9-13 digits
pub fn scan_candidates(text: &str) -> impl Iterator<Item = Candidate<'_>> + '_ {
    CANDIDATE_REGEX.find_iter(text).filter_map(|m| {
        // 13 digits always fit in a u64
        let value = m.as_str().parse::<u64>().ok()?;
        Some(Candidate {
            raw: m.as_str(),
            offset: m.start(),
            value,
        })
    })
}

/// Number of decimal digits in `value` (leading zeros of the source text are not counted)
pub fn digit_len(value: u64) -> usize {
    value.to_string().len()
}
