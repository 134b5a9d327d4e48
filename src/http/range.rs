//! `Range` header negotiation.
//!
//! Only a single `bytes=<start>-<end?>` range is honoured. Anything else,
//! including suffix ranges and multi-range requests, is ignored and the whole
//! file is served.

use std::fmt;
use std::str::FromStr;

/// A validated, inclusive window inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered, `end - start + 1`.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a partial response.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfied_content_range(size: u64) -> String {
    format!("bytes */{}", size)
}

/// Result of checking a request's range against a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the whole file with 200.
    Full,
    /// Serve exactly this window with 206.
    Partial(ByteRange),
    /// Reply 416 with no body.
    Unsatisfiable,
}

/// A syntactically valid `bytes=<start>-<end?>` expression, not yet checked
/// against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: Option<u64>,
}

impl FromStr for RangeSpec {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().strip_prefix("bytes=").ok_or(())?;
        let (start, end) = spec.trim().split_once('-').ok_or(())?;

        let start = parse_offset(start.trim()).ok_or(())?;
        let end = match end.trim() {
            "" => None,
            end => Some(parse_offset(end).ok_or(())?),
        };

        Ok(Self { start, end })
    }
}

/// Plain decimal digits only; `u64::from_str` would also accept a `+` sign.
fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Decides how much of a `size`-byte file to serve for the given `Range`
/// header value.
pub fn negotiate(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::Full;
    };

    let spec = match header.parse::<RangeSpec>() {
        Ok(spec) => spec,
        Err(()) => {
            tracing::debug!(header, "Ignoring unsupported Range header");
            return RangeOutcome::Full;
        }
    };

    let end = spec.end.unwrap_or(size.saturating_sub(1));

    if spec.start >= size || end >= size || spec.start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial(ByteRange {
        start: spec.start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_rejects_signs_and_suffixes() {
        assert!("bytes=+1-2".parse::<RangeSpec>().is_err());
        assert!("bytes=-500".parse::<RangeSpec>().is_err());
        assert!("bytes=0-1,4-5".parse::<RangeSpec>().is_err());
        assert!("items=0-1".parse::<RangeSpec>().is_err());
    }

    #[test]
    fn spec_open_ended() {
        let spec: RangeSpec = "bytes=7-".parse().unwrap();
        assert_eq!(spec, RangeSpec { start: 7, end: None });
    }
}
