//! Log redaction for clinical values and identifiers.
//!
//! Assessments never log input values, but formatted errors and third-party
//! messages can still carry them. [`RedactingMakeWriter`] wraps the log sink
//! and rewrites each line before it is written:
//! - `field=value` / `field: value` pairs for clinical measurements
//!   (`age`, `trestbps`, `chol`, `thalch`, `oldpeak`, `ca`, ...)
//! - identifiers: UUIDs, email addresses, SSN-like and MRN-like numbers
//!
//! Lines longer than [`MAX_LINE_BYTES`] are truncated first.

use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

/// Longest line redacted in full; the rest is dropped.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

static RULES: OnceLock<Option<Rules>> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Rules {
    set: RegexSet,
    rules: Vec<Rule>,
}

const PATTERNS: &[(&str, &str)] = &[
    // Clinical measurements keyed by column or form name. Keeps the key.
    (
        r"(?i)\b(age|sex|trestbps|resting[ _]?bp|chol|cholesterol|fbs|thalch|max[ _]?heart[ _]?rate|exang|oldpeak|st[ _]?depression|ca|major[ _]?vessels)\s*[:=]\s*-?\d+(?:\.\d+)?",
        "${1}=[REDACTED]",
    ),
    // One-hot columns with a value, e.g. `cp_typical angina=1`.
    (
        r"\b((?:cp|restecg|slope|thal)_[A-Za-z -]+?)\s*[:=]\s*[01](?:\.0+)?\b",
        "${1}=[REDACTED]",
    ),
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
    (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
];

fn rules() -> Option<&'static Rules> {
    RULES
        .get_or_init(|| {
            let set = RegexSet::new(PATTERNS.iter().map(|(p, _)| *p)).ok()?;
            let rules = PATTERNS
                .iter()
                .map(|&(pattern, replacement)| {
                    Regex::new(pattern).ok().map(|regex| Rule {
                        regex,
                        replacement,
                    })
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Rules { set, rules })
        })
        .as_ref()
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replace clinical values and identifiers in `input`.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, MAX_LINE_BYTES)
}

fn redact_with_limit(input: &str, max_bytes: usize) -> String {
    let (body, newline) = match input.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (input, false),
    };
    let (prefix, truncated) = truncate_to_char_boundary(body, max_bytes);

    let mut out = match rules() {
        Some(rules) => {
            let mut result = prefix.to_string();
            for idx in rules.set.matches(prefix).iter() {
                let rule = &rules.rules[idx];
                result = rule
                    .regex
                    .replace_all(&result, rule.replacement)
                    .into_owned();
            }
            result
        }
        // Patterns are constant; if they ever fail to compile, drop the text.
        None => "[REDACTED]".to_string(),
    };

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    if newline {
        out.push('\n');
    }
    out
}

/// `MakeWriter` that redacts each formatted log line.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn write_redacted(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let line = String::from_utf8_lossy(bytes);
        self.inner.write_all(redact(&line).as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.write_redacted(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_lines()?;

        // A line without a newline is flushed once it exceeds twice the cap.
        if self.pending.len() > MAX_LINE_BYTES * 2 {
            let pending = std::mem::take(&mut self.pending);
            self.write_redacted(&pending)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.write_redacted(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}
