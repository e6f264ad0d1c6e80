use std::fmt::{self, Write};

use chrono::{DateTime, NaiveDateTime, TimeZone};

pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d H:i:s";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateFormatError {
    #[error("date format `{format}` uses unsupported letter `{token}`")]
    UnknownToken { format: String, token: char },
    #[error("date format `{format}` uses `{token}`, which needs a value with a timezone")]
    NeedsTimezone { format: String, token: char },
    #[error("date format `{format}` could not render the value")]
    Render { format: String },
}

/// Persisted date format in the host framework's `Y-m-d H:i:s` notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat(String);

impl Default for DateFormat {
    fn default() -> Self {
        Self(DEFAULT_DATE_FORMAT.to_string())
    }
}

struct Translation {
    pattern: String,
    zoned_token: Option<char>,
}

impl DateFormat {
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Equivalent chrono strftime pattern. Non-letters are kept literally,
    /// a backslash escapes the next character, and letters without a chrono
    /// equivalent are rejected.
    pub fn to_strftime(&self) -> Result<String, DateFormatError> {
        self.translate().map(|translation| translation.pattern)
    }

    /// Formats a zone-less value. Timezone letters (`e T O P c r U`) fail.
    pub fn format(&self, value: &NaiveDateTime) -> Result<String, DateFormatError> {
        let translation = self.translate()?;
        if let Some(token) = translation.zoned_token {
            return Err(DateFormatError::NeedsTimezone {
                format: self.0.clone(),
                token,
            });
        }
        self.render(value.format(&translation.pattern))
    }

    pub fn format_zoned<Tz>(&self, value: &DateTime<Tz>) -> Result<String, DateFormatError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let translation = self.translate()?;
        self.render(value.format(&translation.pattern))
    }

    fn render(&self, formatted: impl fmt::Display) -> Result<String, DateFormatError> {
        let mut output = String::new();
        write!(output, "{formatted}").map_err(|_| DateFormatError::Render {
            format: self.0.clone(),
        })?;
        Ok(output)
    }

    fn translate(&self) -> Result<Translation, DateFormatError> {
        let mut pattern = String::with_capacity(self.0.len() * 2);
        let mut zoned_token = None;
        let mut chars = self.0.chars();

        while let Some(ch) = chars.next() {
            if ch == '\\' {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut pattern, escaped);
                }
                continue;
            }
            if !ch.is_ascii_alphabetic() {
                push_literal(&mut pattern, ch);
                continue;
            }

            let Some((directive, zoned)) = directive(ch) else {
                return Err(DateFormatError::UnknownToken {
                    format: self.0.clone(),
                    token: ch,
                });
            };
            if zoned {
                zoned_token.get_or_insert(ch);
            }
            pattern.push_str(directive);
        }

        Ok(Translation {
            pattern,
            zoned_token,
        })
    }
}

/// strftime directive for a format letter, and whether it needs an offset.
fn directive(token: char) -> Option<(&'static str, bool)> {
    let plain = match token {
        'd' => "%d",
        'j' => "%-d",
        'D' => "%a",
        'l' => "%A",
        'N' => "%u",
        'w' => "%w",
        'W' => "%V",
        'm' => "%m",
        'n' => "%-m",
        'M' => "%b",
        'F' => "%B",
        'o' => "%G",
        'Y' => "%Y",
        'y' => "%y",
        'H' => "%H",
        'G' => "%-H",
        'h' => "%I",
        'g' => "%-I",
        'i' => "%M",
        's' => "%S",
        'A' => "%p",
        'a' => "%P",
        'u' => "%6f",
        'v' => "%3f",
        _ => {
            let zoned = match token {
                'e' | 'T' => "%Z",
                'O' => "%z",
                'P' => "%:z",
                'c' => "%Y-%m-%dT%H:%M:%S%:z",
                'r' => "%a, %d %b %Y %H:%M:%S %z",
                'U' => "%s",
                _ => return None,
            };
            return Some((zoned, true));
        }
    };
    Some((plain, false))
}

fn push_literal(pattern: &mut String, ch: char) {
    if ch == '%' {
        pattern.push_str("%%");
    } else {
        pattern.push(ch);
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
