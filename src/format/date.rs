use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::bail;

/// Display layout for the publish date written into frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    YyyyMmDdDash,
    MmDdYyyyDash,
    DdMmYyyyDash,
    YyyyMmDdSlash,
    MmDdYyyySlash,
    DdMmYyyySlash,
    /// Keep the timestamp exactly as the API returned it.
    Auto,
}

impl DateFormat {
    pub const ALL: [DateFormat; 7] = [
        Self::YyyyMmDdDash,
        Self::MmDdYyyyDash,
        Self::DdMmYyyyDash,
        Self::YyyyMmDdSlash,
        Self::MmDdYyyySlash,
        Self::DdMmYyyySlash,
        Self::Auto,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Self::YyyyMmDdDash => "YYYY-MM-DD",
            Self::MmDdYyyyDash => "MM-DD-YYYY",
            Self::DdMmYyyyDash => "DD-MM-YYYY",
            Self::YyyyMmDdSlash => "YYYY/MM/DD",
            Self::MmDdYyyySlash => "MM/DD/YYYY",
            Self::DdMmYyyySlash => "DD/MM/YYYY",
            Self::Auto => "auto",
        }
    }

    /// Unknown selectors fall back to `Auto`.
    pub fn from_selector_lenient(selector: &str) -> Self {
        selector.parse().unwrap_or(Self::Auto)
    }
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector())
    }
}

impl FromStr for DateFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match Self::ALL.iter().find(|f| f.selector() == trimmed) {
            Some(format) => Ok(*format),
            None => {
                let known: Vec<&str> = Self::ALL.iter().map(|f| f.selector()).collect();
                bail!(
                    "Unknown date format `{trimmed}` (expected one of: {})",
                    known.join(", ")
                )
            }
        }
    }
}

pub fn format_publish_date(published_at: &str, format: DateFormat) -> String {
    let date_part: String = published_at.chars().take(10).collect();
    let parts: Vec<&str> = date_part.split('-').collect();
    let part = |idx: usize| parts.get(idx).copied().unwrap_or("");
    let (year, month, day) = (part(0), part(1), part(2));

    match format {
        DateFormat::YyyyMmDdDash => date_part,
        DateFormat::MmDdYyyyDash => format!("{month}-{day}-{year}"),
        DateFormat::DdMmYyyyDash => format!("{day}-{month}-{year}"),
        DateFormat::YyyyMmDdSlash => date_part.replace('-', "/"),
        DateFormat::MmDdYyyySlash => format!("{month}/{day}/{year}"),
        DateFormat::DdMmYyyySlash => format!("{day}/{month}/{year}"),
        DateFormat::Auto => published_at.to_string(),
    }
}
