use std::fmt;

/// Opaque token naming the account being authenticated.
///
/// The value is taken verbatim from the entry point (minus surrounding
/// whitespace) and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Returns `None` when the value is absent or blank.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let value = raw?.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form: the identifier doubles as a link token, so at most its
    /// first two characters are shown.
    #[must_use]
    pub fn masked(&self) -> String {
        const VISIBLE: usize = 2;
        if self.0.chars().count() <= VISIBLE * 2 {
            return "***".to_string();
        }
        let prefix: String = self.0.chars().take(VISIBLE).collect();
        format!("{prefix}***")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
