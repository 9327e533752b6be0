use std::fmt;

/// Service-role key for the backend project. Never printed in clear.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
  /// Returns `None` for empty or whitespace-only values.
  pub fn new(value: impl Into<String>) -> Option<Self> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return None;
    }
    Some(Self(trimmed.to_string()))
  }

  pub fn from_env(var: &str) -> Option<Self> {
    std::env::var(var).ok().and_then(Self::new)
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Credential(*** {} chars)", self.0.len())
  }
}
