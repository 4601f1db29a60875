//! The "exactly one match" check shared by every lookup.

use thiserror::Error;

/// A lookup returned zero or several records where exactly one was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected count: found {found} matches, expected exactly 1")]
pub struct CountMismatch {
  pub found: usize,
}

impl CountMismatch {
  pub fn is_missing(&self) -> bool { self.found == 0 }

  pub fn is_ambiguous(&self) -> bool { self.found > 1 }
}

/// Take the only element of `items`, or report how many there were.
pub fn exactly_one<T>(items: Vec<T>) -> Result<T, CountMismatch> {
  let found = items.len();
  let mut iter = items.into_iter();
  match (iter.next(), iter.next()) {
    (Some(item), None) => Ok(item),
    _ => Err(CountMismatch { found }),
  }
}
