use serde::{Deserialize, Serialize};

/// Popularity metrics for a single repository.
///
/// The [`Default`] value (zero stars, zero downloads) is the fallback used
/// whenever a lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Metrics {
    pub stars: u64,
    pub downloads: u64,
}

impl Metrics {
    /// The metrics reported for a record whose lookup failed.
    pub const FALLBACK: Self = Self { stars: 0, downloads: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_default() {
        assert_eq!(Metrics::FALLBACK, Metrics::default());
    }
}
