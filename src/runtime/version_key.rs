// Version keys and closest-version matching for runtime builds

use crate::constants;
use std::cmp::Ordering;
use std::fmt;

/// Sentinel for keys that do not parse; sorts before every real build.
pub const UNPARSED: (i64, i64) = (-1, -1);

/// A `Product.Year.Build` token such as `TouchDesigner.2023.34567`.
///
/// Keys order by `(year, build)`, with unparseable keys first. Equal numbers
/// with different products fall back to the raw text so ordering stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey(String);

impl VersionKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for `product` at `year.build`.
    pub fn for_product(product: &str, numeric: &str) -> Self {
        Self(format!("{}.{}", product, numeric))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(year, build)`, or [`UNPARSED`].
    pub fn numbers(&self) -> (i64, i64) {
        parse_version(&self.0)
    }

    /// Product name when the key carries one of the known prefixes.
    pub fn product(&self) -> Option<&'static str> {
        [constants::DESIGNER_PRODUCT, constants::PLAYER_PRODUCT]
            .into_iter()
            .find(|p| self.0.strip_prefix(p).is_some_and(|rest| rest.starts_with('.')))
    }

    pub fn is_player(&self) -> bool {
        self.product() == Some(constants::PLAYER_PRODUCT)
    }

    /// The `year.build` part without any product prefix.
    pub fn numeric(&self) -> &str {
        match self.product() {
            Some(product) => &self.0[product.len() + 1..],
            None => &self.0,
        }
    }

    /// Same build under another product name.
    pub fn with_product(&self, product: &str) -> Self {
        Self::for_product(product, self.numeric())
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers()
            .cmp(&other.numbers())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse a version string into `(year, build)`.
///
/// Accepts `TouchDesigner.2025.32280`, `TouchPlayer.2025.32280`, or a bare
/// `2025.32280`. Anything that does not yield two integers returns
/// [`UNPARSED`].
pub fn parse_version(version: &str) -> (i64, i64) {
    let numeric = [constants::DESIGNER_PRODUCT, constants::PLAYER_PRODUCT]
        .into_iter()
        .find_map(|product| {
            version
                .strip_prefix(product)
                .and_then(|rest| rest.strip_prefix('.'))
        })
        .unwrap_or(version);

    let mut parts = numeric.split('.');
    let year = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    let build = parts.next().and_then(|p| p.trim().parse::<i64>().ok());

    match (year, build) {
        (Some(year), Some(build)) => (year, build),
        _ => UNPARSED,
    }
}

/// Pick the installed build to offer for `required`.
///
/// `installed` must be sorted ascending. An exact build match wins;
/// otherwise the newest build not newer than `required`; otherwise the
/// oldest installed build, so there is always a default while anything is
/// installed.
pub fn resolve_best_match<'a, T>(
    required: &VersionKey,
    installed: &'a [T],
    key_of: impl Fn(&T) -> &VersionKey,
) -> Option<&'a T> {
    let target = required.numbers();

    if let Some(exact) = installed.iter().find(|v| key_of(v).numbers() == target) {
        return Some(exact);
    }

    installed
        .iter()
        .rev()
        .find(|v| key_of(v).numbers() <= target)
        .or_else(|| installed.first())
}
