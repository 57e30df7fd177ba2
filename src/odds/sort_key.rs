// Composite sort key for "best line first" table ordering.

use super::resolve::ResolvedLine;

/// Derive a single totally-ordered key from a line's (point, price) pair.
///
/// Guarantees:
/// - any present point outranks any absent point,
/// - among equal points, higher price outranks lower,
/// - pure function of its inputs, so the ordering is stable and transitive
///   across ascending/descending table toggles.
///
/// The scaling constants are an engineering convention, not a business
/// rule: they only exist to make the point field dominate the price field
/// and to push absent values below every real quote. Quoted points are
/// half-point lines (0.5 and up) and American prices stay within a few
/// thousand, so the two fields cannot bleed into each other at this scale.
pub fn sort_key(point: Option<f64>, price: Option<f64>) -> f64 {
    point.unwrap_or(-1.0) * 100_000.0 + price.unwrap_or(-99_999.0)
}

impl ResolvedLine {
    /// Sort key for this line. Absent lines sort below every resolved line;
    /// use `sort_key(None, None)` for missing board entries.
    pub fn sort_key(&self) -> f64 {
        sort_key(Some(self.point), self.price)
    }
}
