//! Version-ordering strategies for the update decision.
//!
//! The default ordering reproduces the digit heuristic earlier versions of
//! this updater shipped. That heuristic misorders multi-digit segments
//! ("1.10" loses to "1.9"); [`SemverComparator`] is the strict alternative
//! for hosts that control their own release naming.

use semver::Version;

/// Decides whether one version identifier is newer than another.
pub trait VersionComparator {
    /// Returns `true` when `new` should replace `old`. Ties are not newer.
    fn is_newer(&self, old: &str, new: &str) -> bool;
}

/// Legacy digit-only ordering.
///
/// Strips every non-digit character from both identifiers, right-pads the
/// shorter digit string with zeros, and compares the results as unsigned
/// integers. A string without digits counts as zero. The padding is
/// left-aligned magnitude, not place-value alignment, so single-digit
/// segments compare correctly ("1.25" > "1.2") while multi-digit segments do
/// not ("1.10" < "1.9").
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDigitComparator;

impl VersionComparator for LegacyDigitComparator {
    fn is_newer(&self, old: &str, new: &str) -> bool {
        let old_digits = digits_of(old);
        let new_digits = digits_of(new);
        let width = old_digits.len().max(new_digits.len());
        // Equal-width digit strings order lexicographically exactly as the
        // numbers they spell, so arbitrarily long versions never wrap.
        pad_right(new_digits, width) > pad_right(old_digits, width)
    }
}

/// Strict semantic-version ordering behind the same seam.
///
/// Accepts an optional leading `v`. Identifiers that fail to parse are never
/// considered newer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverComparator;

impl VersionComparator for SemverComparator {
    fn is_newer(&self, old: &str, new: &str) -> bool {
        match (parse_lenient(old), parse_lenient(new)) {
            (Some(old), Some(new)) => new > old,
            _ => false,
        }
    }
}

fn digits_of(version: &str) -> String {
    version.chars().filter(char::is_ascii_digit).collect()
}

fn pad_right(mut digits: String, width: usize) -> String {
    while digits.len() < width {
        digits.push('0');
    }
    digits
}

fn parse_lenient(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}
