//! Accent color selection for a preview card.
//!
//! A color supplied by the metadata service always wins. Without one, the
//! color is derived from the hostname alone, so the same site renders with
//! the same accent on every fetch.

use crate::utils::hostname_of;

/// Hostname suffix that selects [`RESERVED_SLOT`].
pub const RESERVED_SUFFIX: &str = ".edu";

/// Color slot reserved for institutional hosts.
pub const RESERVED_SLOT: &str = "--ddd-theme-default-nittanyNavy";

/// Slots handed out to every other host. Excludes [`RESERVED_SLOT`].
pub const PALETTE: [&str; 12] = [
    "--ddd-theme-default-beaverBlue",
    "--ddd-theme-default-landgrantBrown",
    "--ddd-theme-default-potentialMidnight",
    "--ddd-theme-default-pughBlue",
    "--ddd-theme-default-creekTeal",
    "--ddd-theme-default-roarGolden",
    "--ddd-theme-default-forestGreen",
    "--ddd-theme-default-athertonViolet",
    "--ddd-theme-default-wonderPurple",
    "--ddd-theme-default-discoveryCoral",
    "--ddd-theme-default-original87Pink",
    "--ddd-theme-default-inventOrange",
];

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Picks the card's theme color.
///
/// `supplied` is the service's `theme-color` value; it is used trimmed when
/// non-empty. Otherwise see [`fallback_theme_color`].
pub fn resolve_theme_color(supplied: Option<&str>, url: &str) -> String {
    match supplied.map(str::trim) {
        Some(color) if !color.is_empty() => color.to_string(),
        _ => fallback_theme_color(url).to_string(),
    }
}

/// Deterministic color slot for `url`'s hostname.
///
/// Inputs that carry no hostname are hashed as-is (lower-cased).
pub fn fallback_theme_color(url: &str) -> &'static str {
    let key = hostname_of(url).unwrap_or_else(|| url.trim().to_ascii_lowercase());

    if key.ends_with(RESERVED_SUFFIX) {
        return RESERVED_SLOT;
    }

    let index = (fnv1a(key.as_bytes()) % PALETTE.len() as u64) as usize;
    PALETTE[index]
}

// 64-bit FNV-1a; stable across builds and platforms, unlike std's hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
