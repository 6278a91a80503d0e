use crate::model::Snapshot;

/// Fixed palette tags hash into when they carry no explicit override.
pub const TAG_PALETTE: [&str; 15] = [
    "#fca5a5", "#fdba74", "#fde047", "#86efac", "#67e8f9", "#93c5fd", "#c4b5fd", "#f0abfc",
    "#fda4af", "#cbd5e1", "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4",
];

/// Deterministic palette pick for a tag name.
///
/// The hash runs `h = unit + ((h << 5) - h)` over the UTF-16 code units with
/// i32 wrapping, then indexes the palette with `abs(h) % 15`. Stable across
/// calls and sessions, so renders never need to persist derived colors.
pub fn derive_color(name: &str) -> &'static str {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    TAG_PALETTE[(hash % 15).unsigned_abs() as usize]
}

/// Explicit override wins; otherwise derive from the name.
pub fn tag_color<'a>(snapshot: &'a Snapshot, name: &str) -> &'a str {
    match snapshot.tag_colors.get(name) {
        Some(color) => color.as_str(),
        None => derive_color(name),
    }
}
