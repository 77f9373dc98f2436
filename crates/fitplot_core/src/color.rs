//! Display color allocation for new series and datasets.
//!
//! The caller passes in the colors already in use, so allocation carries no
//! hidden state and is deterministic until the palette runs out.

use rand::Rng;
use rustc_hash::FxHashSet;

/// Ordered palette handed out before falling back to random colors.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// First palette entry not present in `used`, or a random `#rrggbb` once
/// the palette is exhausted.
///
/// Comparison ignores ASCII case so `#1F77B4` counts as used.
pub fn next_color<'a>(used: impl IntoIterator<Item = &'a str>) -> String {
    next_color_with_rng(used, &mut rand::thread_rng())
}

/// [`next_color`] with an explicit random source for the exhausted case.
pub fn next_color_with_rng<'a, R: Rng + ?Sized>(
    used: impl IntoIterator<Item = &'a str>,
    rng: &mut R,
) -> String {
    let used: FxHashSet<String> = used.into_iter().map(str::to_ascii_lowercase).collect();
    match PALETTE.iter().find(|c| !used.contains(**c)) {
        Some(c) => (*c).to_string(),
        None => {
            let color = random_hex_color(rng);
            tracing::trace!("palette exhausted, using {color}");
            color
        }
    }
}

/// A random opaque color as `#rrggbb`. May collide with a color in use.
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let rgb: u32 = rng.gen_range(0..=0xFF_FFFF);
    format!("#{rgb:06x}")
}
