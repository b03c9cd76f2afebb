use rand::Rng;

use candlekit_types::Candleset;

/// Pick `n` consecutive candles out of `set`, starting at an offset drawn
/// uniformly from the `len - n + 1` positions where the window fits.
///
/// Returns a copy of the whole set when `n >= len`. The source set is left
/// untouched.
#[must_use]
pub fn select_random_window<R>(set: &Candleset, n: usize, rng: &mut R) -> Candleset
where
    R: Rng + ?Sized,
{
    let len = set.len();
    if n >= len {
        return set.clone();
    }
    let offset = rng.random_range(0..=len - n);
    set.window(offset, n)
}
