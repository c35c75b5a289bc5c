/// Finds the length of the common leading byte run of two byte strings.
///
/// The result is always in `0..=min(a.len(), b.len())`.
pub fn common_prefix_length(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
