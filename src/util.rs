/// Numeric conversion helpers.
///
/// The language freely mixes 64-bit integers and floats: arithmetic promotes
/// integers to floats, bitwise operators and `%` truncate floats to integers,
/// and array accesses turn numbers into indices. These helpers keep the
/// necessary casts in one place.
pub mod num;
