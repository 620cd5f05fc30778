/// Number of words in the table.
pub const COUNT: usize = 50_000;

/// The `i`-th word.
pub fn word(i: usize) -> String {
    format!("str{i}")
}
