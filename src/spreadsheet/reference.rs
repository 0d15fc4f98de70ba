//! Conversions between A1-style cell references and 0-based (row, col) indexes.

/// Converts column letters (`A`, `Z`, `AA`, ...) to a 0-based column index.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|char| char.is_ascii_alphabetic()) {
        return None;
    }
    letters
        .to_ascii_uppercase()
        .bytes()
        .map(|byte| (byte - b'A') as usize + 1)
        .try_fold(0usize, |index, digit| index.checked_mul(26)?.checked_add(digit))
        .map(|column| column - 1)
}

/// Converts a 1-based row number string to a 0-based row index.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .map(|row| row - 1)
}

/// Splits a reference such as `B12` into its 0-based (row, col) indexes.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference
        .find(|char: char| char.is_ascii_digit())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(split);
    let col = col_to_index(letters.trim_matches('$'))?;
    let row = row_to_index(digits)?;
    Some((row, col))
}

/// Renders 0-based (row, col) indexes as an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::<u8>::new();
    while column > 0 {
        column -= 1;
        letters.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}
