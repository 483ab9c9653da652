use super::NotApplicable;

/// Count of differing positions. Defined only for equal lengths.
pub fn hamming(a: &[u8], b: &[u8]) -> Result<usize, NotApplicable> {
    if a.len() != b.len() {
        return Err(NotApplicable::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
}

/// Unit-cost edit distance (insertion, deletion, substitution).
pub fn levenshtein(a: &[u8], b: &[u8]) -> usize {
    // Keep the shorter sequence along the row to bound memory.
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &x) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &y) in b.iter().enumerate() {
            let up = row[j + 1];
            let best = (diag + usize::from(x != y)).min(up + 1).min(row[j] + 1);
            diag = up;
            row[j + 1] = best;
        }
    }

    row[b.len()]
}
