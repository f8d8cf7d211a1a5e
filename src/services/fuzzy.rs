/// Similarity of two whole strings on a 0–100 scale
///
/// Twice the longest common subsequence over the combined length, counted
/// in Unicode scalar values and rounded. Reordered words keep their shared
/// characters, so "晴時多雲" against "多雲時晴" scores 50. An empty operand
/// always scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    chars_ratio(&a, &b)
}

/// Best [`ratio`] of the shorter string against every window of the longer
/// string with the same length
///
/// A short keyword such as "雨" scores 100 against any description that
/// contains it.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0;
    for window in long.windows(short.len()) {
        best = best.max(chars_ratio(short, window));
        if best == 100 {
            break;
        }
    }
    best
}

fn chars_ratio(a: &[char], b: &[char]) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let matches = lcs_len(a, b) as f64;
    let total = (a.len() + b.len()) as f64;
    (200.0 * matches / total).round().min(100.0) as u8
}

/// Length of the longest common subsequence, one DP row at a time
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
