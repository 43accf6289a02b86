//! Sentence similarity over binary word-presence vectors.

use std::collections::HashSet;

/// One minus the cosine distance between the presence vectors of `a` and `b`.
///
/// With binary vectors the dot product is the intersection size and each
/// norm is the square root of the set size. Returns 0.0 when either set is
/// empty.
pub fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Iterate the smaller set so the result is independent of argument order.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared = small.iter().filter(|w| large.contains(*w)).count();
    if shared == 0 {
        return 0.0;
    }

    let score = shared as f64 / ((a.len() as f64).sqrt() * (b.len() as f64).sqrt());
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_identical_sets() {
        let a = set(&["cats", "mammals"]);
        assert!((similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_sets() {
        assert_eq!(similarity(&set(&["cats"]), &set(&["rodents"])), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = set(&["cats", "mammals"]);
        let b = set(&["cats", "hunt", "mice"]);
        let expected = 1.0 / (2.0f64.sqrt() * 3.0f64.sqrt());
        assert!((similarity(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sets_score_zero() {
        let empty = HashSet::new();
        assert_eq!(similarity(&empty, &empty), 0.0);
        assert_eq!(similarity(&empty, &set(&["cats"])), 0.0);
        assert_eq!(similarity(&set(&["cats"]), &empty), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let samples = [
            set(&[]),
            set(&["cats"]),
            set(&["cats", "mammals"]),
            set(&["cats", "hunt", "mice"]),
            set(&["mice", "rodents"]),
            set(&["rodents", "mammals", "cats", "trees"]),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(similarity(a, b), similarity(b, a));
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }
}
