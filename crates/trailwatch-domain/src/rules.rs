/// Returns true when a dispatch call type denotes a trail rescue.
///
/// Call types arrive with inconsistent casing, word order, punctuation, and
/// the occasional transcription error ("train rescue", "trails fescue"), so
/// both words are matched within edit distance 2 rather than exactly.
pub fn call_is_trail_rescue(call_type: &str) -> bool {
    let call_type = call_type.to_lowercase();
    let words: Vec<&str> = call_type.split_whitespace().collect();

    let near = |target: &str| words.iter().any(|w| levenshtein_distance(w, target) <= 2);
    near("trail") && near("rescue")
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.chars().count();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let b_chars = b.chars().collect::<Vec<_>>();
    let mut previous = (0..=b_chars.len()).collect::<Vec<_>>();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, left) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, right) in b_chars.iter().enumerate() {
            let substitution_cost = usize::from(left != *right);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            let substitution = previous[j] + substitution_cost;
            current[j + 1] = deletion.min(insertion).min(substitution);
        }
        previous.clone_from_slice(&current);
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_rescue_variants_match() {
        for call_type in [
            "trail rescue",
            "TRAIL RESCUE",
            "Trail Rescue",
            "rescue trail",
            "emergency trail rescue operation",
            "Rescue - Trail",
            "Trail - Rescue",
            "train rescue",
            "trails fescue",
        ] {
            assert!(call_is_trail_rescue(call_type), "{call_type:?}");
        }
    }

    #[test]
    fn non_rescue_calls_do_not_match() {
        for call_type in ["rescue", "trail", "", "Aid Emergency", "snails rescue", "MVC"] {
            assert!(!call_is_trail_rescue(call_type), "{call_type:?}");
        }
    }

    #[test]
    fn distance_basics() {
        assert_eq!(levenshtein_distance("trail", "trail"), 0);
        assert_eq!(levenshtein_distance("train", "trail"), 1);
        assert_eq!(levenshtein_distance("snails", "trail"), 3);
        assert_eq!(levenshtein_distance("", "trail"), 5);
    }
}
