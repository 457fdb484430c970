// Fuzzy matching for "did you mean" suggestions

/// Calculate Levenshtein distance between two strings
/// Returns the minimum number of single-character edits (insertions, deletions, substitutions)
/// needed to transform one string into another
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let s1_len = s1_chars.len();
    let s2_len = s2_chars.len();

    if s1_len == 0 {
        return s2_len;
    }
    if s2_len == 0 {
        return s1_len;
    }

    // Two rolling rows instead of the full matrix
    let mut previous: Vec<usize> = (0..=s2_len).collect();
    let mut current = vec![0; s2_len + 1];

    for i in 1..=s1_len {
        current[0] = i;
        for j in 1..=s2_len {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)       // deletion
                .min(current[j - 1] + 1)         // insertion
                .min(previous[j - 1] + cost);    // substitution
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_len]
}

/// Candidates within `max_distance` of `search`, closest first, at most 5.
/// Comparison is case-insensitive; prefix matches count as distance 1.
pub fn find_near_matches<'a>(search: &str, candidates: &[&'a str], max_distance: usize) -> Vec<(&'a str, usize)> {
    let search_lower = search.to_lowercase();
    let mut matches: Vec<(&'a str, usize)> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate_lower = candidate.to_lowercase();
            let distance = levenshtein_distance(&search_lower, &candidate_lower);
            if distance <= max_distance {
                Some((*candidate, distance))
            } else if !search_lower.is_empty() && candidate_lower.starts_with(&search_lower) {
                Some((*candidate, 1))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    matches.truncate(5);
    matches
}

/// Single best suggestion, if any candidate is close enough
pub fn closest_match<'a>(search: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    find_near_matches(search, candidates, max_distance)
        .first()
        .map(|(candidate, _)| *candidate)
}
