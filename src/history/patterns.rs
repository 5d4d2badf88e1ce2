// Recurring CBT pattern tally

/// Count exact occurrences of each pattern name and return the `top`
/// most frequent, highest count first. First appearance breaks ties,
/// which keeps the output stable for a given input order.
pub fn recurring_patterns(names: &[String], top: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in names {
        match counts.iter_mut().find(|(seen, _)| seen == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name.clone(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_top_patterns_by_count() {
        let input = names(&[
            "Catastrophizing",
            "Mind reading",
            "Catastrophizing",
            "Labeling",
            "Catastrophizing",
            "Mind reading",
            "Should statements",
        ]);
        let top = recurring_patterns(&input, 3);
        assert_eq!(
            top,
            vec![
                ("Catastrophizing".to_string(), 3),
                ("Mind reading".to_string(), 2),
                ("Labeling".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let input = names(&["Labeling", "Mind reading"]);
        let top = recurring_patterns(&input, 3);
        assert_eq!(top[0].0, "Labeling");
        assert_eq!(top[1].0, "Mind reading");
    }

    #[test]
    fn test_empty_input() {
        assert!(recurring_patterns(&[], 3).is_empty());
    }
}
