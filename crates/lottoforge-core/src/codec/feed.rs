use serde::{Deserialize, Serialize};

/// Hot/overdue number hints pasted from a results site, e.g.
///
/// ```text
/// Top 8 hot numbers: 10, 40, 6, 17, 24, 18, 16, 49
/// Top 8 overdue numbers: 53, 3, 5, 15, 51, 9, 66, 37
/// Top 3 hot Mega Ball numbers: 1, 24, 2
/// Top 3 overdue Mega Ball numbers: 4, 6, 15
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedHints {
    pub hot: Vec<u32>,
    pub overdue: Vec<u32>,
    pub bonus_hot: Vec<u32>,
    pub bonus_overdue: Vec<u32>,
}

impl FeedHints {
    pub fn parse(text: &str) -> Self {
        let mut hints = FeedHints::default();

        for line in text.lines() {
            let lower = line.trim().to_lowercase();
            let Some((label, numbers)) = lower.split_once(':') else {
                continue;
            };

            let is_bonus = label.contains("ball");
            let slot = match (is_bonus, label.contains("hot"), label.contains("overdue")) {
                (false, true, false) => &mut hints.hot,
                (false, false, true) => &mut hints.overdue,
                (true, true, false) => &mut hints.bonus_hot,
                (true, false, true) => &mut hints.bonus_overdue,
                _ => continue,
            };
            *slot = grab_numbers(numbers);
        }

        hints
    }

    pub fn is_empty(&self) -> bool {
        self.hot.is_empty()
            && self.overdue.is_empty()
            && self.bonus_hot.is_empty()
            && self.bonus_overdue.is_empty()
    }
}

fn grab_numbers(s: &str) -> Vec<u32> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_feed() {
        let feed = FeedHints::parse(
            "
Top 8 hot numbers: 23, 61, 35, 28, 43, 62, 64, 52
Top 8 overdue numbers: 66, 39, 20, 10, 56, 30, 17, 32
Top 3 hot Power Ball numbers: 25, 5, 2
Top 3 overdue Power Ball numbers: 16, 26, 7
",
        );
        assert_eq!(feed.hot, vec![23, 61, 35, 28, 43, 62, 64, 52]);
        assert_eq!(feed.overdue.len(), 8);
        assert_eq!(feed.bonus_hot, vec![25, 5, 2]);
        assert_eq!(feed.bonus_overdue, vec![16, 26, 7]);
    }

    #[test]
    fn test_count_in_label_is_not_a_hint() {
        let feed = FeedHints::parse("TOP 8 HOT NUMBERS: 17, 20");
        assert_eq!(feed.hot, vec![17, 20]);
    }

    #[test]
    fn test_noise_is_ignored() {
        let feed = FeedHints::parse("hello\nsomething: 1, 2\n");
        assert!(feed.is_empty());
    }
}
