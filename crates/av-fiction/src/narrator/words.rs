//! Numbers spelled out in words.

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// The English word for a decimal digit.
pub fn digit_word(digit: char) -> Option<&'static str> {
    digit
        .to_digit(10)
        .and_then(|d| DIGIT_WORDS.get(d as usize).copied())
}

/// A small count in words ("two"), or in figures when above nine.
pub fn count_word(count: usize) -> String {
    DIGIT_WORDS
        .get(count)
        .map_or_else(|| count.to_string(), |w| (*w).to_string())
}

/// Render a one-time code the way the robed man reads it out.
///
/// Six digits are read as two groups of three, eight digits as two groups of
/// four: `"123456"` becomes `"One, two, three... Four, five, six."`.
/// Returns `None` for anything that is not a 6 or 8 digit code.
pub fn format_code(code: &str) -> Option<String> {
    let words = code.chars().map(digit_word).collect::<Option<Vec<_>>>()?;
    let split = match words.len() {
        6 => 3,
        8 => 4,
        _ => return None,
    };
    let (first, second) = words.split_at(split);
    Some(format!("{}... {}.", clause(first), clause(second)))
}

fn clause(words: &[&str]) -> String {
    let joined = words.join(", ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn six_digits() {
        assert_eq!(
            format_code("123456").as_deref(),
            Some("One, two, three... Four, five, six.")
        );
    }

    #[test]
    fn eight_digits() {
        assert_eq!(
            format_code("12345678").as_deref(),
            Some("One, two, three, four... Five, six, seven, eight.")
        );
    }

    #[test]
    fn leading_zeros_are_spoken() {
        insta::assert_snapshot!(format_code("000907").unwrap(), @"Zero, zero, zero... Nine, zero, seven.");
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(format_code(""), None);
        assert_eq!(format_code("12345"), None);
        assert_eq!(format_code("1234567"), None);
        assert_eq!(format_code("12a456"), None);
    }

    #[test]
    fn counts() {
        assert_eq!(count_word(2), "two");
        assert_eq!(count_word(0), "zero");
        assert_eq!(count_word(12), "12");
    }

    #[test]
    fn digit_words() {
        assert_eq!(digit_word('7'), Some("seven"));
        assert_eq!(digit_word('x'), None);
    }

    proptest! {
        #[test]
        fn spoken_code_shape(code in "[0-9]{6}|[0-9]{8}") {
            let spoken = format_code(&code).unwrap();
            let half = code.len() / 2;
            let (a, b) = spoken.split_once("... ").unwrap();
            prop_assert!(b.ends_with('.'));
            prop_assert_eq!(a.split(", ").count(), half);
            prop_assert_eq!(b.trim_end_matches('.').split(", ").count(), half);
            prop_assert!(a.chars().next().unwrap().is_uppercase());
            prop_assert!(b.chars().next().unwrap().is_uppercase());
        }
    }
}
