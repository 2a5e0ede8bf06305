//! Display ordering for category names.
//!
//! Sibling order is never stored. It is computed on every read with a
//! case-insensitive comparison that treats runs of ASCII digits as numbers,
//! so "12V" sorts before "24V" and "Item 2" before "Item 10".

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use super::Category;

/// Natural, case-insensitive comparison with a deterministic tie-break.
///
/// Strings that compare equal ignoring case and leading zeros fall back to a
/// plain byte comparison so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp_ignore_case(a, b).then_with(|| a.cmp(b))
}

/// Orders categories by name, then by id.
pub fn compare_categories(a: &Category, b: &Category) -> Ordering {
    natural_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = compare_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

// Digit runs compare by magnitude without parsing, so arbitrarily long runs
// cannot overflow.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            sorted(vec!["plumbing", "Lighting", "ELECTRICAL"]),
            vec!["ELECTRICAL", "Lighting", "plumbing"]
        );
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(sorted(vec!["24V", "12V"]), vec!["12V", "24V"]);
        assert_eq!(
            sorted(vec!["Item 10", "Item 2", "Item 1"]),
            vec!["Item 1", "Item 2", "Item 10"]
        );
        assert_eq!(
            sorted(vec!["3 PHASE DISCONNECT SWITCHES", "30A PLUS", "1-Piece"]),
            vec!["1-Piece", "3 PHASE DISCONNECT SWITCHES", "30A PLUS"]
        );
    }

    #[test]
    fn test_leading_zeros_and_long_runs() {
        assert_eq!(natural_cmp_ignore_case("007", "7"), Ordering::Equal);
        assert_eq!(
            natural_cmp("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_tie_break_is_total() {
        assert_eq!(natural_cmp_ignore_case("abc", "ABC"), Ordering::Equal);
        assert_ne!(natural_cmp("abc", "ABC"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("Sink", "Sinks"), Ordering::Less);
    }

    #[test]
    fn test_compare_categories_uses_id_last() {
        let a = Category::new(1, "Indoor", Some(5));
        let b = Category::new(2, "Indoor", Some(6));
        assert_eq!(compare_categories(&a, &b), Ordering::Less);
    }
}
