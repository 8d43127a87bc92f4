//! Numeral policy: calendar years are spelled out, every other number stays
//! a numeral.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

/// Four-digit values treated as calendar years
pub const YEAR_RANGE: RangeInclusive<u32> = 1100..=2099;

static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:[.,:]\d+)*").unwrap());

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

fn below_hundred(n: u32) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        _ => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{}-{}", tens, ONES[ones as usize]),
            }
        }
    }
}

/// Spell a year the way it is spoken.
///
/// 1975 → "nineteen seventy-five", 1905 → "nineteen oh five",
/// 1900 → "nineteen hundred", 2008 → "two thousand eight",
/// 2016 → "two thousand sixteen", 2024 → "twenty twenty-four".
pub fn year_to_words(year: u32) -> String {
    match year {
        2000 => "two thousand".to_string(),
        2001..=2019 => format!("two thousand {}", below_hundred(year - 2000)),
        _ => {
            let head = below_hundred(year / 100);
            match year % 100 {
                0 => format!("{} hundred", head),
                tail @ 1..=9 => format!("{} oh {}", head, below_hundred(tail)),
                tail => format!("{} {}", head, below_hundred(tail)),
            }
        }
    }
}

fn is_currency(c: char) -> bool {
    matches!(c, '$' | '€' | '£' | '₹' | '¥')
}

/// Replace standalone four-digit years with their spoken form.
///
/// Tokens glued to other characters ("2010s", "$1999", "1500%") and
/// anything that is not exactly four digits ("37000", "3,000") are kept.
pub(super) fn spell_years(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for token in NUMBER_TOKEN.find_iter(text) {
        let digits = token.as_str();
        let before = text[..token.start()].chars().next_back();
        let after = text[token.end()..].chars().next();

        let standalone = before.map_or(true, |c| !c.is_alphanumeric() && !is_currency(c))
            && after.map_or(true, |c| !c.is_alphanumeric() && c != '%');

        let year = if digits.len() == 4 && standalone {
            digits.parse::<u32>().ok().filter(|y| YEAR_RANGE.contains(y))
        } else {
            None
        };

        if let Some(year) = year {
            out.push_str(&text[last..token.start()]);
            out.push_str(&year_to_words(year));
            last = token.end();
        }
    }

    out.push_str(&text[last..]);
    out
}
