//! English number-to-words spelling used for marks and totals.

const UNDER_TWENTY: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Largest value spelled out; anything above is returned as a numeral
pub const MAX_SPELLED: u64 = 999_999_999;

/// Spell a non-negative integer in title-cased English words
///
/// `87` becomes `"Eighty Seven"` and `300` becomes `"Three Hundred"`.
pub fn number_to_words(n: u64) -> String {
    if n > MAX_SPELLED {
        return n.to_string();
    }
    if n == 0 {
        return UNDER_TWENTY[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let millions = n / 1_000_000;
    let thousands = (n / 1_000) % 1_000;
    let rest = n % 1_000;

    if millions > 0 {
        parts.push(format!("{} Million", below_thousand(millions)));
    }
    if thousands > 0 {
        parts.push(format!("{} Thousand", below_thousand(thousands)));
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }

    parts.join(" ")
}

// 1..=999
fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rem = n % 100;

    match (hundreds, rem) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", UNDER_TWENTY[h as usize]),
        (h, r) => format!("{} Hundred {}", UNDER_TWENTY[h as usize], below_hundred(r)),
    }
}

// 1..=99
fn below_hundred(n: u64) -> String {
    if n < 20 {
        return UNDER_TWENTY[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        unit => format!("{} {}", tens, UNDER_TWENTY[unit as usize]),
    }
}
