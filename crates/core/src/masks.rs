//! Progressive input masks for Brazilian documents and phone numbers.
//!
//! Each function takes whatever the user has typed so far and returns the
//! masked rendition, so callers can apply them on every keystroke. Non-digits
//! are stripped first and excess digits are dropped.

/// Insert `separators` while re-emitting up to `max` digits.
///
/// Each `(pos, sep)` pair puts `sep` immediately before the digit at `pos`,
/// so separators only appear once the following digit has been typed.
fn masked(input: &str, max: usize, separators: &[(usize, &str)]) -> String {
    let mut out = String::new();
    for (i, ch) in input
        .chars()
        .filter(char::is_ascii_digit)
        .take(max)
        .enumerate()
    {
        for (pos, sep) in separators {
            if i == *pos {
                out.push_str(sep);
            }
        }
        out.push(ch);
    }
    out
}

/// Mask a CEP as `00000-000`.
///
/// ```
/// assert_eq!(forneria_core::masks::cep("01310100"), "01310-100");
/// assert_eq!(forneria_core::masks::cep("013101"), "01310-1");
/// ```
#[must_use]
pub fn cep(input: &str) -> String {
    masked(input, 8, &[(5, "-")])
}

/// Mask a CPF as `000.000.000-00`.
///
/// ```
/// assert_eq!(forneria_core::masks::cpf("12345678901"), "123.456.789-01");
/// ```
#[must_use]
pub fn cpf(input: &str) -> String {
    masked(input, 11, &[(3, "."), (6, "."), (9, "-")])
}

/// Mask a CNPJ as `00.000.000/0000-00`.
///
/// ```
/// assert_eq!(forneria_core::masks::cnpj("12345678000190"), "12.345.678/0001-90");
/// ```
#[must_use]
pub fn cnpj(input: &str) -> String {
    masked(input, 14, &[(2, "."), (5, "."), (8, "/"), (12, "-")])
}

/// Mask a BR phone as `(00) 0000-0000` or `(00) 00000-0000`.
///
/// The dash only appears once the subscriber part is complete enough to
/// place it (8 digits for landlines, 9 for mobiles).
///
/// ```
/// assert_eq!(forneria_core::masks::phone_br("11912345678"), "(11) 91234-5678");
/// assert_eq!(forneria_core::masks::phone_br("1131234567"), "(11) 3123-4567");
/// ```
#[must_use]
pub fn phone_br(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(11)
        .collect();

    if digits.len() <= 2 {
        return digits;
    }

    let (area, rest) = digits.split_at(2);
    if rest.len() >= 8 {
        let (head, tail) = rest.split_at(rest.len() - 4);
        format!("({area}) {head}-{tail}")
    } else {
        format!("({area}) {rest}")
    }
}
