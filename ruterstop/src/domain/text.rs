//! Display text normalization.

/// Replace Norwegian letters with ASCII digraphs and drop any other
/// non-ASCII character.
///
/// The digraphs are always lowercase, so "Ås" becomes "aas".
///
/// ```
/// use ruterstop::domain::norwegian_ascii;
///
/// assert_eq!(norwegian_ascii("Snarøya"), "Snaroeya");
/// assert_eq!(norwegian_ascii("Lørenskog"), "Loerenskog");
/// ```
pub fn norwegian_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'ø' | 'Ø' => out.push_str("oe"),
            'æ' | 'Æ' => out.push_str("ae"),
            'å' | 'Å' => out.push_str("aa"),
            c if c.is_ascii() => out.push(c),
            _ => {}
        }
    }
    out
}
