/// Strip ASCII control characters from user input before it is embedded in a
/// prompt, then trim surrounding whitespace.
///
/// Removes 0x00-0x08, 0x0B, 0x0C, 0x0E-0x1F and 0x7F; tab, newline and
/// carriage return survive until the final trim. No case, punctuation or
/// Unicode normalization is applied, so language-specific characters pass
/// through verbatim.
pub fn sanitize(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| !is_stripped_control(c)).collect();
    cleaned.trim().to_string()
}

fn is_stripped_control(c: char) -> bool {
    matches!(c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}
