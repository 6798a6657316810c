/// Build the correction prompt for an already-sanitized sentence.
///
/// The few-shot JSON example anchors small models to the expected shape;
/// without it they tend to answer in prose. The sentence appears twice on
/// purpose, matching the instruction-example-instruction layout the backend
/// responds to best.
pub fn build_prompt(locale_code: &str, sanitized_text: &str) -> String {
    format!(
        r#"Fix the grammar and spelling in this text: "{sanitized_text}"

Example: If the text was "i want burger", you would return:
{{
  "corrections": [
    "I want a burger",
    "I want burgers",
    "I would like a burger"
  ]
}}

Now fix "{sanitized_text}" and return 3 different corrected versions in the same JSON format. Language: {locale_code}."#
    )
}
