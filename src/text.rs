//! Dialog text helpers
//!
//! Templates use `{{token}}` placeholders and a tiny bbcode subset
//! (`[br][/br]`, `[b]...[/b]`), the same format the host's translator takes.

use std::collections::BTreeMap;

pub type Replacements = BTreeMap<&'static str, String>;

/// Replace every `{{key}}` in `template` with its value from `replace`.
/// Unknown tokens are left as-is.
pub fn interpolate(template: &str, replace: &Replacements) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match replace.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render bbcode for a plain terminal
pub fn bbcode_to_plain(text: &str) -> String {
    text.replace("[br][/br]", "\n")
        .replace("[b]", "")
        .replace("[/b]", "")
}
