//! Minimal percent encoding for the structural characters of the format
//!
//! Only `%`, `=` and `;` are encoded (`%25`, `%3D`, `%3B`), so a literal
//! occurrence can appear inside a key or value.

/// Encode `%`, `=` and `;`
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '=' => out.push_str("%3D"),
            ';' => out.push_str("%3B"),
            other => out.push(other),
        }
    }
    out
}

/// Decode `%25`, `%3D` and `%3B`; any other `%` sequence is kept verbatim
pub fn decode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = match tail.get(..3) {
            Some("%25") => Some('%'),
            Some("%3D") => Some('='),
            Some("%3B") => Some(';'),
            _ => None,
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
