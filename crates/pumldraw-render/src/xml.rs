//! Escaping and number formatting shared by the two renderers.

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Attribute values additionally keep their line breaks (`&#xa;`), which XML parsers would
/// otherwise normalize to spaces.
pub(crate) fn escape_attr(text: &str) -> String {
    escape_xml(text).replace('\n', "&#xa;")
}

/// Shortest round-trippable decimal, without `-0` or float noise.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml(r#"a<b & "c" 'd'>"#), "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;");
        assert_eq!(escape_attr("one\ntwo"), "one&#xa;two");
    }

    #[test]
    fn numbers_drop_noise() {
        assert_eq!(fmt(40.0), "40");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(29.999_999_9), "30");
        assert_eq!(fmt(f64::NAN), "0");
    }
}
