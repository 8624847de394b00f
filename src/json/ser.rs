use crate::value::format_double;
use crate::{JsonOptions, Variant};

/// Layout state carried down the recursion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Indent {
    compact: bool,
    step: usize,
    offset: usize,
}

impl Indent {
    pub(crate) fn new(options: &JsonOptions) -> Self {
        Indent {
            compact: options.compact,
            step: options.indent as usize,
            offset: options.indent as usize,
        }
    }

    fn nested(self) -> Self {
        Indent {
            offset: self.offset + self.step,
            ..self
        }
    }

    fn before_element(self, out: &mut String, index: usize) {
        if index > 0 {
            out.push(',');
            if self.offset == 0 && !self.compact {
                out.push(' ');
            }
        }
        if self.offset != 0 {
            out.push('\n');
            push_spaces(out, self.offset);
        }
    }

    fn before_close(self, out: &mut String) {
        if self.offset != 0 {
            out.push('\n');
            push_spaces(out, self.offset - self.step);
        }
    }
}

fn push_spaces(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}

pub(crate) fn write_value(out: &mut String, value: &Variant, indent: Indent) {
    match value {
        Variant::List(list) => {
            if list.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, element) in list.iter().enumerate() {
                indent.before_element(out, i);
                write_value(out, element, indent.nested());
            }
            indent.before_close(out);
            out.push(']');
        }
        Variant::Map(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, element)) in map.iter().enumerate() {
                indent.before_element(out, i);
                write_string(out, key);
                out.push(':');
                if !indent.compact {
                    out.push(' ');
                }
                write_value(out, element, indent.nested());
            }
            indent.before_close(out);
            out.push('}');
        }
        Variant::Null => out.push_str("null"),
        Variant::Double(v) if !v.is_finite() => out.push_str("null"),
        Variant::Double(v) => out.push_str(&format_double(*v)),
        Variant::String(s) => write_string(out, s),
        Variant::ByteArray(_) | Variant::DateTime(_) => write_string(out, &value.to_string()),
        // remaining scalars print as bare JSON numbers or literals
        other => out.push_str(&other.to_string()),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < ' ' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant;

    fn render(value: &Variant, options: JsonOptions) -> String {
        let mut out = String::new();
        write_value(&mut out, value, Indent::new(&options));
        out
    }

    #[test]
    fn test_default_layout() {
        let value = variant!({ "a": [1, 2], "b": {} });
        assert_eq!(render(&value, JsonOptions::new()), r#"{"a": [1, 2], "b": {}}"#);
    }

    #[test]
    fn test_compact_layout() {
        let value = variant!({ "a": [1, 2], "b": "x" });
        assert_eq!(
            render(&value, JsonOptions::new().with_compact(true)),
            r#"{"a":[1,2],"b":"x"}"#
        );
    }

    #[test]
    fn test_indented_layout() {
        let value = variant!({ "a": [1, 2], "b": [] });
        assert_eq!(
            render(&value, JsonOptions::pretty()),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": []\n}"
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = variant!(["q\"\\\u{1}\n", "\u{1f}\t"]);
        assert_eq!(render(&value, JsonOptions::new()), r#"["q\"\\\u0001\n", "\u001f\t"]"#);
    }

    #[test]
    fn test_special_scalars() {
        let value = Variant::from(vec![
            Variant::Double(f64::NAN),
            Variant::Double(2.0),
            Variant::ByteArray(vec![1, 0xab]),
            Variant::DateTime(99),
            Variant::ULong(u64::MAX),
            Variant::Bool(false),
            Variant::Byte(255),
            Variant::Int(-3),
        ]);
        assert_eq!(
            render(&value, JsonOptions::new().with_compact(true)),
            r#"[null,2.0,"01 ab","99",18446744073709551615,false,255,-3]"#
        );
    }
}
