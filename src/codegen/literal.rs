use crate::ast::Literal;
use crate::error::{MutationError, Result};

pub(super) fn render(lit: &Literal) -> Result<String> {
    match lit.kind.as_str() {
        "bool" => value(lit),
        "number" => {
            let mut out = value(lit)?;
            if let Some(unit) = lit.subdenomination.as_deref() {
                out.push(' ');
                out.push_str(unit);
            }
            Ok(out)
        }
        "hexString" => {
            let hex = lit
                .hex_value
                .as_deref()
                .ok_or_else(|| MutationError::structural("Literal", "hex string without hexValue"))?;
            Ok(format!("hex\"{hex}\""))
        }
        "string" | "unicodeString" => {
            let bytes = match lit.hex_value.as_deref() {
                Some(hex) => decode_hex(hex)?,
                None => value(lit)?.into_bytes(),
            };
            Ok(format!("\"{}\"", escape_bytes(&bytes)))
        }
        other => Err(MutationError::structural(
            "Literal",
            format!("unknown literal kind '{other}'"),
        )),
    }
}

fn value(lit: &Literal) -> Result<String> {
    lit.value
        .clone()
        .ok_or_else(|| MutationError::structural("Literal", format!("{} literal without value", lit.kind)))
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(MutationError::structural("Literal", "odd-length hexValue"));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| MutationError::structural("Literal", format!("bad hexValue '{hex}'")))
        })
        .collect()
}

/// Printable ASCII passes through; quotes, backslashes and every other byte
/// become `\xNN`.
#[must_use]
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (32..=126).contains(&b) && b != b'"' && b != b'\\' {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("\\x{b:02x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeId, TypeDescriptions};

    fn lit(kind: &str, value: Option<&str>, hex: Option<&str>, unit: Option<&str>) -> Literal {
        Literal {
            id: NodeId(1),
            src: None,
            kind: kind.to_string(),
            value: value.map(str::to_string),
            hex_value: hex.map(str::to_string),
            subdenomination: unit.map(str::to_string),
            type_descriptions: TypeDescriptions::default(),
        }
    }

    #[test]
    fn number_with_unit() {
        let rendered = render(&lit("number", Some("2"), None, Some("ether")));
        assert_eq!(rendered.ok().as_deref(), Some("2 ether"));
    }

    #[test]
    fn string_is_decoded_from_hex_and_escaped() {
        // "a\n\"" followed by a non-ASCII byte
        let rendered = render(&lit("string", None, Some("610a22ff"), None));
        assert_eq!(rendered.ok().as_deref(), Some(r#""a\x0a\x22\xff""#));
    }

    #[test]
    fn hex_string_literal() {
        let rendered = render(&lit("hexString", None, Some("00ff"), None));
        assert_eq!(rendered.ok().as_deref(), Some("hex\"00ff\""));
    }

    #[test]
    fn missing_value_is_structural() {
        assert!(matches!(
            render(&lit("number", None, None, None)),
            Err(MutationError::Structural { .. })
        ));
        assert!(render(&lit("string", None, Some("abc"), None)).is_err());
    }

    #[test]
    fn escape_keeps_printable_ascii() {
        assert_eq!(escape_bytes(b"Hello, World!"), "Hello, World!");
        assert_eq!(escape_bytes(b"back\\slash"), "back\\x5cslash");
    }
}
