//! Wire decoding, the inverse of [`crate::encode`].
//!
//! Decoded expressions contain only constants and binary operations, since
//! variables are resolved before encoding.

use declist_types::{BinOp, DataType, DecisionList, DecisionNode, Expr, Value};

use crate::error::{WireError, WireResult};

/// Decode a single expression (`CI{5}`, `EB{...}`).
pub fn decode_expr(text: &str) -> WireResult<Expr> {
    let mut decoder = Decoder::new(text);
    let expr = decoder.expr()?;
    decoder.finish()?;
    Ok(expr)
}

/// Decode one dispatch node: an expression followed by `T` or `F`.
pub fn decode_node(text: &str) -> WireResult<DecisionNode> {
    let mut decoder = Decoder::new(text);
    let node = decoder.node()?;
    decoder.finish()?;
    Ok(node)
}

/// Decode a whole-list encoding, `DL<n>{...}`.
pub fn decode_list(text: &str) -> WireResult<DecisionList> {
    let mut decoder = Decoder::new(text);
    let list = decoder.list()?;
    decoder.finish()?;
    Ok(list)
}

/// Cursor over the wire text.
struct Decoder<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Decoder<'src> {
    fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    // ─────────────────────────────────────────────────────────────
    // Byte-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> WireResult<()> {
        match self.advance() {
            Some(b) if b == expected => Ok(()),
            Some(b) => Err(self.error_at(
                self.pos - 1,
                format!("expected '{}', found '{}'", expected as char, b as char),
            )),
            None => Err(self.error(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    fn error(&self, message: impl Into<String>) -> WireError {
        WireError::new(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> WireError {
        WireError::new(offset, message)
    }

    fn finish(&self) -> WireResult<()> {
        if self.pos == self.source.len() {
            Ok(())
        } else {
            Err(self.error("trailing characters after encoding"))
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Grammar
    // ─────────────────────────────────────────────────────────────

    fn expr(&mut self) -> WireResult<Expr> {
        match self.peek() {
            Some(b'C') => self.constant().map(Expr::Constant),
            Some(b'E') => self.binary(),
            Some(b) => Err(self.error(format!(
                "expected 'C' or 'E' to start an expression, found '{}'",
                b as char
            ))),
            None => Err(self.error("expected an expression, found end of input")),
        }
    }

    fn constant(&mut self) -> WireResult<Value> {
        self.expect(b'C')?;
        let tag_offset = self.pos;
        let tag = self
            .advance()
            .ok_or_else(|| self.error("missing constant type tag"))?;
        let ty = DataType::from_tag(tag as char)
            .ok_or_else(|| self.error_at(tag_offset, format!("unknown type tag '{}'", tag as char)))?;
        self.expect(b'{')?;

        let start = self.pos;
        let len = self.source[start..]
            .find('}')
            .ok_or_else(|| self.error("unterminated constant payload"))?;
        let payload = &self.source[start..start + len];
        self.pos = start + len + 1;

        let invalid = || WireError::new(start, format!("invalid {ty} payload {payload:?}"));
        match ty {
            DataType::Boolean => match payload {
                "T" => Ok(Value::Boolean(true)),
                "F" => Ok(Value::Boolean(false)),
                _ => Err(invalid()),
            },
            DataType::Integer => payload.parse().map(Value::Integer).map_err(|_| invalid()),
            DataType::Float => payload.parse().map(Value::Float).map_err(|_| invalid()),
            DataType::String => {
                if payload.contains('{') {
                    Err(invalid())
                } else {
                    Ok(Value::String(payload.to_string()))
                }
            }
        }
    }

    fn binary(&mut self) -> WireResult<Expr> {
        self.expect(b'E')?;
        self.expect(b'B')?;
        self.expect(b'{')?;
        let left = self.expr()?;

        let op_offset = self.pos;
        let symbol = self
            .source
            .get(op_offset..op_offset + 2)
            .ok_or_else(|| self.error("truncated operator symbol"))?;
        let op = BinOp::from_symbol(symbol)
            .ok_or_else(|| self.error_at(op_offset, format!("unknown operator symbol {symbol:?}")))?;
        self.pos += 2;

        let right = self.expr()?;
        self.expect(b'}')?;
        Ok(Expr::binary(left, op, right))
    }

    fn node(&mut self) -> WireResult<DecisionNode> {
        let condition = self.expr()?;
        let outcome = match self.advance() {
            Some(b'T') => true,
            Some(b'F') => false,
            Some(b) => {
                return Err(self.error_at(
                    self.pos - 1,
                    format!("expected outcome 'T' or 'F', found '{}'", b as char),
                ));
            }
            None => return Err(self.error("missing node outcome")),
        };
        Ok(DecisionNode::new(condition, outcome))
    }

    fn list(&mut self) -> WireResult<DecisionList> {
        self.expect(b'D')?;
        self.expect(b'L')?;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let count: usize = self.source[start..self.pos]
            .parse()
            .map_err(|_| self.error_at(start, "missing node count"))?;
        self.expect(b'{')?;

        // The count is untrusted; it is only checked against what was read.
        let mut nodes = Vec::new();
        while self.peek() != Some(b'}') {
            if self.peek().is_none() {
                return Err(self.error("unterminated decision list"));
            }
            nodes.push(self.node()?);
        }
        self.expect(b'}')?;

        if nodes.len() != count {
            return Err(self.error_at(
                start,
                format!("list declares {count} node(s) but holds {}", nodes.len()),
            ));
        }
        Ok(DecisionList::new(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_constants() {
        assert_eq!(decode_expr("CI{-7}").unwrap(), Expr::constant(-7));
        assert_eq!(decode_expr("CF{0.25}").unwrap(), Expr::constant(0.25f32));
        assert_eq!(decode_expr("CB{F}").unwrap(), Expr::constant(false));
        assert_eq!(decode_expr("CS{str3}").unwrap(), Expr::constant("str3"));
        assert_eq!(decode_expr("CS{}").unwrap(), Expr::constant(""));
    }

    #[test]
    fn test_decode_nested_binary() {
        let expr = decode_expr("EB{EB{CI{1}<<CI{2}}&&CB{T}}").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::binary(Expr::constant(1), BinOp::Less, Expr::constant(2)),
                BinOp::And,
                Expr::constant(true),
            )
        );
    }

    #[test]
    fn test_decode_node() {
        let node = decode_node("EB{CS{str1}!=CS{str2}}F").unwrap();
        assert!(!node.outcome);
        assert_eq!(
            node.condition,
            Expr::binary(Expr::constant("str1"), BinOp::NotEq, Expr::constant("str2"))
        );
    }

    #[test]
    fn test_decode_list() {
        let list = decode_list("DL2{EB{CI{5}==CI{5}}TCB{T}F}").unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.has_default());
        assert!(list.nodes()[0].outcome);
    }

    #[test]
    fn test_errors_report_offsets() {
        let err = decode_expr("CX{1}").unwrap_err();
        assert_eq!(err.offset, 1);
        let err = decode_expr("EB{CI{1}>CI{2}}").unwrap_err();
        assert_eq!(err.offset, 8);
        let err = decode_node("CB{T}").unwrap_err();
        assert!(err.message.contains("missing node outcome"));
        let err = decode_expr("CI{12").unwrap_err();
        assert!(err.message.contains("unterminated"));
        let err = decode_expr("CI{x}").unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_trailing_text_rejected() {
        assert!(decode_expr("CI{1}CI{2}").is_err());
        assert!(decode_node("CB{T}TT").is_err());
    }

    #[test]
    fn test_list_count_must_match() {
        let err = decode_list("DL3{CB{T}F}").unwrap_err();
        assert!(err.message.contains("declares 3"));
        assert!(decode_list("DL{CB{T}F}").is_err());
    }

    #[test]
    fn test_huge_list_count_is_an_error() {
        let err = decode_list("DL18446744073709551615{}").unwrap_err();
        assert!(err.message.contains("declares 18446744073709551615"));
        assert_eq!(err.offset, 2);
        let err = decode_list("DL4000000000{CB{T}T}").unwrap_err();
        assert!(err.message.contains("holds 1"));
        assert!(decode_list("DL99999999999999999999999{}").is_err());
    }
}
