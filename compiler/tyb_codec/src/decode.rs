//! Recursive-descent decoder for type strings.

use tyb_ir::{DeclId, Type};
use tyb_stack::ensure_sufficient_stack;

use crate::{CodecError, TypeNameResolver, BOTTOM};

/// Decode `text` into a structural type.
///
/// Undotted names are first looked up as type parameters visible from
/// `scope`; everything else goes through `resolver` as a qualified type name.
#[tracing::instrument(level = "trace", skip(resolver), ret, err)]
pub fn decode(
    text: &str,
    scope: DeclId,
    resolver: &mut dyn TypeNameResolver,
) -> Result<Type, CodecError> {
    let mut parser = Parser {
        text,
        pos: 0,
        scope,
        resolver,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(CodecError::TrailingInput {
            offset: parser.pos,
            text: text.to_owned(),
        });
    }
    Ok(ty)
}

struct Parser<'t, 'r> {
    text: &'t str,
    pos: usize,
    scope: DeclId,
    resolver: &'r mut dyn TypeNameResolver,
}

impl<'t> Parser<'t, '_> {
    fn parse_type(&mut self) -> Result<Type, CodecError> {
        ensure_sufficient_stack(|| {
            let mut cases = vec![self.parse_intersection()?];
            while self.eat('|') {
                cases.push(self.parse_intersection()?);
            }
            Ok(Type::union(cases))
        })
    }

    fn parse_intersection(&mut self) -> Result<Type, CodecError> {
        let first = self.parse_primary()?;
        if self.peek() != Some('&') {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.eat('&') {
            parts.push(self.parse_primary()?);
        }
        Type::intersection(parts).ok_or_else(|| self.unexpected_end())
    }

    fn parse_primary(&mut self) -> Result<Type, CodecError> {
        if self.eat('(') {
            let inner = self.parse_type()?;
            self.expect(')')?;
            return Ok(inner);
        }

        let name = self.parse_name()?;
        let args = if self.eat('<') {
            let mut args = vec![self.parse_type()?];
            while self.eat(',') {
                args.push(self.parse_type()?);
            }
            self.expect('>')?;
            args
        } else {
            Vec::new()
        };

        if name == BOTTOM {
            return if args.is_empty() {
                Ok(Type::Bottom)
            } else {
                Err(CodecError::ArityMismatch {
                    name: name.to_owned(),
                    expected: 0,
                    found: args.len(),
                })
            };
        }

        if !name.contains('.') {
            if let Some(param) = self.resolver.type_parameter(self.scope, name) {
                if !args.is_empty() {
                    return Err(CodecError::ArityMismatch {
                        name: name.to_owned(),
                        expected: 0,
                        found: args.len(),
                    });
                }
                return Ok(Type::Param(param));
            }
        }

        let decl = self
            .resolver
            .resolve_type(name)
            .ok_or_else(|| CodecError::UnknownType {
                name: name.to_owned(),
            })?;
        let expected = self.resolver.arity(decl);
        if expected != args.len() {
            return Err(CodecError::ArityMismatch {
                name: name.to_owned(),
                expected,
                found: args.len(),
            });
        }
        Ok(Type::nominal(decl, args))
    }

    /// `ident ('.' ident)*`, returned as a slice of the input.
    fn parse_name(&mut self) -> Result<&'t str, CodecError> {
        self.skip_ws();
        let start = self.pos;
        loop {
            let ident_start = self.pos;
            while let Some(c) = self.peek_raw() {
                if c.is_alphanumeric() || c == '_' || c == '$' {
                    self.pos += c.len_utf8();
                } else {
                    break;
                }
            }
            if self.pos == ident_start {
                return Err(self.unexpected());
            }
            if self.peek_raw() == Some('.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.text;
        Ok(&text[start..self.pos])
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek_raw() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_raw(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.peek_raw()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CodecError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> CodecError {
        match self.peek_raw() {
            Some(found) => CodecError::UnexpectedChar {
                found,
                offset: self.pos,
                text: self.text.to_owned(),
            },
            None => self.unexpected_end(),
        }
    }

    fn unexpected_end(&self) -> CodecError {
        CodecError::UnexpectedEnd {
            text: self.text.to_owned(),
        }
    }
}
