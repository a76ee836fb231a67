//! Extraction of data literals embedded in TypeScript source.
//!
//! The matched substring is parsed as an expression and converted to JSON.
//! Nothing is executed: any node that is not plain literal data is rejected.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpressionElement, Expression, ObjectPropertyKind, PropertyKey, UnaryOperator,
};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use serde_json::{Map, Number, Value};

/// Errors that can occur when extracting a literal.
#[derive(Debug, thiserror::Error)]
pub enum LiteralError {
    #[error("Could not find {0} in source")]
    NotFound(String),

    #[error("Failed to parse {name}: {message}")]
    Syntax { name: String, message: String },

    #[error("{name} is not literal data: {found}")]
    NotLiteral { name: String, found: String },
}

/// Find `export const NAME = [ ... ];` and return the array literal text.
///
/// The closing bracket must start a line, so nested arrays don't end the match early.
pub fn extract_export_array<'s>(source: &'s str, name: &str) -> Result<&'s str, LiteralError> {
    let pattern = format!(
        r"(?s)export\s+const\s+{}\s*(?::[^=]*)?=\s*(\[.*?\n\]);",
        regex::escape(name)
    );
    find_literal(source, &pattern)
        .ok_or_else(|| LiteralError::NotFound(format!("export const {name} = [...]")))
}

/// Find `NAME: Type = { ... };` and return the object literal text.
pub fn extract_typed_object<'s>(source: &'s str, name: &str) -> Result<&'s str, LiteralError> {
    let pattern = format!(
        r"(?s)\b{}\s*:[^=]*=\s*(\{{.*?\n\s*\}});",
        regex::escape(name)
    );
    find_literal(source, &pattern)
        .ok_or_else(|| LiteralError::NotFound(format!("{name}: ... = {{...}}")))
}

fn find_literal<'s>(source: &'s str, pattern: &str) -> Option<&'s str> {
    // Pattern embeds an escaped name, so it can only fail on a bug here.
    let re = Regex::new(pattern).ok()?;
    re.captures(source)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Evaluate a literal expression to JSON without executing it.
pub fn evaluate_literal(text: &str, name: &str) -> Result<Value, LiteralError> {
    let allocator = Allocator::default();
    let expr = Parser::new(&allocator, text, SourceType::ts())
        .parse_expression()
        .map_err(|errors| LiteralError::Syntax {
            name: name.to_string(),
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })?;

    to_json(&expr, name)
}

fn to_json(expr: &Expression<'_>, name: &str) -> Result<Value, LiteralError> {
    let not_literal = |found: &str| LiteralError::NotLiteral {
        name: name.to_string(),
        found: found.to_string(),
    };

    match expr {
        Expression::StringLiteral(lit) => Ok(Value::String(lit.value.to_string())),
        Expression::NumericLiteral(lit) => number(lit.value).ok_or_else(|| not_literal("NaN")),
        Expression::BooleanLiteral(lit) => Ok(Value::Bool(lit.value)),
        Expression::NullLiteral(_) => Ok(Value::Null),
        Expression::TemplateLiteral(tpl) => {
            if !tpl.expressions.is_empty() {
                return Err(not_literal("template substitution"));
            }
            let mut out = String::new();
            for quasi in &tpl.quasis {
                match &quasi.value.cooked {
                    Some(cooked) => out.push_str(cooked),
                    None => out.push_str(&quasi.value.raw),
                }
            }
            Ok(Value::String(out))
        }
        Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::UnaryNegation => {
            match &unary.argument {
                Expression::NumericLiteral(lit) => {
                    number(-lit.value).ok_or_else(|| not_literal("NaN"))
                }
                _ => Err(not_literal("negated non-number")),
            }
        }
        Expression::ParenthesizedExpression(paren) => to_json(&paren.expression, name),
        Expression::TSAsExpression(cast) => to_json(&cast.expression, name),
        Expression::TSSatisfiesExpression(cast) => to_json(&cast.expression, name),
        Expression::ArrayExpression(array) => {
            let mut items = Vec::with_capacity(array.elements.len());
            for element in &array.elements {
                match element {
                    ArrayExpressionElement::SpreadElement(_) => {
                        return Err(not_literal("spread element"))
                    }
                    ArrayExpressionElement::Elision(_) => items.push(Value::Null),
                    other => {
                        let inner = other
                            .as_expression()
                            .ok_or_else(|| not_literal("array element"))?;
                        items.push(to_json(inner, name)?);
                    }
                }
            }
            Ok(Value::Array(items))
        }
        Expression::ObjectExpression(object) => {
            let mut map = Map::new();
            for property in &object.properties {
                let ObjectPropertyKind::ObjectProperty(prop) = property else {
                    return Err(not_literal("spread property"));
                };
                if prop.computed {
                    return Err(not_literal("computed key"));
                }
                let key = property_key(&prop.key).ok_or_else(|| not_literal("property key"))?;
                map.insert(key, to_json(&prop.value, name)?);
            }
            Ok(Value::Object(map))
        }
        Expression::Identifier(ident) => Err(not_literal(&format!("identifier `{}`", ident.name))),
        Expression::CallExpression(_) => Err(not_literal("function call")),
        _ => Err(not_literal("expression")),
    }
}

fn property_key(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        PropertyKey::NumericLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}

fn number(value: f64) -> Option<Value> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(value as i64)))
    } else {
        Number::from_f64(value).map(Value::Number)
    }
}
