use crate::error::SchemaError;

/// One parsed key component: a literal constant or a `_.field` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyComponent {
    Literal(String),
    Field(String),
}

/// Parses a component token. `_.ident` is a field reference; any other
/// non-empty token not beginning with `_` is a literal. Everything else is
/// malformed and fatal to generation.
pub fn parse_component(token: &str, context: &str) -> Result<KeyComponent, SchemaError> {
    if let Some(field) = token.strip_prefix("_.") {
        if is_identifier(field) {
            return Ok(KeyComponent::Field(field.to_string()));
        }
    } else if !token.is_empty() && !token.starts_with('_') {
        return Ok(KeyComponent::Literal(token.to_string()));
    }

    Err(SchemaError::InvalidKeyComponent {
        component: token.to_string(),
        context: context.to_string(),
    })
}

pub fn parse_components(tokens: &[String], context: &str) -> Result<Vec<KeyComponent>, SchemaError> {
    tokens
        .iter()
        .map(|token| parse_component(token, context))
        .collect()
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literals_and_field_references() {
        assert_eq!(
            parse_component("author", "partition `Author`").unwrap(),
            KeyComponent::Literal("author".to_string())
        );
        assert_eq!(
            parse_component("_.authorId", "partition `Author`").unwrap(),
            KeyComponent::Field("authorId".to_string())
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "_.", "_authorId", "_.author id"] {
            let err = parse_component(token, "partition `Author`").unwrap_err();
            assert_eq!(
                err,
                SchemaError::InvalidKeyComponent {
                    component: token.to_string(),
                    context: "partition `Author`".to_string(),
                }
            );
        }
    }
}
