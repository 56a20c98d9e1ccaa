//! @ai:module:intent Parse the `param` and `return` tag value micro-grammars
//! @ai:module:layer domain
//! @ai:module:public_api parse_param, parse_return
//! @ai:module:stateless true
//!
//! Grammar, jsdoc flavoured:
//!
//! ```text
//! param  := [ "{" type "}" ] ( "[" name "=" default "]" | "[" name "]" | token ) [ description ]
//! return := [ "{" type "}" ] [ description ]
//! ```

use crate::record::{Param, Return};

/// The name part of a param value.
struct ParamName<'a> {
    name: &'a str,
    optional: bool,
    default_value: Option<&'a str>,
}

/// @ai:intent Parse a `param` tag value
/// @ai:example ("{string} [x=\"a\"] desc") -> type string, optional, name x, default "a", description desc
/// @ai:example ("y") -> required param named y
/// @ai:example ("") -> description "" and nothing else
/// @ai:effects pure
pub fn parse_param(value: &str) -> Param {
    let value = value.trim();

    if let Some((type_name, rest)) = split_type(value) {
        if let Some(param) = parse_name_and_description(rest) {
            return Param {
                type_name: Some(type_name.to_string()),
                ..param
            };
        }
    }

    // `{type}` without a following name is read as a bare token
    parse_name_and_description(value).unwrap_or_else(|| Param {
        description: Some(value.to_string()),
        ..Default::default()
    })
}

/// @ai:intent Parse a `return` tag value
/// @ai:example ("{number} the count") -> type number, description "the count"
/// @ai:example ("the count") -> description "the count"
/// @ai:effects pure
pub fn parse_return(value: &str) -> Return {
    let value = value.trim();

    match split_type(value) {
        Some((type_name, rest)) => Return {
            type_name: Some(type_name.to_string()),
            description: non_empty(rest),
        },
        None => Return {
            type_name: None,
            description: non_empty(value),
        },
    }
}

/// Split a leading `{type}` off, returning the type and the remainder.
fn split_type(input: &str) -> Option<(&str, &str)> {
    let inner = input.strip_prefix('{')?;
    let close = inner.find('}')?;
    if close == 0 {
        return None;
    }
    Some((&inner[..close], &inner[close + 1..]))
}

fn parse_name_and_description(input: &str) -> Option<Param> {
    let (name, rest) = split_name(input.trim_start())?;

    Some(Param {
        type_name: None,
        optional: name.optional,
        name: Some(name.name.to_string()),
        default_value: name.default_value.map(str::to_string),
        description: non_empty(rest),
    })
}

/// @ai:intent Split off `[name=default]`, `[name]` or a bare token, in that priority
/// @ai:effects pure
fn split_name(input: &str) -> Option<(ParamName<'_>, &str)> {
    if let Some(bracketed) = input.strip_prefix('[') {
        if let Some(close) = bracketed.find(']') {
            let inner = &bracketed[..close];
            let rest = &bracketed[close + 1..];

            if let Some((name, default_value)) = inner.split_once('=') {
                if !name.is_empty() && !default_value.is_empty() {
                    let name = ParamName {
                        name,
                        optional: true,
                        default_value: Some(default_value),
                    };
                    return Some((name, rest));
                }
            }

            if !inner.is_empty() {
                let name = ParamName {
                    name: inner,
                    optional: true,
                    default_value: None,
                };
                return Some((name, rest));
            }
        }
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    if end == 0 {
        return None;
    }

    let name = ParamName {
        name: &input[..end],
        optional: false,
        default_value: None,
    };
    Some((name, &input[end..]))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
