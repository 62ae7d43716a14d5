//! Positional-count validation for a parse pass.

use crate::command::PositionalDef;
use crate::error::ParseError;

/// Checks the parsed positional count against the command's definitions.
///
/// With `defined` definitions of which `required` are required, a `parsed`
/// count passes when it covers every required slot and does not exceed the
/// defined capacity; a trailing variadic definition absorbs any excess.
pub(crate) fn validate_positionals(
    defs: &[PositionalDef],
    parsed: usize,
) -> Result<(), ParseError> {
    let defined = defs.len();
    let required = defs.iter().filter(|def| def.is_required()).count();
    let variadic = defs.last().is_some_and(PositionalDef::is_variadic);

    if defined == 0 && parsed > 0 {
        return Err(ParseError::TooManyArguments {
            expected: 0,
            got: parsed,
        });
    }
    if parsed < required {
        // required-before-optional ordering puts the first unfilled
        // definition at index `parsed`
        return Err(ParseError::MissingRequiredArgument(
            defs[parsed].name().to_string(),
        ));
    }
    if !variadic && parsed > defined {
        return Err(ParseError::TooManyArguments {
            expected: defined,
            got: parsed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PositionalDef;
    use crate::value::{Value, ValueKind};

    fn defs(parts: &[PositionalDef]) -> Vec<PositionalDef> {
        parts.to_vec()
    }

    #[test]
    fn test_no_definitions_reject_any_token() {
        assert!(validate_positionals(&[], 0).is_ok());
        assert_eq!(
            validate_positionals(&[], 2),
            Err(ParseError::TooManyArguments {
                expected: 0,
                got: 2
            })
        );
    }

    #[test]
    fn test_missing_required_names_first_unfilled() {
        let defs = defs(&[
            PositionalDef::required("name", "", ValueKind::Str),
            PositionalDef::required("url", "", ValueKind::Str),
        ]);
        assert_eq!(
            validate_positionals(&defs, 1),
            Err(ParseError::MissingRequiredArgument("url".to_string()))
        );
        assert!(validate_positionals(&defs, 2).is_ok());
    }

    #[test]
    fn test_excess_without_variadic_is_too_many() {
        let defs = defs(&[
            PositionalDef::required("name", "", ValueKind::Str),
            PositionalDef::optional("depth", "", Value::Int(1)),
        ]);
        assert!(validate_positionals(&defs, 1).is_ok());
        assert!(validate_positionals(&defs, 2).is_ok());
        assert_eq!(
            validate_positionals(&defs, 3),
            Err(ParseError::TooManyArguments {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_trailing_variadic_absorbs_excess() {
        let defs = defs(&[
            PositionalDef::required("name", "", ValueKind::Str),
            PositionalDef::variadic("paths", ""),
        ]);
        assert!(validate_positionals(&defs, 1).is_ok());
        assert!(validate_positionals(&defs, 12).is_ok());
    }

    #[test]
    fn test_required_variadic_needs_one_token() {
        let defs = defs(&[PositionalDef::variadic("paths", "").at_least_one()]);
        assert_eq!(
            validate_positionals(&defs, 0),
            Err(ParseError::MissingRequiredArgument("paths".to_string()))
        );
        assert!(validate_positionals(&defs, 1).is_ok());
    }
}
