use osprey_bridge::strand::OptionValue;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(
        "Invalid builder option '{0}'. Expected 'name=value' (e.g., 'setErrorOnNonTemplateResidues=false')."
    )]
    InvalidOptionFormat(String),

    #[error("Builder option name cannot be empty in '{0}'.")]
    EmptyName(String),
}

/// Parses one `NAME=VALUE` builder option. Values are typed by shape:
/// `true`/`false` become booleans, then integers, then floats; anything else
/// stays a string and reaches the builder verbatim.
pub fn parse_builder_option(raw: &str) -> Result<(String, OptionValue), ParseError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidOptionFormat(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName(raw.to_string()));
    }

    let value = value.trim();
    let value = if value.eq_ignore_ascii_case("true") {
        OptionValue::Bool(true)
    } else if value.eq_ignore_ascii_case("false") {
        OptionValue::Bool(false)
    } else if let Ok(int) = value.parse::<i64>() {
        OptionValue::Int(int)
    } else if let Ok(float) = value.parse::<f64>() {
        OptionValue::Float(float)
    } else {
        OptionValue::Str(value.to_string())
    };

    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_values() {
        assert_eq!(
            parse_builder_option("setErrorOnNonTemplateResidues=false").unwrap(),
            (
                "setErrorOnNonTemplateResidues".to_string(),
                OptionValue::Bool(false)
            )
        );
        assert_eq!(
            parse_builder_option("setMaxRotamers=7").unwrap(),
            ("setMaxRotamers".to_string(), OptionValue::Int(7))
        );
        assert_eq!(
            parse_builder_option("setShellDistance=4.5").unwrap(),
            ("setShellDistance".to_string(), OptionValue::Float(4.5))
        );
        assert_eq!(
            parse_builder_option("setTemplateLibrary=lovell").unwrap(),
            (
                "setTemplateLibrary".to_string(),
                OptionValue::Str("lovell".to_string())
            )
        );
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(
            parse_builder_option("setTemplateLibrary"),
            Err(ParseError::InvalidOptionFormat(
                "setTemplateLibrary".to_string()
            ))
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            parse_builder_option("=true"),
            Err(ParseError::EmptyName("=true".to_string()))
        );
    }
}
