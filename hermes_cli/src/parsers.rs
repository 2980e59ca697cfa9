use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(format!("invalid duration {input:?}"))
}

/// Accepts only strictly positive, finite loads.
pub fn parse_load(input: &str) -> Result<f64, String> {
    match input.parse::<f64>() {
        Ok(load) if load.is_finite() && load > 0.0 => Ok(load),
        Ok(_) => Err(format!("load must be positive, got {input}")),
        Err(error) => Err(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_parse_duration_formats() {
        assert_eq!(parse_duration("PT10S"), Ok(SignedDuration::from_secs(10)));
        assert_eq!(parse_duration("2m"), Ok(SignedDuration::from_mins(2)));
        assert_eq!(parse_duration("45"), Ok(SignedDuration::from_secs(45)));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(parse_load("12000"), Ok(12000.0));
        assert!(parse_load("0").is_err());
        assert!(parse_load("-3").is_err());
        assert!(parse_load("heavy").is_err());
    }
}
