use std::str::FromStr;

use serde::Serialize;

use crate::errors::LadderError;

/// One reported row: the field a match was played on and the two raw scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub field_number: u32,
    pub score_a: u32,
    pub score_b: u32,
}

impl ScoreReport {
    pub fn new(field_number: u32, score_a: u32, score_b: u32) -> Self {
        Self {
            field_number,
            score_a,
            score_b,
        }
    }

    /// Builds a report from the text a scorer typed in for each column.
    pub fn parse(field: &str, score_a: &str, score_b: &str) -> Result<Self, LadderError> {
        let field_number = parse_field_number(field)?;
        Ok(Self {
            field_number,
            score_a: parse_score(field_number, score_a)?,
            score_b: parse_score(field_number, score_b)?,
        })
    }
}

fn parse_field_number(value: &str) -> Result<u32, LadderError> {
    match value.trim().parse::<u32>() {
        Ok(field) if field >= 1 => Ok(field),
        _ => Err(LadderError::InvalidFieldNumber(value.to_string())),
    }
}

fn parse_score(field: u32, value: &str) -> Result<u32, LadderError> {
    let trimmed = value.trim();
    // u32::from_str accepts a leading '+'
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_score(field, value));
    }
    trimmed.parse().map_err(|_| invalid_score(field, value))
}

fn invalid_score(field: u32, value: &str) -> LadderError {
    LadderError::InvalidScore {
        field,
        value: value.to_string(),
    }
}

/// `FIELD:A-B`, e.g. `3:21-15`
impl FromStr for ScoreReport {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, scores) = s
            .split_once(':')
            .ok_or_else(|| LadderError::InvalidScoreReport(s.to_string()))?;
        let (score_a, score_b) = scores
            .split_once('-')
            .ok_or_else(|| LadderError::InvalidScoreReport(s.to_string()))?;
        Self::parse(field, score_a, score_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_report() {
        let report: ScoreReport = "3:21-15".parse().unwrap();
        assert_eq!(report, ScoreReport::new(3, 21, 15));

        let report = ScoreReport::parse(" 1 ", " 0", "0 ").unwrap();
        assert_eq!(report, ScoreReport::new(1, 0, 0));
    }

    #[test]
    fn test_rejects_non_numeric_scores() {
        let err = ScoreReport::parse("2", "N/A", "15").unwrap_err();
        assert!(matches!(err, LadderError::InvalidScore { field: 2, .. }));

        assert!(ScoreReport::parse("2", "", "15").is_err());
        assert!(ScoreReport::parse("2", "+21", "15").is_err());
        assert!(ScoreReport::parse("2", "21.5", "15").is_err());
    }

    #[test]
    fn test_rejects_negative_scores() {
        // "-3" never reaches the score parser through FIELD:A-B, so check it directly
        let err = ScoreReport::parse("1", "-3", "21").unwrap_err();
        assert!(matches!(err, LadderError::InvalidScore { .. }));
    }

    #[test]
    fn test_rejects_bad_field_numbers() {
        assert!(matches!(
            ScoreReport::parse("0", "21", "15"),
            Err(LadderError::InvalidFieldNumber(_))
        ));
        assert!(matches!(
            ScoreReport::parse("x", "21", "15"),
            Err(LadderError::InvalidFieldNumber(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_report() {
        assert!(matches!(
            "3 21 15".parse::<ScoreReport>(),
            Err(LadderError::InvalidScoreReport(_))
        ));
        assert!(matches!(
            "3:2115".parse::<ScoreReport>(),
            Err(LadderError::InvalidScoreReport(_))
        ));
    }
}
