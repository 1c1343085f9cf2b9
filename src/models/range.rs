use serde::Deserialize;

use crate::errors::RelayError;

/// Inclusive date range for a cost query, as ISO date strings.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Request body accepted by the cost endpoints. Both fields are optional at
/// the wire level so that their absence can be reported as a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<DateRangeRequest> for DateRange {
    type Error = RelayError;

    fn try_from(req: DateRangeRequest) -> Result<Self, Self::Error> {
        let start = req.start_date.filter(|s| !s.trim().is_empty());
        let end = req.end_date.filter(|s| !s.trim().is_empty());
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(RelayError::Validation("startDate and endDate are required".into())),
        }
    }
}
