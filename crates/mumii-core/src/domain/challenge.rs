use serde::{Deserialize, Serialize};

/// A gamified food challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub duration: String,
    pub points: u32,
    pub participants: u32,
    /// Completion percentage, 0-100.
    pub progress: u8,
    pub is_completed: bool,
    pub location: String,
}

/// Listing filter for challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// Started but not finished.
    Active,
    Completed,
    /// Not started yet.
    Available,
}

impl ChallengeStatus {
    /// Parse a query value. Unknown values mean "no filter".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "available" => Some(Self::Available),
            _ => None,
        }
    }

    pub fn matches(self, challenge: &Challenge) -> bool {
        match self {
            Self::Active => !challenge.is_completed && challenge.progress > 0,
            Self::Completed => challenge.is_completed,
            Self::Available => !challenge.is_completed && challenge.progress == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(progress: u8, is_completed: bool) -> Challenge {
        Challenge {
            id: "1".to_string(),
            title: "Time Travel".to_string(),
            description: String::new(),
            kind: "time-travel".to_string(),
            difficulty: "medium".to_string(),
            duration: "2-3 hours".to_string(),
            points: 150,
            participants: 4,
            progress,
            is_completed,
            location: "Old Quarter, Hanoi".to_string(),
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ChallengeStatus::parse("active"), Some(ChallengeStatus::Active));
        assert_eq!(ChallengeStatus::parse("everything"), None);
    }

    #[test]
    fn test_status_matching() {
        let started = challenge(60, false);
        let fresh = challenge(0, false);
        let done = challenge(100, true);

        assert!(ChallengeStatus::Active.matches(&started));
        assert!(!ChallengeStatus::Active.matches(&fresh));
        assert!(!ChallengeStatus::Active.matches(&done));

        assert!(ChallengeStatus::Available.matches(&fresh));
        assert!(!ChallengeStatus::Available.matches(&started));

        assert!(ChallengeStatus::Completed.matches(&done));
        assert!(!ChallengeStatus::Completed.matches(&started));
    }

    #[test]
    fn test_type_field_renamed() {
        let json = serde_json::to_value(challenge(0, false)).unwrap();
        assert_eq!(json["type"], "time-travel");
        assert_eq!(json["isCompleted"], false);
    }
}
