// Counter Domain Model
//
// Two logical counters per company live in the shared store:
//   queue/{company}  -> { current }   number being served (clamped)
//   ticket/{company} -> { current }   last issued ticket (unbounded)

use crate::domain::company::CompanyId;
use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lowest queue value
pub const QUEUE_FLOOR: i64 = 0;

/// Highest queue value
pub const QUEUE_CEILING: i64 = 999;

/// Which of the two per-company counters a path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Queue,
    Ticket,
}

impl CounterKind {
    pub const ALL: [CounterKind; 2] = [CounterKind::Queue, CounterKind::Ticket];

    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::Queue => "queue",
            CounterKind::Ticket => "ticket",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(CounterKind::Queue),
            "ticket" => Ok(CounterKind::Ticket),
            other => Err(DomainError::UnknownCounterKind(other.to_string())),
        }
    }
}

/// Hierarchical store path, rendered as `{kind}/{company}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterPath {
    pub kind: CounterKind,
    pub company: CompanyId,
}

impl CounterPath {
    pub fn new(kind: CounterKind, company: CompanyId) -> Self {
        Self { kind, company }
    }

    pub fn queue(company: CompanyId) -> Self {
        Self::new(CounterKind::Queue, company)
    }

    pub fn ticket(company: CompanyId) -> Self {
        Self::new(CounterKind::Ticket, company)
    }

    /// Every path in the key space (queue paths first)
    pub fn all() -> impl Iterator<Item = CounterPath> {
        CounterKind::ALL.into_iter().flat_map(|kind| {
            CompanyId::ALL
                .into_iter()
                .map(move |company| CounterPath::new(kind, company))
        })
    }
}

impl std::fmt::Display for CounterPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.company)
    }
}

impl FromStr for CounterPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, company) = s
            .split_once('/')
            .ok_or_else(|| DomainError::InvalidPath(s.to_string()))?;
        if company.contains('/') {
            return Err(DomainError::InvalidPath(s.to_string()));
        }
        Ok(Self::new(kind.parse()?, company.parse()?))
    }
}

/// Value stored at a counter path. Writes always replace the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterValue {
    pub current: i64,
}

impl CounterValue {
    pub fn new(current: i64) -> Self {
        Self { current }
    }

    /// Absent values read as zero
    pub fn or_zero(value: Option<CounterValue>) -> i64 {
        value.map(|v| v.current).unwrap_or(0)
    }
}

/// Queue value after one increment (saturates at the ceiling)
pub fn queue_after_increment(current: i64) -> i64 {
    current.saturating_add(1).clamp(QUEUE_FLOOR, QUEUE_CEILING)
}

/// Queue value after one decrement (saturates at the floor)
pub fn queue_after_decrement(current: i64) -> i64 {
    current.saturating_sub(1).clamp(QUEUE_FLOOR, QUEUE_CEILING)
}

/// Ticket number following `current`. Not wrapped at 999.
pub fn ticket_after(current: i64) -> i64 {
    current.max(0).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_path_display_and_parse() {
        let path = CounterPath::queue(CompanyId::A);
        assert_eq!(path.to_string(), "queue/A");
        assert_eq!("ticket/D".parse::<CounterPath>().unwrap(), CounterPath::ticket(CompanyId::D));

        assert!("queue".parse::<CounterPath>().is_err());
        assert!("queue/E".parse::<CounterPath>().is_err());
        assert!("stock/A".parse::<CounterPath>().is_err());
        assert!("queue/A/current".parse::<CounterPath>().is_err());
    }

    #[test]
    fn test_all_paths_cover_key_space() {
        let paths: Vec<String> = CounterPath::all().map(|p| p.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "queue/A", "queue/B", "queue/C", "queue/D", "ticket/A", "ticket/B", "ticket/C",
                "ticket/D"
            ]
        );
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_value(CounterValue::new(7)).unwrap();
        assert_eq!(json, serde_json::json!({"current": 7}));
    }

    #[test]
    fn test_queue_saturates_at_bounds() {
        assert_eq!(queue_after_increment(998), 999);
        assert_eq!(queue_after_increment(999), 999);
        assert_eq!(queue_after_decrement(1), 0);
        assert_eq!(queue_after_decrement(0), 0);
    }

    #[test]
    fn test_ticket_keeps_counting_past_999() {
        assert_eq!(ticket_after(0), 1);
        assert_eq!(ticket_after(999), 1000);
        assert_eq!(ticket_after(-3), 1);
    }

    proptest! {
        #[test]
        fn prop_queue_steps_match_clamped_sum(
            initial in 0i64..=999,
            steps in proptest::collection::vec(any::<bool>(), 0..300),
        ) {
            let mut current = initial;
            let mut expected = initial;
            for up in steps {
                if up {
                    current = queue_after_increment(current);
                    expected = (expected + 1).min(QUEUE_CEILING);
                } else {
                    current = queue_after_decrement(current);
                    expected = (expected - 1).max(QUEUE_FLOOR);
                }
                prop_assert!((QUEUE_FLOOR..=QUEUE_CEILING).contains(&current));
            }
            prop_assert_eq!(current, expected);
        }
    }
}
