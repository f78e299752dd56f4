// Company Domain Model

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four independent service counters at the venue.
///
/// The set is closed: every counter path, display label and station key
/// binding is keyed by exactly one of these letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompanyId {
    A,
    B,
    C,
    D,
}

impl CompanyId {
    /// All companies in display order
    pub const ALL: [CompanyId; 4] = [CompanyId::A, CompanyId::B, CompanyId::C, CompanyId::D];

    /// Upper-case letter used in paths and labels
    pub fn letter(self) -> char {
        match self {
            CompanyId::A => 'A',
            CompanyId::B => 'B',
            CompanyId::C => 'C',
            CompanyId::D => 'D',
        }
    }

    /// Position in `ALL` (stable, used for fixed-size per-company arrays)
    pub fn index(self) -> usize {
        match self {
            CompanyId::A => 0,
            CompanyId::B => 1,
            CompanyId::C => 2,
            CompanyId::D => 3,
        }
    }

    /// Station key bound to this company ('1'..'4')
    pub fn hotkey(self) -> char {
        match self {
            CompanyId::A => '1',
            CompanyId::B => '2',
            CompanyId::C => '3',
            CompanyId::D => '4',
        }
    }

    /// Resolve a station key press. Unbound keys yield `None`.
    pub fn from_hotkey(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            '1' => Some(CompanyId::A),
            '2' => Some(CompanyId::B),
            '3' => Some(CompanyId::C),
            '4' => Some(CompanyId::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for CompanyId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(CompanyId::A),
            "B" | "b" => Ok(CompanyId::B),
            "C" | "c" => Ok(CompanyId::C),
            "D" | "d" => Ok(CompanyId::D),
            other => Err(DomainError::UnknownCompany(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkeys_map_to_companies_in_order() {
        assert_eq!(CompanyId::from_hotkey('1'), Some(CompanyId::A));
        assert_eq!(CompanyId::from_hotkey('2'), Some(CompanyId::B));
        assert_eq!(CompanyId::from_hotkey('3'), Some(CompanyId::C));
        assert_eq!(CompanyId::from_hotkey('4'), Some(CompanyId::D));
        assert_eq!(CompanyId::from_hotkey('5'), None);
        assert_eq!(CompanyId::from_hotkey('a'), None);

        for company in CompanyId::ALL {
            assert_eq!(CompanyId::from_hotkey(company.hotkey()), Some(company));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("c".parse::<CompanyId>().unwrap(), CompanyId::C);
        assert_eq!(" D ".parse::<CompanyId>().unwrap(), CompanyId::D);
        assert!("E".parse::<CompanyId>().is_err());
        assert!("".parse::<CompanyId>().is_err());
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, company) in CompanyId::ALL.iter().enumerate() {
            assert_eq!(company.index(), i);
        }
    }

    #[test]
    fn test_serde_uses_plain_letter() {
        let json = serde_json::to_string(&CompanyId::B).unwrap();
        assert_eq!(json, "\"B\"");
        let back: CompanyId = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(back, CompanyId::D);
    }
}
