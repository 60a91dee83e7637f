use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub cpf: String,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub is_active: bool,
}

impl Patient {
    /// Case-insensitive substring match on name, email or id number.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.full_name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.cpf.contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(name: &str, email: &str, cpf: &str) -> Patient {
        Patient {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: email.to_string(),
            phone: None,
            birth_date: None,
            cpf: cpf.to_string(),
            address: None,
            emergency_contact: None,
            medical_history: None,
            allergies: None,
            medications: None,
            is_active: true,
        }
    }

    #[test]
    fn search_is_case_insensitive_on_name_and_email() {
        let p = patient("Ana Silva Santos", "Ana.Santos@example.com", "123.456.789-00");
        assert!(p.matches_search("ana"));
        assert!(p.matches_search("SILVA"));
        assert!(p.matches_search("ana.santos@"));
        assert!(!p.matches_search("carlos"));
    }

    #[test]
    fn search_matches_cpf_digits() {
        let p = patient("Ana Silva Santos", "ana@example.com", "123.456.789-00");
        assert!(p.matches_search("456.789"));
        assert!(!p.matches_search("999"));
    }
}
