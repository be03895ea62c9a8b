use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmployeeStatus::Active)
    }
}

/// An employee eligible for clock events. Lookup happens by full DNI or
/// by its trailing digits; an ambiguous fragment is rejected upstream.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: i64,
    pub dni: String,
    pub name: String,
    pub status: EmployeeStatus,
    pub created_at: String,
}

impl Employee {
    pub fn new(id: i64, dni: String, name: String) -> Self {
        Self {
            id,
            dni,
            name,
            status: EmployeeStatus::Active,
            created_at: chrono::Local::now().to_rfc3339(),
        }
    }
}
