use super::{VerificationRecord, VerificationType};
use serde_json::json;

/// The fixed list of mock records used to seed a fresh ledger.
pub fn mock_records() -> Vec<VerificationRecord> {
    vec![
        VerificationRecord::new(
            "Alice Johnson",
            VerificationType::Gpa,
            json!({"name": "Alice Johnson", "university": "State University", "gpa": 3.8}),
            true,
            "GPA verified with the registrar",
        ),
        VerificationRecord::new(
            "Bob Smith",
            VerificationType::Employment,
            json!({"name": "Bob Smith", "employer": "Tech Corp", "title": "Software Engineer"}),
            true,
            "Employment confirmed by HR",
        ),
        VerificationRecord::new(
            "Carol White",
            VerificationType::Degree,
            json!({"name": "Carol White", "institution": "City College", "degree": "BSc Computer Science"}),
            false,
            "No matching degree on record",
        ),
        VerificationRecord::new(
            "David Lee",
            VerificationType::Gpa,
            json!({"name": "David Lee", "university": "Tech Institute", "gpa": 3.2}),
            false,
            "Reported GPA differs from transcript",
        ),
    ]
}
