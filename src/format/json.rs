use chrono::NaiveDate;
use serde::Deserialize;

use super::Imported;
use crate::contact::Contact;
use crate::error::Result;

pub fn generate(contacts: &[Contact]) -> Result<String> {
    Ok(serde_json::to_string_pretty(contacts)?)
}

// Incoming entries are matched loosely; ids and unknown keys are ignored
// and validation happens per entry.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: Option<String>,
    dob: Option<String>,
    phone: Option<String>,
}

/// Parses a JSON export. The file must hold an array; entries without a
/// name or with a malformed date of birth are skipped with a warning.
pub fn parse(content: &str) -> Result<Vec<Imported>> {
    let raw: Vec<RawEntry> = serde_json::from_str(content)?;

    let imported = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let name = entry.name.unwrap_or_default();
            let dob = entry
                .dob
                .as_deref()
                .and_then(|dob| NaiveDate::parse_from_str(dob, "%Y-%m-%d").ok());

            match dob {
                Some(dob) if !name.is_empty() => Some(Imported {
                    name,
                    dob,
                    phone: entry.phone.filter(|phone| !phone.is_empty()),
                }),
                _ => {
                    log::warn!("skipping invalid json entry {}", index);
                    None
                }
            }
        })
        .collect();

    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parse_valid_entries() {
        let content = r#"[
            {"id": 1, "name": "Amara", "dob": "1990-07-15", "phone": null},
            {"name": "Beka", "dob": "1985-12-24", "phone": "+995 555 123456"}
        ]"#;

        let imported = parse(content).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Amara");
        assert_eq!(imported[0].dob, date(1990, 7, 15));
        assert_eq!(imported[0].phone, None);
        assert_eq!(imported[1].phone.as_deref(), Some("+995 555 123456"));
    }

    #[test]
    fn parse_skips_invalid_entries() {
        let content = r#"[
            {"name": "Amara", "dob": "1990-07-15"},
            {"name": "Beka"},
            {"dob": "1991-01-01"},
            {"name": "Cleo", "dob": "15.07.1990"}
        ]"#;

        let imported = parse(content).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Amara");
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(parse("{\"name\": \"Amara\"}").is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn export_round_trips_through_import() {
        let contacts = vec![Contact::new(
            "Amara".to_owned(),
            Some(date(1990, 7, 15)),
            Some("+995 555 123456".to_owned()),
        )];

        let json = generate(&contacts).unwrap();
        let imported = parse(&json).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Amara");
        assert_eq!(imported[0].dob, date(1990, 7, 15));
        assert_eq!(imported[0].phone.as_deref(), Some("+995 555 123456"));
    }
}
