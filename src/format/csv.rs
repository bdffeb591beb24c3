use chrono::NaiveDate;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while};
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::many0;
use nom::IResult;

use super::Imported;
use crate::contact::Contact;
use crate::error::{Error, ErrorKind, Result};

const HEADERS: [&str; 4] = ["id", "name", "dob", "phone"];

fn quoted_field(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let (input, parts) = many0(alt((
        map(is_not("\""), str::to_owned),
        map(tag("\"\""), |_| "\"".to_owned()),
    )))(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, parts.concat()))
}

fn bare_field(input: &str) -> IResult<&str, String> {
    map(take_while(|c| c != ','), |s: &str| s.trim().to_owned())(input)
}

fn field(input: &str) -> IResult<&str, String> {
    alt((quoted_field, bare_field))(input)
}

fn split_record(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut rest = line;

    loop {
        let (after, value) = field(rest)?;
        fields.push(value);

        match char::<&str, nom::error::Error<&str>>(',')(after) {
            Ok((after_sep, _)) => rest = after_sep,
            Err(_) => {
                if !after.is_empty() {
                    return Err(Error::new(
                        ErrorKind::CsvParse,
                        &format!("trailing garbage after field: '{}'", after),
                    ));
                }
                return Ok(fields);
            }
        }
    }
}

fn escape(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

pub fn generate(contacts: &[Contact]) -> String {
    let mut rows = vec![HEADERS.join(",")];

    for contact in contacts {
        let dob = contact.dob.map(|d| d.to_string()).unwrap_or_default();
        rows.push(
            [
                contact.id.to_string().as_str(),
                contact.name.as_str(),
                dob.as_str(),
                contact.phone.as_deref().unwrap_or(""),
            ]
            .iter()
            .map(|value| escape(value))
            .collect::<Vec<_>>()
            .join(","),
        );
    }

    rows.join("\n")
}

/// Parses an exported or hand-written CSV file. The header row must name
/// a `name` and a `dob` column; rows with a missing name or a malformed
/// date are skipped with a warning.
pub fn parse(content: &str) -> Result<Vec<Imported>> {
    let mut lines = content.lines().enumerate();

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| Error::new(ErrorKind::CsvParse, "file is empty"))?;
    let headers: Vec<String> = split_record(header_line)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let name_index = headers
        .iter()
        .position(|h| h == "name")
        .ok_or_else(|| Error::new(ErrorKind::CsvMissingColumn, "no 'name' column"))?;
    let dob_index = headers
        .iter()
        .position(|h| h == "dob")
        .ok_or_else(|| Error::new(ErrorKind::CsvMissingColumn, "no 'dob' column"))?;
    let phone_index = headers.iter().position(|h| h == "phone");

    let mut imported = Vec::new();

    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let values = split_record(line)?;
        let name = values.get(name_index).map(String::as_str).unwrap_or("");
        let dob = values.get(dob_index).map(String::as_str).unwrap_or("");

        let dob = match NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
            Ok(date) if !name.is_empty() => date,
            _ => {
                log::warn!("skipping invalid csv row {}: '{}'", index + 1, line);
                continue;
            }
        };

        let phone = phone_index
            .and_then(|i| values.get(i))
            .filter(|phone| !phone.is_empty())
            .cloned();

        imported.push(Imported {
            name: name.to_owned(),
            dob,
            phone,
        });
    }

    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn split_plain_record() {
        assert_eq!(
            split_record("a,b,c").unwrap(),
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
        );
    }

    #[test]
    fn split_keeps_empty_fields() {
        assert_eq!(
            split_record("a,,c,").unwrap(),
            vec!["a".to_owned(), "".to_owned(), "c".to_owned(), "".to_owned()]
        );
    }

    #[test]
    fn split_quoted_fields() {
        assert_eq!(
            split_record("\"Last, First\",\"say \"\"hi\"\"\"").unwrap(),
            vec!["Last, First".to_owned(), "say \"hi\"".to_owned()]
        );
    }

    #[test]
    fn split_rejects_garbage_after_quote() {
        assert!(split_record("\"a\"b,c").is_err());
    }

    #[test]
    fn parse_basic_file() {
        let content = "id,name,dob,phone\n1,Amara,1990-07-15,\n2,Beka,1985-12-24,+995 555 123456\n";
        let imported = parse(content).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Amara");
        assert_eq!(imported[0].dob, date(1990, 7, 15));
        assert_eq!(imported[0].phone, None);
        assert_eq!(imported[1].phone.as_deref(), Some("+995 555 123456"));
    }

    #[test]
    fn parse_tolerates_crlf_and_blank_lines() {
        let content = "name,dob\r\nAmara,1990-07-15\r\n\r\n";
        let imported = parse(content).unwrap();
        assert_eq!(imported.len(), 1);
    }

    #[test]
    fn parse_reorders_by_header() {
        let content = "dob,name\n1990-07-15,Amara\n";
        let imported = parse(content).unwrap();
        assert_eq!(imported[0].name, "Amara");
        assert_eq!(imported[0].dob, date(1990, 7, 15));
    }

    #[test]
    fn parse_skips_invalid_rows() {
        let content = "name,dob\nAmara,1990-07-15\n,1991-01-01\nBeka,not-a-date\nCleo,1999-02-31\n";
        let imported = parse(content).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Amara");
    }

    #[test]
    fn parse_requires_name_and_dob_columns() {
        assert!(parse("id,phone\n1,+995\n").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn generate_quotes_and_escapes() {
        let mut contact = Contact::new(
            "Last, First \"Nick\"".to_owned(),
            Some(date(1990, 7, 15)),
            None,
        );
        contact.id = Uuid::nil();

        let csv = generate(&[contact]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,name,dob,phone"));
        assert_eq!(
            lines.next(),
            Some(format!("{},\"Last, First \"\"Nick\"\"\",1990-07-15,", Uuid::nil()).as_str())
        );
    }

    #[test]
    fn generated_output_parses_back() {
        let contacts = vec![
            Contact::new("Amara".to_owned(), Some(date(1990, 7, 15)), None),
            Contact::new(
                "Beka, Jr.".to_owned(),
                Some(date(1985, 12, 24)),
                Some("+995 555 123456".to_owned()),
            ),
        ];

        let imported = parse(&generate(&contacts)).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[1].name, "Beka, Jr.");
        assert_eq!(imported[1].dob, date(1985, 12, 24));
        assert_eq!(imported[1].phone.as_deref(), Some("+995 555 123456"));
    }
}
