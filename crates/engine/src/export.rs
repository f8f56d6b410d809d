//! Member registry CSV export.

use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;

use crate::{EngineError, Member, ResultEngine};

/// Spreadsheet tools use it to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Serialize)]
struct MemberRow<'a> {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Full name")]
    full_name: &'a str,
    #[serde(rename = "Birth date")]
    birth_date: Option<NaiveDate>,
    #[serde(rename = "Phone")]
    phone: Option<&'a str>,
    #[serde(rename = "Email")]
    email: Option<&'a str>,
    #[serde(rename = "Address")]
    address: Option<&'a str>,
    #[serde(rename = "Registration date")]
    registration_date: NaiveDate,
}

/// Renders `members` as CSV, BOM-prefixed, one row per member.
pub fn members_csv(members: &[Member]) -> ResultEngine<Vec<u8>> {
    let mut writer = Writer::from_writer(UTF8_BOM.to_vec());
    for member in members {
        writer
            .serialize(MemberRow {
                code: member.code.to_string(),
                full_name: &member.full_name,
                birth_date: member.birth_date,
                phone: member.phone.as_deref(),
                email: member.email.as_deref(),
                address: member.address.as_deref(),
                registration_date: member.registered_at.date_naive(),
            })
            .map_err(|err| EngineError::Collaborator(format!("csv export failed: {err}")))?;
    }
    if members.is_empty() {
        writer
            .write_record([
                "Code",
                "Full name",
                "Birth date",
                "Phone",
                "Email",
                "Address",
                "Registration date",
            ])
            .map_err(|err| EngineError::Collaborator(format!("csv export failed: {err}")))?;
    }
    writer
        .into_inner()
        .map_err(|err| EngineError::Collaborator(format!("csv export failed: {err}")))
}

/// `members_YYYYMMDD.csv`
#[must_use]
pub fn members_csv_file_name(today: NaiveDate) -> String {
    format!("members_{}.csv", today.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::MemberCode;

    #[test]
    fn rows_have_header_and_iso_dates() {
        let mut member = Member::new(
            MemberCode::new(3),
            "Maria Silva, Jr.",
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        )
        .unwrap();
        member.birth_date = NaiveDate::from_ymd_opt(1990, 1, 31);
        member.phone = Some("+55 11 99999-0000".to_string());

        let bytes = members_csv(&[member]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Code,Full name,Birth date,Phone,Email,Address,Registration date")
        );
        assert_eq!(
            lines.next(),
            Some("D003,\"Maria Silva, Jr.\",1990-01-31,+55 11 99999-0000,,,2024-05-02")
        );
    }

    #[test]
    fn empty_registry_still_has_header() {
        let bytes = members_csv(&[]).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("Code,Full name"));
    }

    #[test]
    fn file_name_carries_the_date() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(members_csv_file_name(day), "members_20250309.csv");
    }
}
