//! Member registry primitives.
//!
//! Every member carries a human-readable [`MemberCode`] (`D001`, `D002`, ...)
//! assigned once at creation from the `member_code` counter.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// Sequence token of a member, printed as `D` followed by at least three
/// digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberCode(u32);

impl MemberCode {
    pub const FIRST: MemberCode = MemberCode(1);

    #[must_use]
    pub const fn new(seq: u32) -> Self {
        Self(seq)
    }

    #[must_use]
    pub const fn seq(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{:03}", self.0)
    }
}

impl FromStr for MemberCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("invalid member code: {s}"));
        let digits = s.strip_prefix('D').ok_or_else(invalid)?;
        if digits.len() < 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let seq: u32 = digits.parse().map_err(|_| invalid())?;
        if seq == 0 {
            return Err(invalid());
        }
        Ok(Self(seq))
    }
}

impl TryFrom<String> for MemberCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberCode> for String {
    fn from(code: MemberCode) -> Self {
        code.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub code: MemberCode,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl Member {
    /// Builds a member with only the required fields set.
    pub fn new(
        code: MemberCode,
        full_name: &str,
        registered_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(EngineError::Validation(
                "member full name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            code,
            full_name: full_name.to_string(),
            birth_date: None,
            phone: None,
            email: None,
            address: None,
            registered_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code_seq: i64,
    pub code: String,
    pub full_name: String,
    pub birth_date: Option<Date>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub registered_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Member> for ActiveModel {
    fn from(member: &Member) -> Self {
        Self {
            id: ActiveValue::Set(member.id.to_string()),
            code_seq: ActiveValue::Set(i64::from(member.code.seq())),
            code: ActiveValue::Set(member.code.to_string()),
            full_name: ActiveValue::Set(member.full_name.clone()),
            birth_date: ActiveValue::Set(member.birth_date),
            phone: ActiveValue::Set(member.phone.clone()),
            email: ActiveValue::Set(member.email.clone()),
            address: ActiveValue::Set(member.address.clone()),
            registered_at: ActiveValue::Set(member.registered_at),
        }
    }
}

impl TryFrom<Model> for Member {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let seq = u32::try_from(model.code_seq)
            .map_err(|_| EngineError::Validation(format!("invalid member code: {}", model.code)))?;
        Ok(Self {
            id: parse_uuid(&model.id, "member")?,
            code: MemberCode::new(seq),
            full_name: model.full_name,
            birth_date: model.birth_date,
            phone: model.phone,
            email: model.email,
            address: model.address,
            registered_at: model.registered_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_zero_padded_to_three_digits() {
        assert_eq!(MemberCode::FIRST.to_string(), "D001");
        assert_eq!(MemberCode::new(42).to_string(), "D042");
        assert_eq!(MemberCode::new(1000).to_string(), "D1000");
    }

    #[test]
    fn code_parses_back() {
        assert_eq!("D007".parse::<MemberCode>().unwrap(), MemberCode::new(7));
        assert_eq!(
            "D1234".parse::<MemberCode>().unwrap(),
            MemberCode::new(1234)
        );
        assert!("7".parse::<MemberCode>().is_err());
        assert!("D7".parse::<MemberCode>().is_err());
        assert!("D000".parse::<MemberCode>().is_err());
        assert!("X001".parse::<MemberCode>().is_err());
    }

    #[test]
    fn blank_full_name_is_rejected() {
        let err = Member::new(MemberCode::FIRST, "   ", Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
