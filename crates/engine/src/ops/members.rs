use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Member, MemberCode, MemberUpdate, NewMember, ResultEngine, counters, entry,
    members, transactions,
    util::{normalize_optional_text, normalize_required},
};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a member and assigns the next `D###` code.
    pub async fn create_member(&self, cmd: NewMember) -> ResultEngine<Member> {
        let full_name = normalize_required(&cmd.full_name, "member full name")?;
        with_tx!(self, |db_tx| {
            let code = next_member_code(&db_tx).await?;
            let mut member = Member::new(code, &full_name, Utc::now())?;
            member.birth_date = cmd.birth_date;
            member.phone = normalize_optional_text(cmd.phone.as_deref());
            member.email = normalize_optional_text(cmd.email.as_deref());
            member.address = normalize_optional_text(cmd.address.as_deref());

            members::ActiveModel::from(&member).insert(&db_tx).await?;
            tracing::info!(code = %member.code, "member registered");
            Ok(member)
        })
    }

    pub async fn member(&self, id: Uuid) -> ResultEngine<Member> {
        members::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("member {id}")))?
            .try_into()
    }

    /// All members, ordered by code.
    pub async fn list_members(&self) -> ResultEngine<Vec<Member>> {
        members::Entity::find()
            .order_by_asc(members::Column::CodeSeq)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Member::try_from)
            .collect()
    }

    pub async fn update_member(&self, id: Uuid, update: MemberUpdate) -> ResultEngine<Member> {
        let mut member = self.member(id).await?;
        if let Some(full_name) = update.full_name {
            member.full_name = normalize_required(&full_name, "member full name")?;
        }
        if let Some(birth_date) = update.birth_date {
            member.birth_date = birth_date;
        }
        if let Some(phone) = update.phone {
            member.phone = normalize_optional_text(Some(&phone));
        }
        if let Some(email) = update.email {
            member.email = normalize_optional_text(Some(&email));
        }
        if let Some(address) = update.address {
            member.address = normalize_optional_text(Some(&address));
        }

        members::ActiveModel::from(&member)
            .update(&self.database)
            .await?;
        Ok(member)
    }

    /// Deletes a member. Its code is not handed out again.
    ///
    /// A member referenced by any transaction or entry cannot be deleted.
    pub async fn delete_member(&self, id: Uuid) -> ResultEngine<()> {
        let key = id.to_string();
        with_tx!(self, |db_tx| {
            let history = transactions::Entity::find()
                .filter(transactions::Column::MemberId.eq(key.clone()))
                .count(&db_tx)
                .await?
                + entry::Entity::find()
                    .filter(entry::Column::MemberId.eq(key.clone()))
                    .count(&db_tx)
                    .await?;
            if history > 0 {
                return Err(EngineError::Validation(format!(
                    "member {id} has {history} linked payment records"
                )));
            }

            let result = members::Entity::delete_by_id(key).exec(&db_tx).await?;
            if result.rows_affected == 0 {
                return Err(EngineError::NotFound(format!("member {id}")));
            }
            tracing::info!(%id, "member deleted");
            Ok(())
        })
    }

    pub async fn member_count(&self) -> ResultEngine<u64> {
        Ok(members::Entity::find().count(&self.database).await?)
    }
}

/// Advances the `member_code` counter and returns the new code.
async fn next_member_code<C: ConnectionTrait>(db: &C) -> ResultEngine<MemberCode> {
    let current = counters::Entity::find_by_id(counters::MEMBER_CODE.to_string())
        .one(db)
        .await?;
    let next = current.as_ref().map_or(1, |row| row.value + 1);

    let active = counters::ActiveModel {
        name: ActiveValue::Set(counters::MEMBER_CODE.to_string()),
        value: ActiveValue::Set(next),
    };
    if current.is_some() {
        active.update(db).await?;
    } else {
        active.insert(db).await?;
    }

    u32::try_from(next)
        .map(MemberCode::new)
        .map_err(|_| EngineError::Validation("member code sequence exhausted".to_string()))
}
