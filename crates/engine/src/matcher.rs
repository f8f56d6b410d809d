//! Payment reconciliation.
//!
//! Attributes an incoming payment to a member by name and turns confirmed
//! payments into entries. Everything here is pure: the caller supplies the
//! member list and persists the results.
//!
//! # Matching policy
//!
//! A member is a candidate when its full name is a case-insensitive
//! substring of the payer name, or the other way around. This tolerates
//! middle names and partially captured names, at the cost of false
//! positives ("Ana" is contained in "Mariana Costa"). The payment is linked
//! to the **first** candidate in the order the members were given; it is
//! not a best-match search. Use [`candidates`] to see every member that
//! would qualify.

use uuid::Uuid;

use crate::{
    Entry, EntryKind, Member, PaymentNotification, ResultEngine, Transaction, TransactionStatus,
    util::fold_case,
};

/// Description marker for entries whose transaction has no member.
pub const UNLINKED: &str = "unlinked";

/// Builds a pending transaction from `notification` and links it to the
/// first matching member, if any.
#[must_use]
pub fn ingest(notification: PaymentNotification, members: &[Member]) -> Transaction {
    let payer_name = notification.payer_name();
    let matched = candidates(&payer_name, members).into_iter().next();

    Transaction {
        id: Uuid::new_v4(),
        external_id: notification.external_id,
        amount: notification.amount,
        occurred_at: notification.occurred_at,
        payer_email: notification.payer_email,
        provider_status: notification.status,
        payment_method: notification.payment_method,
        description: notification.description,
        status: TransactionStatus::Pending,
        kind: None,
        linked: matched.is_some(),
        member_id: matched.map(|m| m.id),
        member_code: matched.map(|m| m.code),
        payer_name,
    }
}

/// Every member whose name contains, or is contained in, `payer_name`,
/// in input order. A blank payer name matches nobody.
#[must_use]
pub fn candidates<'a>(payer_name: &str, members: &'a [Member]) -> Vec<&'a Member> {
    if payer_name.trim().is_empty() {
        return Vec::new();
    }
    let payer = fold_case(payer_name);
    members
        .iter()
        .filter(|member| {
            let name = fold_case(&member.full_name);
            payer.contains(&name) || name.contains(&payer)
        })
        .collect()
}

/// Marks `tx` confirmed with `kind` and returns the entry it produces.
///
/// Not idempotent: calling it again on an already confirmed transaction
/// yields another entry.
pub fn confirm(tx: &mut Transaction, kind: &str) -> ResultEngine<Entry> {
    let kind = EntryKind::parse(kind)?;
    let member_label = tx
        .member_code
        .map_or_else(|| UNLINKED.to_string(), |code| code.to_string());

    tx.status = TransactionStatus::Confirmed;
    tx.kind = Some(kind.clone());

    Ok(Entry {
        id: Uuid::new_v4(),
        occurred_at: tx.occurred_at,
        amount: tx.amount,
        description: format!("{} - {member_label}", kind.title()),
        kind,
        member_id: tx.member_id,
        transaction_id: tx.id,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{EngineError, MemberCode, MoneyCents};

    fn member(seq: u32, name: &str) -> Member {
        Member::new(MemberCode::new(seq), name, Utc::now()).unwrap()
    }

    fn payment(first: &str, last: &str) -> PaymentNotification {
        PaymentNotification::new(
            "123456",
            MoneyCents::new(10_000),
            Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap(),
        )
        .payer(first, last)
        .payer_email("maria@example.com")
        .status("approved")
        .payment_method("pix")
        .description("Dízimo março")
    }

    #[test]
    fn links_when_member_name_is_contained_in_payer_name() {
        let members = vec![member(1, "João Souza"), member(2, "Maria Silva")];
        let tx = ingest(payment("Maria Silva", "Santos"), &members);

        assert!(tx.linked);
        assert_eq!(tx.member_id, Some(members[1].id));
        assert_eq!(tx.member_code, Some(MemberCode::new(2)));
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.kind, None);
    }

    #[test]
    fn links_when_payer_name_is_contained_in_member_name() {
        let members = vec![member(1, "Maria Silva Santos")];
        let tx = ingest(payment("maria", "silva"), &members);
        assert_eq!(tx.member_code, Some(MemberCode::FIRST));
    }

    #[test]
    fn comparison_ignores_case() {
        let members = vec![member(3, "MARIA SILVA")];
        let tx = ingest(payment("maria", "silva"), &members);
        assert!(tx.linked);
    }

    #[test]
    fn first_candidate_wins_not_the_best_one() {
        let members = vec![member(1, "Mariana Costa"), member(2, "Ana")];
        let tx = ingest(payment("Ana", ""), &members);
        // "ana " sits inside "mariana costa": a known false positive.
        assert_eq!(tx.member_code, Some(MemberCode::FIRST));

        let members = vec![member(1, "Ana Maria Silva"), member(2, "Ana Maria")];
        let tx = ingest(payment("Ana", "Maria"), &members);
        assert_eq!(tx.member_code, Some(MemberCode::FIRST));
    }

    #[test]
    fn candidates_returns_every_match_in_order() {
        let members = vec![
            member(1, "Mariana Costa"),
            member(2, "Pedro Lima"),
            member(3, "Ana Maria Silva"),
        ];
        let found = candidates("ana", &members);
        let codes: Vec<_> = found.iter().map(|m| m.code.seq()).collect();
        assert_eq!(codes, vec![1, 3]);
    }

    #[test]
    fn blank_payer_name_never_links() {
        let members = vec![member(1, "Maria Silva")];
        let tx = ingest(payment("", ""), &members);
        assert!(!tx.linked);
        assert_eq!(tx.member_id, None);
        assert_eq!(tx.payer_name, " ");

        let tx = ingest(payment("  ", "\t"), &members);
        assert!(!tx.linked);
    }

    #[test]
    fn no_match_leaves_transaction_unlinked() {
        let members = vec![member(1, "Pedro Lima")];
        let tx = ingest(payment("Maria", "Silva"), &members);
        assert!(!tx.linked);
        assert_eq!(tx.member_code, None);
    }

    #[test]
    fn notification_fields_are_copied_verbatim() {
        let tx = ingest(payment("Maria", "Silva"), &[]);
        assert_eq!(tx.external_id, "123456");
        assert_eq!(tx.amount, MoneyCents::new(10_000));
        assert_eq!(tx.payer_name, "Maria Silva");
        assert_eq!(tx.payer_email.as_deref(), Some("maria@example.com"));
        assert_eq!(tx.provider_status.as_deref(), Some("approved"));
        assert_eq!(tx.payment_method.as_deref(), Some("pix"));
        assert_eq!(tx.description.as_deref(), Some("Dízimo março"));
    }

    #[test]
    fn confirm_produces_entry_with_member_code() {
        let members = vec![member(7, "Maria Silva")];
        let mut tx = ingest(payment("Maria", "Silva"), &members);

        let entry = confirm(&mut tx, "tithe").unwrap();

        assert_eq!(tx.status, TransactionStatus::Confirmed);
        assert_eq!(tx.kind, Some(EntryKind::Tithe));
        assert_eq!(entry.kind, EntryKind::Tithe);
        assert_eq!(entry.amount, tx.amount);
        assert_eq!(entry.occurred_at, tx.occurred_at);
        assert_eq!(entry.description, "Tithe - D007");
        assert_eq!(entry.member_id, Some(members[0].id));
        assert_eq!(entry.transaction_id, tx.id);
    }

    #[test]
    fn confirm_unlinked_uses_marker() {
        let mut tx = ingest(payment("Visitor", ""), &[]);
        let entry = confirm(&mut tx, "offering").unwrap();
        assert_eq!(entry.description, "Offering - unlinked");
        assert_eq!(entry.member_id, None);
    }

    #[test]
    fn confirm_accepts_free_form_kind_but_not_empty() {
        let mut tx = ingest(payment("Maria", "Silva"), &[]);
        let entry = confirm(&mut tx, "missions").unwrap();
        assert_eq!(entry.kind, EntryKind::Other("missions".to_string()));
        assert_eq!(entry.description, "Missions - unlinked");

        let err = confirm(&mut tx, " ").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn confirming_twice_yields_two_entries() {
        let mut tx = ingest(payment("Maria", "Silva"), &[]);
        let first = confirm(&mut tx, "tithe").unwrap();
        let second = confirm(&mut tx, "offering").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.transaction_id, second.transaction_id);
        assert_eq!(tx.kind, Some(EntryKind::Offering));
    }
}
