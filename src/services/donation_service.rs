// src/services/donation_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format},
    db::{AuditRepository, DonationRepository},
    models::{
        activity::AuditAction,
        donations::{Donation, DonationFilter, DonationKind, DonationPayload},
    },
};

#[derive(Clone)]
pub struct DonationService {
    repo: DonationRepository,
    audit: AuditRepository,
    pool: PgPool,
}

// Doação em dinheiro não guarda itens e vice-versa
fn normalize_donation(payload: &mut DonationPayload) -> Result<(), AppError> {
    payload.donor_document = match payload.donor_document.as_deref() {
        Some(doc) => Some(format::format_document(doc)?),
        None => None,
    };
    match payload.kind {
        Some(DonationKind::Money) => {
            payload.item_description = None;
            payload.quantity = None;
        }
        Some(DonationKind::Item) => payload.amount = None,
        None => {}
    }
    Ok(())
}

fn describe(donation: &Donation) -> String {
    match (donation.kind, donation.amount, donation.item_description.as_deref()) {
        (DonationKind::Money, Some(amount), _) => {
            format!("Doação de {} ({})", donation.donor_name, format::format_brl(amount))
        }
        (_, _, Some(items)) => format!("Doação de {} ({})", donation.donor_name, items),
        _ => format!("Doação de {}", donation.donor_name),
    }
}

impl DonationService {
    pub fn new(repo: DonationRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn create(&self, user_id: Uuid, mut payload: DonationPayload) -> Result<Donation, AppError> {
        normalize_donation(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let donation = self.repo.create(&mut *tx, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "donations", AuditAction::Create, Some(donation.id), &describe(&donation))
            .await?;
        tx.commit().await?;
        Ok(donation)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, mut payload: DonationPayload) -> Result<Donation, AppError> {
        normalize_donation(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let donation = self.repo.update(&mut *tx, id, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "donations", AuditAction::Update, Some(id),
                &format!("Atualizada: {}", describe(&donation)))
            .await?;
        tx.commit().await?;
        Ok(donation)
    }

    pub async fn get(&self, id: Uuid) -> Result<Donation, AppError> {
        self.repo.find(id).await
    }

    pub async fn list(&self, filter: &DonationFilter) -> Result<Vec<Donation>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let donation = self.repo.delete(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "donations", AuditAction::Delete, Some(id),
                &format!("Excluída: {}", describe(&donation)))
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_donation_drops_item_fields() {
        let mut payload: DonationPayload = serde_json::from_value(serde_json::json!({
            "donorName": "Supermercado Bom Preço",
            "donorDocument": "11222333000181",
            "kind": "MONEY",
            "amount": "500,00",
            "itemDescription": "sobra do formulário",
            "quantity": 3,
            "donationDate": "02/03/2025"
        }))
        .unwrap();

        normalize_donation(&mut payload).unwrap();
        assert_eq!(payload.donor_document.as_deref(), Some("11.222.333/0001-81"));
        assert_eq!(payload.item_description, None);
        assert_eq!(payload.quantity, None);
        assert!(payload.validate_consistency().is_ok());
    }
}
