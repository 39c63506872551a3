// src/services/supplier_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format},
    db::{AuditRepository, SupplierRepository},
    models::{
        activity::AuditAction,
        suppliers::{Supplier, SupplierFilter, SupplierPayload},
    },
};

#[derive(Clone)]
pub struct SupplierService {
    repo: SupplierRepository,
    audit: AuditRepository,
    pool: PgPool,
}

fn normalize_supplier(payload: &mut SupplierPayload) -> Result<(), AppError> {
    payload.document_number = match payload.document_number.as_deref() {
        Some(doc) => Some(format::format_document(doc)?),
        None => None,
    };
    payload.phone = format::normalize_phone(payload.phone.as_deref());
    payload.email = payload.email.as_ref().map(|e| e.trim().to_lowercase());
    Ok(())
}

impl SupplierService {
    pub fn new(repo: SupplierRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn create(&self, user_id: Uuid, mut payload: SupplierPayload) -> Result<Supplier, AppError> {
        normalize_supplier(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let supplier = self.repo.create(&mut *tx, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "suppliers", AuditAction::Create, Some(supplier.id),
                &format!("Fornecedor cadastrado: {}", supplier.name))
            .await?;
        tx.commit().await?;
        Ok(supplier)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, mut payload: SupplierPayload) -> Result<Supplier, AppError> {
        normalize_supplier(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let supplier = self.repo.update(&mut *tx, id, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "suppliers", AuditAction::Update, Some(id),
                &format!("Fornecedor atualizado: {}", supplier.name))
            .await?;
        tx.commit().await?;
        Ok(supplier)
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, AppError> {
        self.repo.find(id).await
    }

    pub async fn list(&self, filter: &SupplierFilter) -> Result<Vec<Supplier>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let supplier = self.repo.delete(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "suppliers", AuditAction::Delete, Some(id),
                &format!("Fornecedor excluído: {}", supplier.name))
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
