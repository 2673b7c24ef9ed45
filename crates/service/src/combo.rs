//! Combo management. Mirrors the order workflow; a combo additionally
//! carries an operator-set `price` next to its computed `total_price`.

use async_trait::async_trait;
use model::pricing::{validate_new_lines, validate_quantities};
use model::{Combo, ComboDetails, CreateComboRequest, ListRequest, Page, UpdateComboRequest};
use repository::ComboRepository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{validation, ServiceError};

#[async_trait]
pub trait ComboService: Send + Sync {
    async fn create_combo(&self, req: &CreateComboRequest) -> Result<ComboDetails, ServiceError>;
    async fn get_combo(&self, id: Uuid) -> Result<ComboDetails, ServiceError>;
    async fn list_combos(&self, req: &ListRequest) -> Result<Page<Combo>, ServiceError>;
    async fn update_combo(
        &self,
        id: Uuid,
        req: &UpdateComboRequest,
    ) -> Result<ComboDetails, ServiceError>;
    /// Removes the combo and its items permanently.
    async fn delete_combo(&self, id: Uuid) -> Result<(), ServiceError>;
}

pub struct ComboServiceImpl<R> {
    combos_repo: R,
}

impl<R> ComboServiceImpl<R>
where
    R: ComboRepository + Send + Sync,
{
    pub fn new(combos_repo: R) -> Self {
        Self { combos_repo }
    }
}

#[async_trait]
impl<R> ComboService for ComboServiceImpl<R>
where
    R: ComboRepository + Send + Sync,
{
    #[instrument(skip(self, req), fields(items = req.items.len()))]
    async fn create_combo(&self, req: &CreateComboRequest) -> Result<ComboDetails, ServiceError> {
        validation::not_blank("name", &req.combo.name)?;
        validation::not_negative("price", req.combo.price)?;
        validate_new_lines(&req.items)?;

        let details = self.combos_repo.create(&req.combo, &req.items).await?;
        info!(combo_id = %details.combo.id, total = %details.combo.total_price, "combo created");
        Ok(details)
    }

    #[instrument(skip(self))]
    async fn get_combo(&self, id: Uuid) -> Result<ComboDetails, ServiceError> {
        Ok(self.combos_repo.get_by_id(id).await?)
    }

    #[instrument(skip(self, req))]
    async fn list_combos(&self, req: &ListRequest) -> Result<Page<Combo>, ServiceError> {
        Ok(self.combos_repo.list(req).await?)
    }

    #[instrument(skip(self, req), fields(items = req.items.len()))]
    async fn update_combo(
        &self,
        id: Uuid,
        req: &UpdateComboRequest,
    ) -> Result<ComboDetails, ServiceError> {
        validation::not_blank("name", &req.name)?;
        validation::not_negative("price", req.price)?;
        let lines: Vec<_> = req.items.iter().map(|item| item.line()).collect();
        validate_quantities(&lines)?;

        let details = self.combos_repo.update(id, req).await?;
        info!(combo_id = %id, total = %details.combo.total_price, "combo updated");
        Ok(details)
    }

    #[instrument(skip(self))]
    async fn delete_combo(&self, id: Uuid) -> Result<(), ServiceError> {
        self.combos_repo.delete(id).await?;
        info!(combo_id = %id, "combo deleted");
        Ok(())
    }
}
