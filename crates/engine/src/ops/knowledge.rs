use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{ResultEngine, item_health, outcomes::health_label, util::normalize_key};

use super::{Engine, with_tx};

impl Engine {
    /// Learned healthiness of an item, `None` when never taught.
    pub async fn lookup_item_health(&self, item: &str) -> ResultEngine<Option<bool>> {
        let key = normalize_key(item, "item")?;
        Self::find_item_health(&self.database, &key).await
    }

    /// Teach the healthiness of an item, overwriting any earlier fact.
    pub async fn learn_item_health(&self, item: &str, is_healthy: bool) -> ResultEngine<()> {
        let key = normalize_key(item, "item")?;
        with_tx!(self, |db_tx| {
            let active = item_health::ActiveModel {
                item_norm: ActiveValue::Set(key.clone()),
                is_healthy: ActiveValue::Set(is_healthy),
            };
            item_health::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(item_health::Column::ItemNorm)
                        .update_column(item_health::Column::IsHealthy)
                        .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            Ok(())
        })?;
        tracing::info!("learned that '{key}' is {}", health_label(is_healthy));
        Ok(())
    }

    pub(super) async fn find_item_health<C: ConnectionTrait>(
        db: &C,
        key: &str,
    ) -> ResultEngine<Option<bool>> {
        let model = item_health::Entity::find_by_id(key.to_string())
            .one(db)
            .await?;
        Ok(model.map(|fact| fact.is_healthy))
    }
}
