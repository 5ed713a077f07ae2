use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{
    EngineError, Party, PartyId, PartyOutcome, ResultEngine, parties,
    util::{is_owner_alias, normalize_display, normalize_key, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Resolve a name to an existing party.
    ///
    /// Owner aliases ("me", "myself", ...) resolve through the owner's stored
    /// name, so they fail with `PartyNotFound` until the owner exists.
    pub async fn resolve(&self, name: &str) -> ResultEngine<PartyId> {
        self.require_party(&self.database, name)
            .await
            .map(|party| party.id)
    }

    /// Resolve a name, creating the party on first use.
    ///
    /// Concurrent callers racing on the same new name are reconciled by the
    /// unique `name_norm` index: the loser's insert is ignored and it reads
    /// back the winner's row.
    pub async fn resolve_or_create(&self, name: &str) -> ResultEngine<PartyId> {
        let display = normalize_display(name, "party")?;
        let key = normalize_key(name, "party")?;
        with_tx!(self, |db_tx| {
            if is_owner_alias(&key) {
                self.require_party(&db_tx, &display).await.map(|p| p.id)
            } else {
                Self::insert_party_if_absent(&db_tx, &display, &key, None)
                    .await
                    .map(|(party, _)| party.id)
            }
        })
    }

    /// Registers a party explicitly.
    ///
    /// Registering an owner alias registers the owner under its configured
    /// name. An existing name is reported, not treated as an error.
    pub async fn add_party(&self, name: &str, contact: Option<&str>) -> ResultEngine<PartyOutcome> {
        let key = normalize_key(name, "party")?;
        let (display, key) = if is_owner_alias(&key) {
            (
                self.owner_name.clone(),
                normalize_key(&self.owner_name, "owner")?,
            )
        } else {
            (normalize_display(name, "party")?, key)
        };
        let contact = normalize_optional_text(contact);
        let (party, created) = with_tx!(self, |db_tx| {
            Self::insert_party_if_absent(&db_tx, &display, &key, contact).await
        })?;
        if created {
            tracing::info!("registered party {} ({})", party.name, party.id);
            Ok(PartyOutcome::Added(party))
        } else {
            Ok(PartyOutcome::AlreadyExists(party))
        }
    }

    /// Creates the owner party if it does not exist yet.
    pub async fn ensure_owner(&self) -> ResultEngine<PartyId> {
        let key = normalize_key(&self.owner_name, "owner")?;
        let (party, created) = with_tx!(self, |db_tx| {
            Self::insert_party_if_absent(&db_tx, &self.owner_name, &key, None).await
        })?;
        if created {
            tracing::info!("created ledger owner '{}'", party.name);
        }
        Ok(party.id)
    }

    /// All parties in registration order.
    pub async fn list_parties(&self) -> ResultEngine<Vec<Party>> {
        let models = parties::Entity::find()
            .order_by_asc(parties::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Party::from).collect())
    }

    /// Return a party by id.
    pub async fn party(&self, id: PartyId) -> ResultEngine<Party> {
        parties::Entity::find_by_id(id.0)
            .one(&self.database)
            .await?
            .map(Party::from)
            .ok_or_else(|| EngineError::PartyNotFound(format!("party {id}")))
    }

    /// Look up a party by name, redirecting owner aliases to the owner.
    pub(super) async fn find_party<C: ConnectionTrait>(
        &self,
        db: &C,
        name: &str,
    ) -> ResultEngine<Option<Party>> {
        let key = normalize_key(name, "party")?;
        let key = if is_owner_alias(&key) {
            normalize_key(&self.owner_name, "owner")?
        } else {
            key
        };
        let model = parties::Entity::find()
            .filter(parties::Column::NameNorm.eq(key))
            .one(db)
            .await?;
        Ok(model.map(Party::from))
    }

    pub(super) async fn require_party<C: ConnectionTrait>(
        &self,
        db: &C,
        name: &str,
    ) -> ResultEngine<Party> {
        self.find_party(db, name)
            .await?
            .ok_or_else(|| EngineError::PartyNotFound(name.trim().to_string()))
    }

    /// Insert a party unless its key is taken; returns the stored row and
    /// whether this call created it.
    async fn insert_party_if_absent<C: ConnectionTrait>(
        db: &C,
        display: &str,
        key: &str,
        contact: Option<String>,
    ) -> ResultEngine<(Party, bool)> {
        let active = parties::ActiveModel {
            name: ActiveValue::Set(display.to_string()),
            name_norm: ActiveValue::Set(key.to_string()),
            contact: ActiveValue::Set(contact),
            ..Default::default()
        };
        let inserted = parties::Entity::insert(active)
            .on_conflict(
                OnConflict::column(parties::Column::NameNorm)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let model = parties::Entity::find()
            .filter(parties::Column::NameNorm.eq(key))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::StorageFailure(DbErr::RecordNotFound(format!("party '{display}'")))
            })?;
        if inserted > 0 {
            tracing::debug!("created party '{}' with id {}", model.name, model.id);
        }
        Ok((Party::from(model), inserted > 0))
    }
}
