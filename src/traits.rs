use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, IdenStatic, Iterable, Select};

use crate::errors::ApiError;
use crate::filtering::{FieldPolicy, FilterEngine, RawFilters, sea::value_type_of};

/// An entity whose listing endpoint accepts request filters.
///
/// Implementors declare which columns are filterable and which of those get
/// boolean, date or substring semantics; everything else on the allow-list is
/// matched by equality, or membership for lists.
#[async_trait]
pub trait FilterableResource: EntityTrait + Sync {
    const RESOURCE_NAME_PLURAL: &'static str;

    /// The allow-list of filterable columns.
    #[must_use]
    fn filterable_columns() -> Vec<&'static str>;

    /// Columns filtered by truthiness. Default is empty.
    #[must_use]
    fn bool_filterable_columns() -> Vec<&'static str> {
        vec![]
    }

    /// Columns filtered with date expressions. Default is empty.
    #[must_use]
    fn date_filterable_columns() -> Vec<&'static str> {
        vec![]
    }

    /// Columns filtered with `LIKE '%value%'`. Default is empty.
    #[must_use]
    fn like_filterable_columns() -> Vec<&'static str> {
        vec![]
    }

    /// Policy built from the column lists, with every column's storage type
    /// taken from the entity definition.
    #[must_use]
    fn field_policy() -> FieldPolicy {
        let types = Self::Column::iter().filter_map(|column| {
            value_type_of(column.def().get_column_type()).map(|ty| (column.as_str().to_string(), ty))
        });
        FieldPolicy::builder(Self::default().table_name())
            .filterable(Self::filterable_columns())
            .bool_fields(Self::bool_filterable_columns())
            .date_fields(Self::date_filterable_columns())
            .like_fields(Self::like_filterable_columns())
            .value_types(types)
            .build()
    }

    /// Base query restricted to the rows owned by `user_id`.
    fn owned_by(user_id: i64) -> Select<Self>;

    /// The fixed listing order.
    fn ordered(select: Select<Self>) -> Select<Self>;

    /// Lists the caller's rows matching `filters`.
    ///
    /// # Errors
    ///
    /// Malformed date filters become `400 Bad Request`; database failures
    /// become a sanitized `500`.
    async fn list_filtered(
        db: &DatabaseConnection,
        user_id: i64,
        filters: &RawFilters,
    ) -> Result<Vec<Self::Model>, ApiError> {
        let engine = FilterEngine::new(Self::field_policy());
        let select = engine.apply(Self::owned_by(user_id), filters)?;
        let models = Self::ordered(select).all(db).await?;
        tracing::debug!(
            resource = Self::RESOURCE_NAME_PLURAL,
            user_id,
            count = models.len(),
            "Listed filtered rows"
        );
        Ok(models)
    }
}
