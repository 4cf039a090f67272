use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, TransactionTrait,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, Product, ProductFilter, UpdateProduct},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique violations on `name` surface as `DuplicateName`
fn map_write_error(err: DbErr, name: &str) -> ProductError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateName(name.to_string()),
        _ => ProductError::Store(err.to_string()),
    }
}

/// `%term%` with LIKE wildcards in `term` matched literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// The active row `id`, locked until the surrounding transaction ends
fn locked_active(id: i32) -> Select<entity::Entity> {
    entity::Entity::find_by_id(id)
        .filter(entity::Column::IsActive.eq(true))
        .lock_exclusive()
}

fn scan_query(filter: &ProductFilter) -> Select<entity::Entity> {
    let mut query = entity::Entity::find();

    if let Some(active) = filter.active {
        query = query.filter(entity::Column::IsActive.eq(active));
    }

    if let Some(term) = filter.contains.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            Condition::any()
                .add(entity::Column::Name.like(pattern.as_str()))
                .add(entity::Column::Description.like(pattern.as_str())),
        );
    }

    query
        .order_by_asc(entity::Column::Name)
        .order_by_asc(entity::Column::Id)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, product: NewProduct) -> ProductResult<Product> {
        let name = product.name.clone();
        let active_model: entity::ActiveModel = product.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &name))?;

        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, id: i32, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let txn = self.db.begin().await?;

        // Dropping `txn` without commit rolls back and releases the lock
        let Some(model) = locked_active(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut product: Product = model.into();
        product.apply_update(update);

        let name = product.name.clone();
        let active_model: entity::ActiveModel = product.into();
        let model = active_model.update(&txn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ProductError::NotFound(id),
            e => map_write_error(e, &name),
        })?;

        txn.commit().await?;
        Ok(Some(model.into()))
    }

    async fn deactivate(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::IsActive, Expr::value(false))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::IsActive.eq(true))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        // Rows are never removed, so an existing row here is already inactive
        let exists = entity::Entity::find_by_id(id).one(&self.db).await?.is_some();
        Ok(exists)
    }

    async fn scan(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let models = scan_query(&filter).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> ProductResult<()> {
        database::postgres::check_health(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn model(id: i32, name: &str, is_active: bool) -> entity::Model {
        entity::Model {
            id,
            name: name.to_string(),
            description: None,
            price: Decimal::new(500_00, 2),
            stock: 50,
            created_date: Utc::now().into(),
            is_active,
        }
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("o"), "%o%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[tokio::test]
    async fn test_get_by_id_returns_inactive_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(2, "Mouse", false)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(product.name, "Mouse");
        assert!(!product.is_active);
    }

    #[test]
    fn test_update_locks_the_active_row() {
        let stmt = locked_active(2).build(DatabaseBackend::Postgres);

        assert!(stmt.sql.contains(r#""products"."is_active" = $2"#));
        assert!(stmt.sql.ends_with("FOR UPDATE"));
    }

    #[tokio::test]
    async fn test_update_of_inactive_or_missing_row_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let update = UpdateProduct {
            stock: Some(1),
            ..Default::default()
        };
        assert!(repo.update(2, update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deactivate_reports_existing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .append_query_results([vec![model(2, "Mouse", false)], vec![]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.deactivate(2).await.unwrap());
        assert!(repo.deactivate(2).await.unwrap());
        assert!(!repo.deactivate(99).await.unwrap());
    }

    #[test]
    fn test_scan_query_filters_and_orders_in_sql() {
        let stmt = scan_query(&ProductFilter::active().containing("o")).build(DatabaseBackend::Postgres);

        assert!(stmt.sql.contains(r#""products"."is_active" = $1"#));
        assert!(stmt.sql.contains(r#""products"."name" LIKE $2 OR "products"."description" LIKE $3"#));
        assert!(stmt.sql.ends_with(r#"ORDER BY "products"."name" ASC, "products"."id" ASC"#));
    }

    #[test]
    fn test_scan_query_without_filter_has_no_where_clause() {
        let stmt = scan_query(&ProductFilter::default()).build(DatabaseBackend::Postgres);
        assert!(!stmt.sql.contains("WHERE"));
    }

    #[tokio::test]
    async fn test_database_errors_map_to_store_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.get_by_name("Mouse").await;
        assert!(matches!(result, Err(ProductError::Store(msg)) if msg.contains("connection reset")));
    }
}
