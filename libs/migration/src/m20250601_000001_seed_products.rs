use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO products (id, name, description, price, stock, created_date, is_active)
            VALUES
                (1, 'Laptop', 'High-performance laptop', 25000.00, 10, NOW(), true),
                (2, 'Mouse', 'Wireless optical mouse', 500.00, 50, NOW(), true),
                (3, 'Keyboard', 'Mechanical keyboard', 1200.00, 30, NOW(), true)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .await?;

        // Explicit ids leave the serial behind; the next insert would collide with id 1
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('products', 'id'), (SELECT MAX(id) FROM products))",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM products WHERE id IN (1, 2, 3)")
            .await?;

        Ok(())
    }
}
