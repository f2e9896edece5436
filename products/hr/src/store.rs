use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Persistence operations the employee service relies on.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<employees::Model>, DbErr>;

    async fn find_all(&self) -> Result<Vec<employees::Model>, DbErr>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, DbErr>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DbErr>;

    /// Insert when the identifier is unset, otherwise update the stored row.
    async fn save(&self, employee: employees::ActiveModel) -> Result<employees::Model, DbErr>;

    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeStore {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id).one(&self.db).await
    }

    async fn find_all(&self) -> Result<Vec<employees::Model>, DbErr> {
        employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DbErr> {
        let count = employees::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DbErr> {
        let count = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn save(&self, employee: employees::ActiveModel) -> Result<employees::Model, DbErr> {
        if matches!(employee.id, ActiveValue::NotSet) {
            employee.insert(&self.db).await
        } else {
            employee.update(&self.db).await
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr> {
        employees::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
