use std::sync::Arc;

use entity::employees;
use tracing::{info, instrument, warn};

use crate::{Employee, EmployeeInput, EmployeeStore, HrError, HrResult};

/// Business rules for employee records on top of an [`EmployeeStore`].
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    #[instrument(name = "hr.employee.get", skip(self))]
    pub async fn get_employee_by_id(&self, id: i64) -> HrResult<Employee> {
        info!(employee_id = id, "fetching employee");
        self.store
            .find_by_id(id)
            .await?
            .ok_or(HrError::NotFound(id))
    }

    #[instrument(name = "hr.employee.list", skip_all)]
    pub async fn get_all_employees(&self) -> HrResult<Vec<Employee>> {
        info!("fetching all employees");
        Ok(self.store.find_all().await?)
    }

    #[instrument(name = "hr.employee.create", skip_all, fields(email = %input.email))]
    pub async fn create_employee(&self, input: EmployeeInput) -> HrResult<Employee> {
        info!(name = %input.name, position = %input.position, "creating employee");
        if self.store.exists_by_email(&input.email).await? {
            warn!("rejected create: email already in use");
            return Err(HrError::Conflict(input.email));
        }

        let email = input.email.clone();
        let created = self
            .store
            .save(input.into_new_record())
            .await
            .map_err(|err| HrError::from_write(err, &email))?;
        info!(employee_id = created.id, "employee created");
        Ok(created)
    }

    #[instrument(name = "hr.employee.update", skip(self, input), fields(email = %input.email))]
    pub async fn update_employee(&self, id: i64, input: EmployeeInput) -> HrResult<Employee> {
        info!(employee_id = id, "updating employee");
        let found = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(HrError::NotFound(id))?;

        if found.email != input.email && self.store.exists_by_email(&input.email).await? {
            warn!(employee_id = id, "rejected update: email already in use");
            return Err(HrError::Conflict(input.email));
        }

        let email = input.email.clone();
        let mut record: employees::ActiveModel = found.into();
        input.apply(&mut record);
        let updated = self
            .store
            .save(record)
            .await
            .map_err(|err| HrError::from_write(err, &email))?;
        info!(employee_id = id, "employee updated");
        Ok(updated)
    }

    #[instrument(name = "hr.employee.delete", skip(self))]
    pub async fn delete_employee(&self, id: i64) -> HrResult<()> {
        info!(employee_id = id, "deleting employee");
        if !self.store.exists_by_id(id).await? {
            warn!(employee_id = id, "rejected delete: no such employee");
            return Err(HrError::NotFound(id));
        }
        self.store.delete_by_id(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeaOrmEmployeeStore;
    use async_trait::async_trait;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{Database, DbErr};

    async fn sqlite_store() -> SeaOrmEmployeeStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmEmployeeStore::new(db)
    }

    async fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(sqlite_store().await))
    }

    /// Reports every email as free so writes reach the unique index.
    struct BlindEmailStore(SeaOrmEmployeeStore);

    #[async_trait]
    impl EmployeeStore for BlindEmailStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DbErr> {
            self.0.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<Employee>, DbErr> {
            self.0.find_all().await
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, DbErr> {
            self.0.exists_by_id(id).await
        }

        async fn exists_by_email(&self, _email: &str) -> Result<bool, DbErr> {
            Ok(false)
        }

        async fn save(&self, employee: employees::ActiveModel) -> Result<Employee, DbErr> {
            self.0.save(employee).await
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), DbErr> {
            self.0.delete_by_id(id).await
        }
    }

    fn input(name: &str, email: &str) -> EmployeeInput {
        EmployeeInput::new(name, email, "Engineer", Decimal::new(8_500_050, 2))
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = service().await;
        for id in [0, 1, 99, -5] {
            assert!(matches!(
                service.get_employee_by_id(id).await,
                Err(HrError::NotFound(missing)) if missing == id
            ));
            assert!(matches!(
                service.delete_employee(id).await,
                Err(HrError::NotFound(missing)) if missing == id
            ));
        }
    }

    #[tokio::test]
    async fn delete_on_empty_store_names_the_id() {
        let service = service().await;
        let err = service.delete_employee(99).await.unwrap_err();
        assert_eq!(err.to_string(), "Employee with id 99 not found");
    }

    #[tokio::test]
    async fn create_then_get_round_trips_business_fields() {
        let service = service().await;
        let submitted = EmployeeInput::new(
            "Ada Lovelace",
            "ada@example.test",
            "Analyst",
            Decimal::new(9_100_025, 2),
        );
        let created = service.create_employee(submitted.clone()).await.unwrap();
        let fetched = service.get_employee_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, submitted.name);
        assert_eq!(fetched.email, submitted.email);
        assert_eq!(fetched.position, submitted.position);
        assert_eq!(fetched.salary, submitted.salary);
    }

    #[tokio::test]
    async fn duplicate_email_on_create_conflicts_without_inserting() {
        let service = service().await;
        service.create_employee(input("Ada", "a@x.com")).await.unwrap();

        let err = service
            .create_employee(input("Someone Else", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(&err, HrError::Conflict(email) if email == "a@x.com"));
        assert!(err.to_string().contains("a@x.com"));
        assert_eq!(service.get_all_employees().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_another_records_email_conflicts() {
        let service = service().await;
        let first = service.create_employee(input("Ada", "a@x.com")).await.unwrap();
        let second = service.create_employee(input("Grace", "b@x.com")).await.unwrap();

        let err = service
            .update_employee(second.id, input("Grace", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Conflict(email) if email == "a@x.com"));

        let untouched = service.get_employee_by_id(second.id).await.unwrap();
        assert_eq!(untouched.email, "b@x.com");

        let renamed = service
            .update_employee(first.id, input("New", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(renamed.id, first.id);
        assert_eq!(renamed.name, "New");
    }

    #[tokio::test]
    async fn update_replaces_every_field_and_keeps_id() {
        let service = service().await;
        let created = service.create_employee(input("Ada", "ada@example.test")).await.unwrap();

        let replacement = EmployeeInput::new(
            "Ada King",
            "countess@example.test",
            "Director",
            Decimal::new(12_000_075, 2),
        );
        let updated = service
            .update_employee(created.id, replacement.clone())
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, replacement.name);
        assert_eq!(updated.email, replacement.email);
        assert_eq!(updated.position, replacement.position);
        assert_eq!(updated.salary, replacement.salary);
        assert_eq!(service.get_employee_by_id(created.id).await.unwrap(), updated);
        assert!(
            service
                .create_employee(input("Reuse", "ada@example.test"))
                .await
                .is_ok(),
            "old email is free again after the update"
        );
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let service = service().await;
        let err = service
            .update_employee(42, input("Ada", "ada@example.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::NotFound(42)));
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let service = service().await;
        let keep = service.create_employee(input("Ada", "a@x.com")).await.unwrap();
        let gone = service.create_employee(input("Grace", "b@x.com")).await.unwrap();

        service.delete_employee(gone.id).await.unwrap();
        let remaining = service.get_all_employees().await.unwrap();
        assert_eq!(remaining, vec![keep]);
        assert!(matches!(
            service.get_employee_by_id(gone.id).await,
            Err(HrError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unique_index_violation_on_create_is_a_conflict() {
        let service = EmployeeService::new(Arc::new(BlindEmailStore(sqlite_store().await)));
        service.create_employee(input("Ada", "a@x.com")).await.unwrap();

        let err = service
            .create_employee(input("Racer", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(&err, HrError::Conflict(email) if email == "a@x.com"), "{err:?}");
        assert_eq!(service.get_all_employees().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unique_index_violation_on_update_is_a_conflict() {
        let service = EmployeeService::new(Arc::new(BlindEmailStore(sqlite_store().await)));
        service.create_employee(input("Ada", "a@x.com")).await.unwrap();
        let second = service.create_employee(input("Grace", "b@x.com")).await.unwrap();

        let err = service
            .update_employee(second.id, input("Grace", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(&err, HrError::Conflict(email) if email == "a@x.com"), "{err:?}");
        let untouched = service.get_employee_by_id(second.id).await.unwrap();
        assert_eq!(untouched.email, "b@x.com");
    }
}
