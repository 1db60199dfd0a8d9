use sqlx::PgPool;
use storage::{
    dto::house::{CreateHouseRequest, UpdateHouseRequest},
    error::Result,
    models::House,
    repository::house::HouseRepository,
};
use uuid::Uuid;

pub async fn list_houses(pool: &PgPool) -> Result<Vec<House>> {
    let repo = HouseRepository::new(pool);
    repo.list().await
}

pub async fn get_house(pool: &PgPool, id: Uuid) -> Result<House> {
    let repo = HouseRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_house(pool: &PgPool, request: &CreateHouseRequest) -> Result<House> {
    let repo = HouseRepository::new(pool);
    repo.create(request).await
}

pub async fn update_house(pool: &PgPool, id: Uuid, request: &UpdateHouseRequest) -> Result<House> {
    let repo = HouseRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_house(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = HouseRepository::new(pool);
    repo.delete(id).await
}
