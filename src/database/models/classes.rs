use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, Repository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub level: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub level: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct NewSection {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub code: Option<String>,
}

impl Entity for Class {
    const TABLE: &'static str = "classes";
}

impl Entity for Section {
    const TABLE: &'static str = "sections";
}

impl Entity for Subject {
    const TABLE: &'static str = "subjects";
}

impl Repository<Class> {
    pub async fn create(&self, new: &NewClass) -> Result<Class, DatabaseError> {
        let row = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (name, level) VALUES ($1, $2) RETURNING *",
        )
        .bind(&new.name)
        .bind(new.level)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }
}

impl Repository<Section> {
    pub async fn create(&self, class_id: Uuid, new: &NewSection) -> Result<Section, DatabaseError> {
        let row = sqlx::query_as::<_, Section>(
            "INSERT INTO sections (class_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(class_id)
        .bind(&new.name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn for_class(&self, class_id: Uuid) -> Result<Vec<Section>, DatabaseError> {
        self.find_where("class_id", class_id).await
    }
}

impl Repository<Subject> {
    pub async fn create(&self, class_id: Uuid, new: &NewSubject) -> Result<Subject, DatabaseError> {
        let row = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (class_id, name, code) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(class_id)
        .bind(&new.name)
        .bind(new.code.as_deref())
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn for_class(&self, class_id: Uuid) -> Result<Vec<Subject>, DatabaseError> {
        self.find_where("class_id", class_id).await
    }
}
