use async_trait::async_trait;
use rolodex_model::{Contact, Page, PageRequest, Sort};
use sqlx::PgPool;
use tracing::info;

use crate::database::ports::contacts::ContactRepository;
use crate::error::{ContactError, Result};

const CONTACT_COLUMNS: &str =
    "id, name, email, title, phone, address, status, photo_url";

#[derive(Clone, Debug)]
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Only known columns may be interpolated into `ORDER BY`.
fn order_by(sort: &Sort) -> Result<String> {
    let column = match sort.property {
        "name" => "name",
        "email" => "email",
        "id" => "id",
        other => {
            return Err(ContactError::Validation(format!(
                "cannot sort contacts by {other}"
            )));
        }
    };

    if column == "id" {
        Ok(format!("id {}", sort.direction.as_sql()))
    } else {
        Ok(format!("{column} {}, id ASC", sort.direction.as_sql()))
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>> {
        let query =
            format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(contact)
    }

    async fn find_all_sorted(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Contact>> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts \
             ORDER BY {} LIMIT $1 OFFSET $2",
            order_by(&request.sort)?
        );

        let mut tx = self.pool().begin().await?;

        let content = sqlx::query_as::<_, Contact>(&query)
            .bind(to_i64(request.size))
            .bind(to_i64(request.offset()))
            .fetch_all(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Page::new(content, request, total.max(0) as u64))
    }

    async fn save(&self, contact: Contact) -> Result<Contact> {
        let query = format!(
            r#"
            INSERT INTO contacts ({CONTACT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                title = EXCLUDED.title,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                status = EXCLUDED.status,
                photo_url = EXCLUDED.photo_url
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let mut tx = self.pool().begin().await?;

        let saved = sqlx::query_as::<_, Contact>(&query)
            .bind(&contact.id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.title)
            .bind(&contact.phone)
            .bind(&contact.address)
            .bind(&contact.status)
            .bind(&contact.photo_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted contact row {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_model::SortDirection;

    #[test]
    fn order_by_adds_id_tiebreaker() {
        assert_eq!(
            order_by(&Sort::ascending("name")).unwrap(),
            "name ASC, id ASC"
        );
        assert_eq!(
            order_by(&Sort {
                property: "id",
                direction: SortDirection::Desc,
            })
            .unwrap(),
            "id DESC"
        );
    }

    #[test]
    fn order_by_rejects_unknown_columns() {
        let sort = Sort::ascending("name; DROP TABLE contacts");
        assert!(matches!(order_by(&sort), Err(ContactError::Validation(_))));
    }
}
