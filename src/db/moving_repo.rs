// src/db/moving_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::moving::{
        Address, AddressKind, AddressPayload, MovingRequest, MovingRequestDetail,
        NewMovingRequest, RequestStatus,
    },
};

// Solicitação + cliente + os dois endereços, numa linha só.
// Os filtros (WHERE / ORDER BY) são concatenados no final.
const DETAIL_SELECT: &str = r#"
    SELECT
        r.id, r.client_id, r.origin_address_id, r.destination_address_id,
        r.description, r.move_date, r.notes, r.status, r.created_at, r.updated_at,
        u.name AS client_name, u.phone AS client_phone,
        o.user_id AS origin_user_id, o.cep AS origin_cep, o.street AS origin_street,
        o.number AS origin_number, o.complement AS origin_complement,
        o.neighborhood AS origin_neighborhood, o.city AS origin_city, o.state AS origin_state,
        d.user_id AS destination_user_id, d.cep AS destination_cep, d.street AS destination_street,
        d.number AS destination_number, d.complement AS destination_complement,
        d.neighborhood AS destination_neighborhood, d.city AS destination_city,
        d.state AS destination_state
    FROM moving_requests r
    JOIN users u ON u.id = r.client_id
    JOIN addresses o ON o.id = r.origin_address_id
    JOIN addresses d ON d.id = r.destination_address_id
"#;

#[derive(Debug, FromRow)]
struct MovingRequestRow {
    id: Uuid,
    client_id: Uuid,
    origin_address_id: Uuid,
    destination_address_id: Uuid,
    description: Option<String>,
    move_date: DateTime<Utc>,
    notes: Option<String>,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    client_name: String,
    client_phone: Option<String>,
    origin_user_id: Uuid,
    origin_cep: String,
    origin_street: String,
    origin_number: String,
    origin_complement: Option<String>,
    origin_neighborhood: String,
    origin_city: String,
    origin_state: String,
    destination_user_id: Uuid,
    destination_cep: String,
    destination_street: String,
    destination_number: String,
    destination_complement: Option<String>,
    destination_neighborhood: String,
    destination_city: String,
    destination_state: String,
}

impl From<MovingRequestRow> for MovingRequestDetail {
    fn from(row: MovingRequestRow) -> Self {
        let origin = Address {
            id: row.origin_address_id,
            user_id: row.origin_user_id,
            cep: row.origin_cep,
            street: row.origin_street,
            number: row.origin_number,
            complement: row.origin_complement,
            neighborhood: row.origin_neighborhood,
            city: row.origin_city,
            state: row.origin_state,
            kind: AddressKind::Origin,
        };
        let destination = Address {
            id: row.destination_address_id,
            user_id: row.destination_user_id,
            cep: row.destination_cep,
            street: row.destination_street,
            number: row.destination_number,
            complement: row.destination_complement,
            neighborhood: row.destination_neighborhood,
            city: row.destination_city,
            state: row.destination_state,
            kind: AddressKind::Destination,
        };

        MovingRequestDetail {
            request: MovingRequest {
                id: row.id,
                client_id: row.client_id,
                origin_address_id: row.origin_address_id,
                destination_address_id: row.destination_address_id,
                description: row.description,
                move_date: row.move_date,
                notes: row.notes,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            origin,
            destination,
            client_name: row.client_name,
            client_phone: row.client_phone,
        }
    }
}

#[derive(Clone)]
pub struct MovingRequestRepository {
    pool: PgPool,
}

impl MovingRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (sempre dentro de uma transação)
    // =========================================================================

    pub async fn create_address<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        address: &AddressPayload,
        kind: AddressKind,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (
                user_id, cep, street, number, complement, neighborhood, city, state, kind
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, cep, street, number, complement, neighborhood, city, state, kind
            "#,
        )
        .bind(user_id)
        .bind(&address.cep)
        .bind(&address.street)
        .bind(&address.number)
        .bind(address.complement.as_deref())
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(kind)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    pub async fn create_request<'e, E>(
        &self,
        executor: E,
        new_request: &NewMovingRequest,
    ) -> Result<MovingRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, MovingRequest>(
            r#"
            INSERT INTO moving_requests (
                client_id, origin_address_id, destination_address_id,
                description, move_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, client_id, origin_address_id, destination_address_id,
                description, move_date, notes, status, created_at, updated_at
            "#,
        )
        .bind(new_request.client_id)
        .bind(new_request.origin_address_id)
        .bind(new_request.destination_address_id)
        .bind(new_request.description.as_deref())
        .bind(new_request.move_date)
        .bind(new_request.notes.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    // FOR SHARE: uma aceitação concorrente (FOR UPDATE na mesma linha) espera
    // este orçamento terminar, e vice-versa.
    pub async fn find_pending_for_share<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
    ) -> Result<Option<MovingRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, MovingRequest>(
            r#"
            SELECT
                id, client_id, origin_address_id, destination_address_id,
                description, move_date, notes, status, created_at, updated_at
            FROM moving_requests
            WHERE id = $1 AND status = 'pending'
            FOR SHARE
            "#,
        )
        .bind(request_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE moving_requests
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(request_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<MovingRequestDetail>, AppError> {
        let sql = format!("{} WHERE r.client_id = $1 ORDER BY r.created_at DESC", DETAIL_SELECT);
        let rows = sqlx::query_as::<_, MovingRequestRow>(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MovingRequestDetail::from).collect())
    }

    pub async fn list_pending(&self) -> Result<Vec<MovingRequestDetail>, AppError> {
        let sql = format!("{} WHERE r.status = 'pending' ORDER BY r.created_at DESC", DETAIL_SELECT);
        let rows = sqlx::query_as::<_, MovingRequestRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MovingRequestDetail::from).collect())
    }

    pub async fn find_detail(&self, request_id: Uuid) -> Result<Option<MovingRequestDetail>, AppError> {
        let sql = format!("{} WHERE r.id = $1", DETAIL_SELECT);
        let row = sqlx::query_as::<_, MovingRequestRow>(&sql)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MovingRequestDetail::from))
    }
}
