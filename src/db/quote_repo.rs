// src/db/quote_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quotes::{LockedQuote, NewQuote, Quote, QuoteStatus, QuoteSummary},
};

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    pub async fn exists_for_company<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        company_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM quotes
                WHERE request_id = $1 AND company_id = $2
            )
            "#,
        )
        .bind(request_id)
        .bind(company_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    pub async fn create_quote<'e, E>(&self, executor: E, new_quote: &NewQuote) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                request_id, company_id, value, service_description, deadline_days, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, request_id, company_id, value, service_description,
                deadline_days, notes, status, created_at, updated_at
            "#,
        )
        .bind(new_quote.request_id)
        .bind(new_quote.company_id)
        .bind(new_quote.value)
        .bind(&new_quote.service_description)
        .bind(new_quote.deadline_days)
        .bind(new_quote.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Duas inserções concorrentes da mesma empresa: a segunda bate na UNIQUE
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("quotes_request_company_key")
                {
                    return AppError::DuplicateQuote;
                }
            }
            e.into()
        })?;

        Ok(quote)
    }

    // =========================================================================
    //  DECISÃO (aceitar / rejeitar)
    // =========================================================================

    // Trava a solicitação dona do orçamento. Toda decisão sobre orçamentos da
    // mesma solicitação passa por esta linha, então elas ficam em fila.
    pub async fn lock_parent_request<'e, E>(
        &self,
        executor: E,
        quote_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT r.id
            FROM moving_requests r
            JOIN quotes q ON q.request_id = r.id
            WHERE q.id = $1 AND r.client_id = $2
            FOR UPDATE OF r
            "#,
        )
        .bind(quote_id)
        .bind(client_id)
        .fetch_optional(executor)
        .await?;

        Ok(request_id)
    }

    // Relê o orçamento já com a solicitação travada. Em READ COMMITTED esta
    // leitura enxerga o que a decisão anterior acabou de gravar.
    pub async fn find_for_decision<'e, E>(
        &self,
        executor: E,
        quote_id: Uuid,
    ) -> Result<Option<LockedQuote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locked = sqlx::query_as::<_, LockedQuote>(
            r#"
            SELECT
                q.id, q.request_id, q.company_id, q.value, q.service_description,
                q.deadline_days, q.notes, q.status, q.created_at, q.updated_at,
                r.status AS request_status
            FROM quotes q
            JOIN moving_requests r ON r.id = q.request_id
            WHERE q.id = $1
            FOR UPDATE OF q
            "#,
        )
        .bind(quote_id)
        .fetch_optional(executor)
        .await?;

        Ok(locked)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        quote_id: Uuid,
        status: QuoteStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE quotes
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(quote_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Rejeita os outros orçamentos ainda pendentes da mesma solicitação.
    // Retorna quantos foram rejeitados.
    pub async fn reject_pending_siblings<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        accepted_quote_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE quotes
            SET status = 'rejected', updated_at = NOW()
            WHERE request_id = $1 AND id <> $2 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(accepted_quote_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    // Cliente: orçamentos recebidos nas suas solicitações, com o contato da empresa
    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        let quotes = sqlx::query_as::<_, QuoteSummary>(
            r#"
            SELECT
                q.id, q.request_id, q.company_id, q.value, q.service_description,
                q.deadline_days, q.notes, q.status, q.created_at, q.updated_at,
                r.description AS request_description,
                c.name AS counterpart_name, c.phone AS counterpart_phone
            FROM quotes q
            JOIN moving_requests r ON r.id = q.request_id
            JOIN users c ON c.id = q.company_id
            WHERE r.client_id = $1
            ORDER BY q.created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    // Empresa: orçamentos que ela enviou, com o contato do cliente
    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        let quotes = sqlx::query_as::<_, QuoteSummary>(
            r#"
            SELECT
                q.id, q.request_id, q.company_id, q.value, q.service_description,
                q.deadline_days, q.notes, q.status, q.created_at, q.updated_at,
                r.description AS request_description,
                c.name AS counterpart_name, c.phone AS counterpart_phone
            FROM quotes q
            JOIN moving_requests r ON r.id = q.request_id
            JOIN users c ON c.id = r.client_id
            WHERE q.company_id = $1
            ORDER BY q.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }
}
