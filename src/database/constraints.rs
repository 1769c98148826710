use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::error::Result;

/// A transaction with foreign-key enforcement deferred to commit.
///
/// Deferral only applies to statements run through [`ConstraintScope::conn`];
/// other connections in the pool keep immediate checks. Dropping the scope
/// without calling [`ConstraintScope::commit`] rolls every statement back.
pub struct ConstraintScope {
    tx: Transaction<'static, Postgres>,
    operation: &'static str,
}

impl ConstraintScope {
    pub async fn begin(pool: &PgPool, operation: &'static str) -> Result<Self> {
        let mut tx = pool.begin().await?;

        sqlx::query("SET CONSTRAINTS ALL DEFERRED")
            .execute(&mut *tx)
            .await?;

        tracing::debug!(operation, "Foreign key checks deferred");

        Ok(Self { tx, operation })
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commits the transaction; deferred constraints are verified here.
    pub async fn commit(self) -> Result<()> {
        let operation = self.operation;
        self.tx.commit().await?;

        tracing::debug!(operation, "Foreign key checks restored");

        Ok(())
    }
}
