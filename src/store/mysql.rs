use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use super::{LeaveQuery, LeaveRepository};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveRow, LeaveStatus};

const SEQUENCE_NAME: &str = "LVR_SEQ";

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
    Date(NaiveDate),
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn where_clause(query: &LeaveQuery) -> (String, Vec<FilterValue<'_>>) {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args = Vec::new();

        if let Some(owner) = query.owner.as_deref() {
            where_sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::Str(owner));
        }
        if let Some(emp_id) = query.employee_id.as_deref() {
            where_sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::Str(emp_id));
        }
        if let Some(status) = query.status.as_ref() {
            where_sql.push_str(" AND status_code = ?");
            args.push(FilterValue::Str(status.code()));
        }
        if let Some(from) = query.start_from {
            where_sql.push_str(" AND start_date >= ?");
            args.push(FilterValue::Date(from));
        }
        if let Some(to) = query.start_to {
            where_sql.push_str(" AND start_date <= ?");
            args.push(FilterValue::Date(to));
        }

        (where_sql, args)
    }
}

#[async_trait]
impl LeaveRepository for MySqlStore {
    async fn find_employee_by_name_fragment(&self, fragment: &str) -> Result<Option<Employee>> {
        // LOCATE against a binary operand is case-sensitive and needs no LIKE escaping
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email
            FROM employees
            WHERE LOCATE(BINARY ?, first_name) > 0
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(fragment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn next_sequence_value(&self) -> Result<u64> {
        // LAST_INSERT_ID is per connection, so both statements share one
        let mut conn = self.pool.acquire().await?;

        let advanced = sqlx::query(
            "UPDATE leave_request_seq SET next_val = LAST_INSERT_ID(next_val + 1) WHERE name = ?",
        )
        .bind(SEQUENCE_NAME)
        .execute(&mut *conn)
        .await?;

        if advanced.rows_affected() == 0 {
            bail!("sequence {SEQUENCE_NAME} is not initialised");
        }

        let value = sqlx::query_scalar::<_, u64>("SELECT LAST_INSERT_ID()")
            .fetch_one(&mut *conn)
            .await?;

        Ok(value)
    }

    async fn max_leave_number(&self) -> Result<Option<u64>> {
        let max = sqlx::query_scalar::<_, Option<u64>>(
            r#"
            SELECT MAX(CAST(SUBSTRING(id, 5) AS UNSIGNED))
            FROM leave_requests
            WHERE id REGEXP '^LVR_[0-9]+$'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn insert_leave(&self, leave: &LeaveRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leave_requests
                (id, employee_id, start_date, end_date, reason, status_code, type_code)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&leave.id)
        .bind(&leave.employee_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(leave.status.code())
        .bind(leave.leave_type.code())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_leaves(&self, query: &LeaveQuery) -> Result<(Vec<LeaveRequest>, i64)> {
        let (where_sql, args) = Self::where_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = match arg {
                FilterValue::Str(s) => count_q.bind(*s),
                FilterValue::Date(d) => count_q.bind(*d),
            };
        }
        let total = count_q.fetch_one(&self.pool).await?;

        let data_sql = format!(
            r#"
            SELECT id, employee_id, start_date, end_date, reason, status_code, type_code
            FROM leave_requests
            {}
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
            where_sql
        );
        let mut data_q = sqlx::query_as::<_, LeaveRow>(&data_sql);
        for arg in args {
            data_q = match arg {
                FilterValue::Str(s) => data_q.bind(s),
                FilterValue::Date(d) => data_q.bind(d),
            };
        }

        let rows = data_q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        let leaves = rows
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((leaves, total))
    }

    async fn get_leave(&self, id: &str, owner: Option<&str>) -> Result<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, employee_id, start_date, end_date, reason, status_code, type_code
            FROM leave_requests
            WHERE id = ?
            AND (? IS NULL OR employee_id = ?)
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn update_leave(&self, leave: &LeaveRequest, expected: LeaveStatus) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET start_date = ?, end_date = ?, reason = ?, type_code = ?, status_code = ?
            WHERE id = ?
            AND status_code = ?
            "#,
        )
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(leave.leave_type.code())
        .bind(leave.status.code())
        .bind(&leave.id)
        .bind(expected.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_status(&self, id: &str, from: LeaveStatus, to: LeaveStatus) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status_code = ?
            WHERE id = ?
            AND status_code = ?
            "#,
        )
        .bind(to.code())
        .bind(id)
        .bind(from.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_leave(&self, id: &str, owner: Option<&str>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM leave_requests WHERE id = ? AND (? IS NULL OR employee_id = ?)",
        )
        .bind(id)
        .bind(owner)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn employee_exists(&self, id: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}
