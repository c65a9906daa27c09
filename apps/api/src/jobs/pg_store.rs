use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::{JobQuery, JobStore, ScanOrder};
use crate::models::job::{JobPosting, JobStatus, NewJobPosting};

#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    seq: i64,
    title: String,
    company: String,
    location: String,
    job_type: String,
    salary: Option<String>,
    description: String,
    hr_email: String,
    status: String,
    posted_by: String,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            job_type: row.job_type,
            salary: row.salary,
            description: row.description,
            hr_email: row.hr_email,
            status: JobStatus::from_stored(&row.status),
            posted_by: row.posted_by,
            created_at: row.created_at,
            seq: row.seq,
        }
    }
}

/// PostgreSQL-backed job store over the `jobs` table.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: NewJobPosting, posted_by: &str) -> Result<JobPosting, AppError> {
        job.validate()?;
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, title, company, location, job_type, salary, description, hr_email, status, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type_or_default())
        .bind(job.salary_or_none())
        .bind(&job.description)
        .bind(&job.hr_email)
        .bind(job.status.unwrap_or_default().as_str())
        .bind(posted_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn find_matching(&self, query: &JobQuery) -> Result<Vec<JobPosting>, AppError> {
        let mut qb = build_select(query);
        debug!("find_matching: {}", qb.sql());
        let rows = qb
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_select(query: &JobQuery) -> QueryBuilder<'static, Postgres> {
    let p = &query.predicate;
    let mut qb = QueryBuilder::new("SELECT * FROM jobs WHERE TRUE");

    if let Some(text) = &p.text {
        let pattern = like_pattern(text);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR company ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(job_type) = &p.job_type {
        qb.push(" AND lower(job_type) = lower(")
            .push_bind(job_type.clone())
            .push(")");
    }
    for (column, value) in [
        ("company", &p.company),
        ("location", &p.location),
        ("title", &p.title),
    ] {
        if let Some(value) = value {
            qb.push(format!(" AND {column} ILIKE "))
                .push_bind(like_pattern(value))
                .push(" ESCAPE '\\'");
        }
    }

    match query.order {
        ScanOrder::NewestFirst => qb.push(" ORDER BY created_at DESC, seq DESC"),
        ScanOrder::Insertion => qb.push(" ORDER BY seq ASC"),
    };
    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit as i64);
    }
    qb
}

/// Wraps `needle` for an ILIKE containment test with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
