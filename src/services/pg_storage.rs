use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::{
    application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
    candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload},
    interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
    job_dto::{CreateJobPayload, JobSearch, UpdateJobPayload},
};
use crate::error::Result;
use crate::models::{
    application::Application,
    candidate::Candidate,
    interview::{Interview, DEFAULT_INTERVIEW_STATUS},
    job::Job,
    user::{NewUser, User, UserChanges},
};
use crate::services::storage::Storage;

const USER_COLUMNS: &str = "id, username, password, email, role, first_name, last_name, \
     profile_image_url, created_at, updated_at";

const CANDIDATE_COLUMNS: &str = "id, user_id, phone, address, city, state, zip_code, country, \
     resume_url, bio, skills, experience, education, created_at, updated_at";

const JOB_COLUMNS: &str = "id, title, description, short_description, department, job_type, \
     location, salary, requirements, responsibilities, benefits, posted_by, is_active, deadline, \
     vacancies, created_at, updated_at";

const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, user_id, status, cover_letter, \
     notes, created_at, updated_at, interview_date, interview_feedback";

const INTERVIEW_COLUMNS: &str = "id, application_id, scheduled_for, interviewer_id, status, \
     feedback, rating, notes, created_at, updated_at";

/// `updated_at` always moves forward, even when two updates share a
/// transaction timestamp.
const STAMP_UPDATED_AT: &str =
    "updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')";

/// Appends `, column = $n` for every present field.
macro_rules! set_present {
    ($qb:expr, $( $column:literal => $value:expr ),+ $(,)?) => {
        $(
            if let Some(value) = $value {
                $qb.push(concat!(", ", $column, " = ")).push_bind(value);
            }
        )+
    };
}

fn update_builder(table: &str) -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!("UPDATE {} SET {}", table, STAMP_UPDATED_AT))
}

fn finish_update(qb: &mut QueryBuilder<'static, Postgres>, id: i32, columns: &str) {
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING ").push(columns);
}

#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_user<'e, E>(executor: E, user: &NewUser) -> Result<User>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO users (username, password, email, role, first_name, last_name, \
             profile_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.role)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.profile_image_url)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    async fn insert_candidate<'e, E>(
        executor: E,
        payload: CreateCandidatePayload,
    ) -> Result<Candidate>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO candidates (user_id, phone, address, city, state, zip_code, country, \
             resume_url, bio, skills, experience, education) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}",
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, Candidate>(&sql)
            .bind(payload.user_id)
            .bind(payload.phone)
            .bind(payload.address)
            .bind(payload.city)
            .bind(payload.state)
            .bind(payload.zip_code)
            .bind(payload.country)
            .bind(payload.resume_url)
            .bind(payload.bio)
            .bind(payload.skills)
            .bind(payload.experience.unwrap_or(0))
            .bind(payload.education)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    async fn fetch_user_where(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.fetch_user_where("username", username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_user_where("email", email).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        Self::insert_user(&self.pool, &user).await
    }

    async fn register_user(&self, user: NewUser, with_candidate: bool) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let created = Self::insert_user(&mut *tx, &user).await?;
        if with_candidate {
            Self::insert_candidate(&mut *tx, CreateCandidatePayload::for_user(created.id)).await?;
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>> {
        let mut qb = update_builder("users");
        set_present!(qb,
            "username" => changes.username,
            "password" => changes.password_hash,
            "email" => changes.email,
            "role" => changes.role,
            "first_name" => changes.first_name,
            "last_name" => changes.last_name,
            "profile_image_url" => changes.profile_image_url,
        );
        finish_update(&mut qb, id, USER_COLUMNS);
        let row = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_user(&self, id: i32) -> Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let row = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_candidate_by_user_id(&self, user_id: i32) -> Result<Option<Candidate>> {
        let sql = format!(
            "SELECT {} FROM candidates WHERE user_id = $1 ORDER BY id LIMIT 1",
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, Candidate>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_candidate(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        Self::insert_candidate(&self.pool, payload).await
    }

    async fn update_candidate(
        &self,
        id: i32,
        payload: UpdateCandidatePayload,
    ) -> Result<Option<Candidate>> {
        let mut qb = update_builder("candidates");
        set_present!(qb,
            "user_id" => payload.user_id,
            "phone" => payload.phone,
            "address" => payload.address,
            "city" => payload.city,
            "state" => payload.state,
            "zip_code" => payload.zip_code,
            "country" => payload.country,
            "resume_url" => payload.resume_url,
            "bio" => payload.bio,
            "skills" => payload.skills,
            "experience" => payload.experience,
            "education" => payload.education,
        );
        finish_update(&mut qb, id, CANDIDATE_COLUMNS);
        let row = qb
            .build_query_as::<Candidate>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_job(&self, id: i32) -> Result<Option<Job>> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, Job>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_active_jobs(&self) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE is_active = TRUE ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, Job>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn search_jobs(&self, search: JobSearch) -> Result<Vec<Job>> {
        // strpos keeps the match a literal, case-sensitive substring; LIKE would
        // treat '%' and '_' in user input as wildcards.
        let sql = format!(
            "SELECT {} FROM jobs
             WHERE is_active = TRUE
               AND ($1 = '' OR strpos(title, $1) > 0 OR strpos(description, $1) > 0
                    OR strpos(COALESCE(short_description, ''), $1) > 0 OR strpos(location, $1) > 0)
               AND ($2::department IS NULL OR department = $2)
               AND ($3::job_type IS NULL OR job_type = $3)
             ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, Job>(&sql)
            .bind(search.query)
            .bind(search.department)
            .bind(search.job_type)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_job(&self, payload: CreateJobPayload) -> Result<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, description, short_description, department, job_type, \
             location, salary, requirements, responsibilities, benefits, posted_by, is_active, \
             deadline, vacancies) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING {}",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, Job>(&sql)
            .bind(payload.title)
            .bind(payload.description)
            .bind(payload.short_description)
            .bind(payload.department)
            .bind(payload.job_type.unwrap_or_default())
            .bind(payload.location)
            .bind(payload.salary)
            .bind(payload.requirements)
            .bind(payload.responsibilities)
            .bind(payload.benefits)
            .bind(payload.posted_by)
            .bind(payload.is_active.unwrap_or(true))
            .bind(payload.deadline)
            .bind(payload.vacancies.unwrap_or(1))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_job(&self, id: i32, payload: UpdateJobPayload) -> Result<Option<Job>> {
        let mut qb = update_builder("jobs");
        set_present!(qb,
            "title" => payload.title,
            "description" => payload.description,
            "short_description" => payload.short_description,
            "department" => payload.department,
            "job_type" => payload.job_type,
            "location" => payload.location,
            "salary" => payload.salary,
            "requirements" => payload.requirements,
            "responsibilities" => payload.responsibilities,
            "benefits" => payload.benefits,
            "posted_by" => payload.posted_by,
            "is_active" => payload.is_active,
            "deadline" => payload.deadline,
            "vacancies" => payload.vacancies,
        );
        finish_update(&mut qb, id, JOB_COLUMNS);
        let row = qb
            .build_query_as::<Job>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_application(&self, id: i32) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_all_applications(&self) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications ORDER BY created_at DESC, id DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Application>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_user_applications(&self, user_id: i32) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Application>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_job_applications(&self, job_id: i32) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE job_id = $1 ORDER BY created_at DESC, id DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Application>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_application(
        &self,
        candidate_id: i32,
        job_id: i32,
    ) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE candidate_id = $1 AND job_id = $2 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&sql)
            .bind(candidate_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_application(&self, payload: CreateApplicationPayload) -> Result<Application> {
        let sql = format!(
            "INSERT INTO applications (job_id, candidate_id, user_id, status, cover_letter, notes, \
             interview_date, interview_feedback) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Application>(&sql)
            .bind(payload.job_id)
            .bind(payload.candidate_id)
            .bind(payload.user_id)
            .bind(payload.status.unwrap_or_default())
            .bind(payload.cover_letter)
            .bind(payload.notes)
            .bind(payload.interview_date)
            .bind(payload.interview_feedback)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_application(
        &self,
        id: i32,
        payload: UpdateApplicationPayload,
    ) -> Result<Option<Application>> {
        let mut qb = update_builder("applications");
        set_present!(qb,
            "job_id" => payload.job_id,
            "candidate_id" => payload.candidate_id,
            "user_id" => payload.user_id,
            "status" => payload.status,
            "cover_letter" => payload.cover_letter,
            "notes" => payload.notes,
            "interview_date" => payload.interview_date,
            "interview_feedback" => payload.interview_feedback,
        );
        finish_update(&mut qb, id, APPLICATION_COLUMNS);
        let row = qb
            .build_query_as::<Application>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_interview(&self, id: i32) -> Result<Option<Interview>> {
        let sql = format!("SELECT {} FROM interviews WHERE id = $1", INTERVIEW_COLUMNS);
        let row = sqlx::query_as::<_, Interview>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_application_interviews(&self, application_id: i32) -> Result<Vec<Interview>> {
        let sql = format!(
            "SELECT {} FROM interviews WHERE application_id = $1 \
             ORDER BY scheduled_for ASC, id ASC",
            INTERVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, Interview>(&sql)
            .bind(application_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_interview(&self, payload: CreateInterviewPayload) -> Result<Interview> {
        let sql = format!(
            "INSERT INTO interviews (application_id, scheduled_for, interviewer_id, status, \
             feedback, \
             rating, notes) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, Interview>(&sql)
            .bind(payload.application_id)
            .bind(payload.scheduled_for)
            .bind(payload.interviewer_id)
            .bind(
                payload
                    .status
                    .unwrap_or_else(|| DEFAULT_INTERVIEW_STATUS.to_string()),
            )
            .bind(payload.feedback)
            .bind(payload.rating)
            .bind(payload.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_interview(
        &self,
        id: i32,
        payload: UpdateInterviewPayload,
    ) -> Result<Option<Interview>> {
        let mut qb = update_builder("interviews");
        set_present!(qb,
            "application_id" => payload.application_id,
            "scheduled_for" => payload.scheduled_for,
            "interviewer_id" => payload.interviewer_id,
            "status" => payload.status,
            "feedback" => payload.feedback,
            "rating" => payload.rating,
            "notes" => payload.notes,
        );
        finish_update(&mut qb, id, INTERVIEW_COLUMNS);
        let row = qb
            .build_query_as::<Interview>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
