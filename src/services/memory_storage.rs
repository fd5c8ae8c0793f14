use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::dto::{
    application_dto::{CreateApplicationPayload, UpdateApplicationPayload},
    candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload},
    interview_dto::{CreateInterviewPayload, UpdateInterviewPayload},
    job_dto::{CreateJobPayload, JobSearch, UpdateJobPayload},
};
use crate::error::{Error, Result, DUPLICATE_MESSAGE, FOREIGN_KEY_MESSAGE};
use crate::models::{
    application::Application,
    candidate::Candidate,
    interview::{Interview, DEFAULT_INTERVIEW_STATUS},
    job::Job,
    user::{NewUser, User, UserChanges},
};
use crate::services::storage::Storage;
use crate::utils::time::{next_update_stamp, now};

/// In-process tables with the same unique, foreign-key and cascade rules as
/// the Postgres schema.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    interviews: Vec<Interview>,
    last_user_id: i32,
    last_candidate_id: i32,
    last_job_id: i32,
    last_application_id: i32,
    last_interview_id: i32,
}

fn newest_first<T: Clone>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i32),
) -> Vec<T> {
    let mut out: Vec<T> = rows.collect();
    out.sort_by_key(|row| Reverse(key(row)));
    out
}

fn foreign_key_error() -> Error {
    Error::BadRequest(FOREIGN_KEY_MESSAGE.to_string())
}

impl Tables {
    fn user_exists(&self, id: i32) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn check_user_unique(&self, username: &str, email: &str, except: Option<i32>) -> Result<()> {
        let clash = self.users.iter().any(|u| {
            Some(u.id) != except && (u.username == username || u.email == email)
        });
        if clash {
            return Err(Error::Conflict(DUPLICATE_MESSAGE.to_string()));
        }
        Ok(())
    }

    fn insert_user(&mut self, user: NewUser) -> Result<User> {
        self.check_user_unique(&user.username, &user.email, None)?;
        self.last_user_id += 1;
        let stamp = now();
        let row = User {
            id: self.last_user_id,
            username: user.username,
            password: user.password_hash,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
            created_at: stamp,
            updated_at: stamp,
        };
        self.users.push(row.clone());
        Ok(row)
    }

    fn insert_candidate(&mut self, payload: CreateCandidatePayload) -> Result<Candidate> {
        if !self.user_exists(payload.user_id) {
            return Err(foreign_key_error());
        }
        self.last_candidate_id += 1;
        let stamp = now();
        let row = Candidate {
            id: self.last_candidate_id,
            user_id: payload.user_id,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            state: payload.state,
            zip_code: payload.zip_code,
            country: payload.country,
            resume_url: payload.resume_url,
            bio: payload.bio,
            skills: payload.skills,
            experience: Some(payload.experience.unwrap_or(0)),
            education: payload.education,
            created_at: stamp,
            updated_at: stamp,
        };
        self.candidates.push(row.clone());
        Ok(row)
    }

    fn check_application_refs(&self, job_id: i32, candidate_id: i32, user_id: i32) -> Result<()> {
        let ok = self.jobs.iter().any(|j| j.id == job_id)
            && self.candidates.iter().any(|c| c.id == candidate_id)
            && self.user_exists(user_id);
        if ok {
            Ok(())
        } else {
            Err(foreign_key_error())
        }
    }

    fn check_interview_refs(&self, application_id: i32, interviewer_id: Option<i32>) -> Result<()> {
        let ok = self.applications.iter().any(|a| a.id == application_id)
            && interviewer_id.map_or(true, |id| self.user_exists(id));
        if ok {
            Ok(())
        } else {
            Err(foreign_key_error())
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.users.iter().cloned(), |u| (u.created_at, u.id)))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.tables.write().await.insert_user(user)
    }

    async fn register_user(&self, user: NewUser, with_candidate: bool) -> Result<User> {
        // Both rows are written under one write guard; nothing else observes
        // the user before its profile exists.
        let mut tables = self.tables.write().await;
        let created = tables.insert_user(user)?;
        if with_candidate {
            let profile = CreateCandidatePayload::for_user(created.id);
            if let Err(err) = tables.insert_candidate(profile) {
                tables.users.retain(|u| u.id != created.id);
                return Err(err);
            }
        }
        Ok(created)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.users.iter().find(|u| u.id == id).cloned() else {
            return Ok(None);
        };
        let username = changes.username.unwrap_or(current.username);
        let email = changes.email.unwrap_or(current.email);
        tables.check_user_unique(&username, &email, Some(id))?;

        let Some(row) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        row.username = username;
        row.email = email;
        if let Some(v) = changes.password_hash {
            row.password = v;
        }
        if let Some(v) = changes.role {
            row.role = v;
        }
        if changes.first_name.is_some() {
            row.first_name = changes.first_name;
        }
        if changes.last_name.is_some() {
            row.last_name = changes.last_name;
        }
        if changes.profile_image_url.is_some() {
            row.profile_image_url = changes.profile_image_url;
        }
        row.updated_at = next_update_stamp(row.updated_at);
        Ok(Some(row.clone()))
    }

    async fn delete_user(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(id) {
            return Ok(false);
        }

        let candidate_ids: Vec<i32> = tables
            .candidates
            .iter()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();
        let application_ids: Vec<i32> = tables
            .applications
            .iter()
            .filter(|a| a.user_id == id || candidate_ids.contains(&a.candidate_id))
            .map(|a| a.id)
            .collect();

        // Non-cascading references block the delete, as in Postgres.
        let still_referenced = tables.jobs.iter().any(|j| j.posted_by == Some(id))
            || tables.interviews.iter().any(|i| {
                i.interviewer_id == Some(id) && !application_ids.contains(&i.application_id)
            });
        if still_referenced {
            return Err(foreign_key_error());
        }

        tables
            .interviews
            .retain(|i| !application_ids.contains(&i.application_id));
        tables
            .applications
            .retain(|a| !application_ids.contains(&a.id));
        tables.candidates.retain(|c| c.user_id != id);
        tables.users.retain(|u| u.id != id);
        Ok(true)
    }

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>> {
        let tables = self.tables.read().await;
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn get_candidate_by_user_id(&self, user_id: i32) -> Result<Option<Candidate>> {
        let tables = self.tables.read().await;
        Ok(tables.candidates.iter().find(|c| c.user_id == user_id).cloned())
    }

    async fn create_candidate(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        self.tables.write().await.insert_candidate(payload)
    }

    async fn update_candidate(
        &self,
        id: i32,
        payload: UpdateCandidatePayload,
    ) -> Result<Option<Candidate>> {
        let mut tables = self.tables.write().await;
        if let Some(user_id) = payload.user_id {
            if !tables.user_exists(user_id) {
                return Err(foreign_key_error());
            }
        }
        let Some(row) = tables.candidates.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(v) = payload.user_id {
            row.user_id = v;
        }
        if payload.phone.is_some() {
            row.phone = payload.phone;
        }
        if payload.address.is_some() {
            row.address = payload.address;
        }
        if payload.city.is_some() {
            row.city = payload.city;
        }
        if payload.state.is_some() {
            row.state = payload.state;
        }
        if payload.zip_code.is_some() {
            row.zip_code = payload.zip_code;
        }
        if payload.country.is_some() {
            row.country = payload.country;
        }
        if payload.resume_url.is_some() {
            row.resume_url = payload.resume_url;
        }
        if payload.bio.is_some() {
            row.bio = payload.bio;
        }
        if payload.skills.is_some() {
            row.skills = payload.skills;
        }
        if payload.experience.is_some() {
            row.experience = payload.experience;
        }
        if payload.education.is_some() {
            row.education = payload.education;
        }
        row.updated_at = next_update_stamp(row.updated_at);
        Ok(Some(row.clone()))
    }

    async fn get_job(&self, id: i32) -> Result<Option<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.jobs.iter().cloned(), |j| (j.created_at, j.id)))
    }

    async fn get_active_jobs(&self) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.jobs.iter().filter(|j| j.is_active).cloned(),
            |j| (j.created_at, j.id),
        ))
    }

    async fn search_jobs(&self, search: JobSearch) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        let hits = tables
            .jobs
            .iter()
            .filter(|j| j.is_active)
            .filter(|j| j.matches_text(&search.query))
            .filter(|j| search.department.map_or(true, |d| j.department == d))
            .filter(|j| search.job_type.map_or(true, |t| j.job_type == t))
            .cloned();
        Ok(newest_first(hits, |j| (j.created_at, j.id)))
    }

    async fn create_job(&self, payload: CreateJobPayload) -> Result<Job> {
        let mut tables = self.tables.write().await;
        if let Some(poster) = payload.posted_by {
            if !tables.user_exists(poster) {
                return Err(foreign_key_error());
            }
        }
        tables.last_job_id += 1;
        let stamp = now();
        let row = Job {
            id: tables.last_job_id,
            title: payload.title,
            description: payload.description,
            short_description: payload.short_description,
            department: payload.department,
            job_type: payload.job_type.unwrap_or_default(),
            location: payload.location,
            salary: payload.salary,
            requirements: payload.requirements,
            responsibilities: payload.responsibilities,
            benefits: payload.benefits,
            posted_by: payload.posted_by,
            is_active: payload.is_active.unwrap_or(true),
            deadline: payload.deadline,
            vacancies: Some(payload.vacancies.unwrap_or(1)),
            created_at: stamp,
            updated_at: stamp,
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: i32, payload: UpdateJobPayload) -> Result<Option<Job>> {
        let mut tables = self.tables.write().await;
        if let Some(poster) = payload.posted_by {
            if !tables.user_exists(poster) {
                return Err(foreign_key_error());
            }
        }
        let Some(row) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        if let Some(v) = payload.title {
            row.title = v;
        }
        if let Some(v) = payload.description {
            row.description = v;
        }
        if payload.short_description.is_some() {
            row.short_description = payload.short_description;
        }
        if let Some(v) = payload.department {
            row.department = v;
        }
        if let Some(v) = payload.job_type {
            row.job_type = v;
        }
        if let Some(v) = payload.location {
            row.location = v;
        }
        if payload.salary.is_some() {
            row.salary = payload.salary;
        }
        if payload.requirements.is_some() {
            row.requirements = payload.requirements;
        }
        if payload.responsibilities.is_some() {
            row.responsibilities = payload.responsibilities;
        }
        if payload.benefits.is_some() {
            row.benefits = payload.benefits;
        }
        if payload.posted_by.is_some() {
            row.posted_by = payload.posted_by;
        }
        if let Some(v) = payload.is_active {
            row.is_active = v;
        }
        if payload.deadline.is_some() {
            row.deadline = payload.deadline;
        }
        if payload.vacancies.is_some() {
            row.vacancies = payload.vacancies;
        }
        row.updated_at = next_update_stamp(row.updated_at);
        Ok(Some(row.clone()))
    }

    async fn get_application(&self, id: i32) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn get_all_applications(&self) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.applications.iter().cloned(), |a| {
            (a.created_at, a.id)
        }))
    }

    async fn get_user_applications(&self, user_id: i32) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .applications
                .iter()
                .filter(|a| a.user_id == user_id)
                .cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn get_job_applications(&self, job_id: i32) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .applications
                .iter()
                .filter(|a| a.job_id == job_id)
                .cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn find_application(
        &self,
        candidate_id: i32,
        job_id: i32,
    ) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .iter()
            .rev()
            .find(|a| a.candidate_id == candidate_id && a.job_id == job_id)
            .cloned())
    }

    async fn create_application(&self, payload: CreateApplicationPayload) -> Result<Application> {
        let mut tables = self.tables.write().await;
        tables.check_application_refs(payload.job_id, payload.candidate_id, payload.user_id)?;
        tables.last_application_id += 1;
        let stamp = now();
        let row = Application {
            id: tables.last_application_id,
            job_id: payload.job_id,
            candidate_id: payload.candidate_id,
            user_id: payload.user_id,
            status: payload.status.unwrap_or_default(),
            cover_letter: payload.cover_letter,
            notes: payload.notes,
            created_at: stamp,
            updated_at: stamp,
            interview_date: payload.interview_date,
            interview_feedback: payload.interview_feedback,
        };
        tables.applications.push(row.clone());
        Ok(row)
    }

    async fn update_application(
        &self,
        id: i32,
        payload: UpdateApplicationPayload,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.applications.iter().find(|a| a.id == id).cloned() else {
            return Ok(None);
        };
        tables.check_application_refs(
            payload.job_id.unwrap_or(current.job_id),
            payload.candidate_id.unwrap_or(current.candidate_id),
            payload.user_id.unwrap_or(current.user_id),
        )?;
        let Some(row) = tables.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(v) = payload.job_id {
            row.job_id = v;
        }
        if let Some(v) = payload.candidate_id {
            row.candidate_id = v;
        }
        if let Some(v) = payload.user_id {
            row.user_id = v;
        }
        if let Some(v) = payload.status {
            row.status = v;
        }
        if payload.cover_letter.is_some() {
            row.cover_letter = payload.cover_letter;
        }
        if payload.notes.is_some() {
            row.notes = payload.notes;
        }
        if payload.interview_date.is_some() {
            row.interview_date = payload.interview_date;
        }
        if payload.interview_feedback.is_some() {
            row.interview_feedback = payload.interview_feedback;
        }
        row.updated_at = next_update_stamp(row.updated_at);
        Ok(Some(row.clone()))
    }

    async fn get_interview(&self, id: i32) -> Result<Option<Interview>> {
        let tables = self.tables.read().await;
        Ok(tables.interviews.iter().find(|i| i.id == id).cloned())
    }

    async fn get_application_interviews(&self, application_id: i32) -> Result<Vec<Interview>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Interview> = tables
            .interviews
            .iter()
            .filter(|i| i.application_id == application_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| (i.scheduled_for, i.id));
        Ok(rows)
    }

    async fn create_interview(&self, payload: CreateInterviewPayload) -> Result<Interview> {
        let mut tables = self.tables.write().await;
        tables.check_interview_refs(payload.application_id, payload.interviewer_id)?;
        tables.last_interview_id += 1;
        let stamp = now();
        let row = Interview {
            id: tables.last_interview_id,
            application_id: payload.application_id,
            scheduled_for: payload.scheduled_for,
            interviewer_id: payload.interviewer_id,
            status: payload
                .status
                .unwrap_or_else(|| DEFAULT_INTERVIEW_STATUS.to_string()),
            feedback: payload.feedback,
            rating: payload.rating,
            notes: payload.notes,
            created_at: stamp,
            updated_at: stamp,
        };
        tables.interviews.push(row.clone());
        Ok(row)
    }

    async fn update_interview(
        &self,
        id: i32,
        payload: UpdateInterviewPayload,
    ) -> Result<Option<Interview>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.interviews.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };
        tables.check_interview_refs(
            payload.application_id.unwrap_or(current.application_id),
            payload.interviewer_id.or(current.interviewer_id),
        )?;
        let Some(row) = tables.interviews.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(v) = payload.application_id {
            row.application_id = v;
        }
        if let Some(v) = payload.scheduled_for {
            row.scheduled_for = v;
        }
        if payload.interviewer_id.is_some() {
            row.interviewer_id = payload.interviewer_id;
        }
        if let Some(v) = payload.status {
            row.status = v;
        }
        if payload.feedback.is_some() {
            row.feedback = payload.feedback;
        }
        if payload.rating.is_some() {
            row.rating = payload.rating;
        }
        if payload.notes.is_some() {
            row.notes = payload.notes;
        }
        row.updated_at = next_update_stamp(row.updated_at);
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{Department, JobType};
    use crate::models::user::UserRole;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
            email: format!("{}@example.com", name),
            role: UserRole::Candidate,
            first_name: None,
            last_name: None,
            profile_image_url: None,
        }
    }

    fn job(title: &str, department: Department, active: bool) -> CreateJobPayload {
        CreateJobPayload {
            title: title.to_string(),
            description: format!("{} description", title),
            short_description: None,
            department,
            job_type: None,
            location: "Jakarta".to_string(),
            salary: None,
            requirements: Some(vec!["Rust".into(), "SQL".into()]),
            responsibilities: None,
            benefits: None,
            posted_by: None,
            is_active: Some(active),
            deadline: None,
            vacancies: None,
        }
    }

    #[tokio::test]
    async fn job_defaults_are_applied() {
        let store = MemoryStorage::new();
        let created = store
            .create_job(job("Driver", Department::Operations, true))
            .await
            .unwrap();
        assert_eq!(created.job_type, JobType::FullTime);
        assert_eq!(created.vacancies, Some(1));
        assert_eq!(
            created.requirements.as_deref(),
            Some(&["Rust".to_string(), "SQL".to_string()][..])
        );
    }

    #[tokio::test]
    async fn search_is_active_only_case_sensitive_and_newest_first() {
        let store = MemoryStorage::new();
        let a = store
            .create_job(job("Signal Engineer", Department::Engineering, true))
            .await
            .unwrap();
        store
            .create_job(job("Signal Fitter", Department::Engineering, false))
            .await
            .unwrap();
        let c = store
            .create_job(job("Signal Planner", Department::Management, true))
            .await
            .unwrap();

        let all_active = store.search_jobs(JobSearch::default()).await.unwrap();
        assert_eq!(
            all_active.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![c.id, a.id]
        );

        let lower = store
            .search_jobs(JobSearch {
                query: "signal".into(),
                ..JobSearch::default()
            })
            .await
            .unwrap();
        assert!(lower.is_empty());

        let engineering = store
            .search_jobs(JobSearch {
                query: "Signal".into(),
                department: Some(Department::Engineering),
                job_type: None,
            })
            .await
            .unwrap();
        assert_eq!(engineering.len(), 1);
        assert_eq!(engineering[0].id, a.id);
    }

    #[tokio::test]
    async fn updates_strictly_advance_updated_at() {
        let store = MemoryStorage::new();
        let created = store
            .create_job(job("Guard", Department::Operations, true))
            .await
            .unwrap();
        let first = store
            .update_job(
                created.id,
                UpdateJobPayload {
                    salary: Some("10".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        let second = store
            .update_job(
                created.id,
                UpdateJobPayload {
                    salary: Some("11".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.title, "Guard");
    }

    #[tokio::test]
    async fn update_of_missing_row_is_none() {
        let store = MemoryStorage::new();
        let res = store
            .update_job(99, UpdateJobPayload::default())
            .await
            .unwrap();
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = MemoryStorage::new();
        store.create_user(new_user("ana")).await.unwrap();
        let mut dup = new_user("bob");
        dup.email = "ana@example.com".into();
        assert!(matches!(
            store.create_user(dup).await,
            Err(Error::Conflict(_))
        ));
        assert_eq!(store.get_all_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_with_candidate_creates_profile() {
        let store = MemoryStorage::new();
        let user = store.register_user(new_user("cara"), true).await.unwrap();
        let profile = store
            .get_candidate_by_user_id(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.experience, Some(0));
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let store = MemoryStorage::new();
        let res = store
            .create_candidate(CreateCandidatePayload::for_user(404))
            .await;
        assert!(matches!(res, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_profile_applications_and_interviews() {
        let store = MemoryStorage::new();
        let user = store.register_user(new_user("dan"), true).await.unwrap();
        let candidate = store
            .get_candidate_by_user_id(user.id)
            .await
            .unwrap()
            .unwrap();
        let posted = store
            .create_job(job("Conductor", Department::Operations, true))
            .await
            .unwrap();
        let application = store
            .create_application(CreateApplicationPayload {
                job_id: posted.id,
                candidate_id: candidate.id,
                user_id: user.id,
                status: None,
                cover_letter: None,
                notes: None,
                interview_date: None,
                interview_feedback: None,
            })
            .await
            .unwrap();
        store
            .create_interview(CreateInterviewPayload {
                application_id: application.id,
                scheduled_for: now(),
                interviewer_id: None,
                status: None,
                feedback: None,
                rating: None,
                notes: None,
            })
            .await
            .unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.get_candidate(candidate.id).await.unwrap().is_none());
        assert!(store
            .get_application(application.id)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_application_interviews(application.id)
            .await
            .unwrap()
            .is_empty());
        assert!(store.get_job(posted.id).await.unwrap().is_some());
        assert!(!store.delete_user(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn job_poster_cannot_be_deleted() {
        let store = MemoryStorage::new();
        let recruiter = store.create_user(new_user("rita")).await.unwrap();
        let mut payload = job("Inspector", Department::Maintenance, true);
        payload.posted_by = Some(recruiter.id);
        store.create_job(payload).await.unwrap();
        assert!(matches!(
            store.delete_user(recruiter.id).await,
            Err(Error::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn interviews_are_ordered_by_schedule() {
        let store = MemoryStorage::new();
        let user = store.register_user(new_user("eve"), true).await.unwrap();
        let candidate = store
            .get_candidate_by_user_id(user.id)
            .await
            .unwrap()
            .unwrap();
        let posted = store
            .create_job(job("Porter", Department::CustomerService, true))
            .await
            .unwrap();
        let application = store
            .create_application(CreateApplicationPayload {
                job_id: posted.id,
                candidate_id: candidate.id,
                user_id: user.id,
                status: None,
                cover_letter: None,
                notes: None,
                interview_date: None,
                interview_feedback: None,
            })
            .await
            .unwrap();
        let later = now() + chrono::Duration::days(2);
        let sooner = now() + chrono::Duration::days(1);
        for when in [later, sooner] {
            store
                .create_interview(CreateInterviewPayload {
                    application_id: application.id,
                    scheduled_for: when,
                    interviewer_id: None,
                    status: None,
                    feedback: None,
                    rating: None,
                    notes: None,
                })
                .await
                .unwrap();
        }
        let listed = store
            .get_application_interviews(application.id)
            .await
            .unwrap();
        assert_eq!(listed[0].scheduled_for, sooner);
        assert_eq!(listed[0].status, DEFAULT_INTERVIEW_STATUS);
    }
}
