//! Convenience lookups composed over `find_entities`.
//!
//! Each method is a fixed filter/field composition; defaults follow the
//! service's stock schema field names.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::client::FlowClient;
use crate::entity::Entity;
use crate::error::Error;
use crate::filter::{EntityRef, Filter};

const USER_FIELDS: &[&str] = &["id", "name", "login", "email"];
const SHOT_FIELDS: &[&str] = &["code", "description", "sg_status_list"];
const SHOT_FIELDS_WITH_PROJECT: &[&str] = &["code", "description", "sg_status_list", "project"];
const TASK_FIELDS: &[&str] = &["content", "sg_status_list", "task_assignees"];
const USER_TASK_FIELDS: &[&str] = &["content", "entity", "sg_status_list", "project"];

impl FlowClient {
    /// Look up a user by login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no user matches; this is distinct
    /// from transport, decode, and API errors.
    pub async fn get_user_by_login(&self, login: &str) -> Result<Entity, Error> {
        let users = self
            .find_entities("human_users", &[Filter::is("login", login)], USER_FIELDS)
            .await?;

        users.into_iter().next().ok_or_else(|| Error::NotFound {
            entity: "human_users".to_string(),
            field: "login".to_string(),
            value: login.to_string(),
        })
    }

    /// Look up a user by display name.
    pub async fn get_user_by_name(&self, name: &str) -> Result<Entity, Error> {
        let users = self
            .find_entities("human_users", &[Filter::is("name", name)], USER_FIELDS)
            .await?;

        users.into_iter().next().ok_or_else(|| Error::NotFound {
            entity: "human_users".to_string(),
            field: "name".to_string(),
            value: name.to_string(),
        })
    }

    /// List shots, optionally restricted to one project.
    pub async fn get_shots(
        &self,
        project_id: Option<i64>,
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        let filters = match project_id {
            Some(id) => vec![Filter::is("project", EntityRef::new("Project", id))],
            None => Vec::new(),
        };
        let fields = if fields.is_empty() { SHOT_FIELDS } else { fields };

        self.find_entities("shots", &filters, fields).await
    }

    /// List tasks attached to a shot.
    pub async fn get_tasks_for_shot(
        &self,
        shot_id: i64,
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        let filters = [Filter::is("entity", EntityRef::new("Shot", shot_id))];
        let fields = if fields.is_empty() { TASK_FIELDS } else { fields };

        self.find_entities("tasks", &filters, fields).await
    }

    /// List tasks assigned to a user.
    pub async fn get_tasks_for_user(
        &self,
        user_id: i64,
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        let filters = [Filter::is(
            "task_assignees",
            EntityRef::new("HumanUser", user_id),
        )];
        let fields = if fields.is_empty() {
            USER_TASK_FIELDS
        } else {
            fields
        };

        self.find_entities("tasks", &filters, fields).await
    }

    /// List tasks on a shot that are assigned to a user.
    pub async fn get_user_shot_tasks(
        &self,
        user_id: i64,
        shot_id: i64,
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        let filters = [
            Filter::is("entity", EntityRef::new("Shot", shot_id)),
            Filter::is("task_assignees", EntityRef::new("HumanUser", user_id)),
        ];
        let fields = if fields.is_empty() { TASK_FIELDS } else { fields };

        self.find_entities("tasks", &filters, fields).await
    }

    /// List the shots a user has tasks on.
    ///
    /// Two dependent round trips: fetch the user's tasks, collect the ids
    /// of related shots, then fetch those shots. A user with no tasks
    /// short-circuits to an empty result without issuing the second call.
    pub async fn get_shots_for_user(
        &self,
        user_id: i64,
        fields: &[&str],
    ) -> Result<Vec<Entity>, Error> {
        let tasks = self.get_tasks_for_user(user_id, &["entity"]).await?;

        // Deduplicate related shot ids; BTreeSet keeps the second request
        // deterministic.
        let mut shot_ids = BTreeSet::new();
        for task in &tasks {
            let Some(Value::Object(entity)) = task.get("entity") else {
                continue;
            };
            if entity.get("type").and_then(Value::as_str) == Some("Shot") {
                if let Some(id) = entity.get("id").and_then(Value::as_i64) {
                    shot_ids.insert(id);
                }
            }
        }

        if shot_ids.is_empty() {
            debug!(user_id, "user has no shot tasks");
            return Ok(Vec::new());
        }

        let filters = [Filter::in_list("id", shot_ids)];
        let fields = if fields.is_empty() {
            SHOT_FIELDS_WITH_PROJECT
        } else {
            fields
        };

        self.find_entities("shots", &filters, fields).await
    }
}
