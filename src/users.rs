//! User management page: list, add form, delete with confirmation, search.

use crate::api::{ApiError, Request};
use crate::app::Effect;
use crate::model::{NewUser, User};
use crate::toast::Toasts;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";
pub const EMPTY_USERS: &str = "No users found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Username,
    Email,
    FullName,
}

impl FormField {
    pub const ALL: [FormField; 3] = [Self::Username, Self::Email, Self::FullName];

    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::FullName => "Full name",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Username => Self::Email,
            Self::Email => Self::FullName,
            Self::FullName => Self::Username,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Username => Self::FullName,
            Self::Email => Self::Username,
            Self::FullName => Self::Email,
        }
    }
}

/// The add-user form. Hidden forms always have empty fields.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub visible: bool,
    pub focus: FormField,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub submitting: bool,
}

impl AddForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Email => &self.email,
            FormField::FullName => &self.full_name,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Username => &mut self.username,
            FormField::Email => &mut self.email,
            FormField::FullName => &mut self.full_name,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let focus = self.focus;
        self.value_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn clear(&mut self) {
        self.username.clear();
        self.email.clear();
        self.full_name.clear();
        self.focus = FormField::Username;
    }

    fn to_new_user(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Single-line username prompt for `/users/search`.
#[derive(Debug, Clone, Default)]
pub struct SearchPrompt {
    pub visible: bool,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct UsersPanel {
    pub users: Vec<User>,
    pub loaded: bool,
    pub cursor: usize,
    pub form: AddForm,
    pub search: SearchPrompt,
    /// Search hit that was not in the list; selected once the reload lands.
    pub pending_select: Option<u64>,
}

impl UsersPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Effect {
        Effect::Request(Request::LoadUsers)
    }

    pub fn selected(&self) -> Option<&User> {
        self.users.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.users.len() {
            self.cursor += 1;
        }
    }

    pub fn is_editing(&self) -> bool {
        self.form.visible || self.search.visible
    }

    /// Show or hide the add form; hiding clears every field.
    pub fn toggle_add_form(&mut self) {
        self.form.visible = !self.form.visible;
        if !self.form.visible {
            self.form.clear();
        }
    }

    pub fn submit_add(&mut self) -> Vec<Effect> {
        if !self.form.visible || self.form.submitting {
            return Vec::new();
        }
        self.form.submitting = true;
        vec![Effect::Request(Request::CreateUser(self.form.to_new_user()))]
    }

    pub fn open_search(&mut self) {
        self.search.visible = true;
        self.search.query.clear();
    }

    pub fn close_search(&mut self) {
        self.search.visible = false;
        self.search.query.clear();
    }

    pub fn submit_search(&mut self) -> Vec<Effect> {
        let username = self.search.query.trim().to_string();
        self.close_search();
        if username.is_empty() {
            return Vec::new();
        }
        vec![Effect::Request(Request::SearchUser(username))]
    }

    /// Delete only proceeds once the user has confirmed.
    pub fn delete(id: u64, confirmed: bool) -> Vec<Effect> {
        if !confirmed {
            return Vec::new();
        }
        vec![Effect::Request(Request::DeleteUser(id))]
    }

    pub fn on_users(&mut self, result: Result<Vec<User>, ApiError>, toasts: &mut Toasts) {
        match result {
            Ok(users) => {
                self.users = users;
                self.loaded = true;
                if let Some(id) = self.pending_select.take() {
                    if let Some(idx) = self.users.iter().position(|u| u.id == id) {
                        self.cursor = idx;
                    }
                }
                if self.cursor >= self.users.len() {
                    self.cursor = self.users.len().saturating_sub(1);
                }
            }
            Err(e) => {
                tracing::warn!("loading users failed: {e}");
                toasts.error("Failed to load users");
            }
        }
    }

    pub fn on_created(&mut self, result: Result<(), ApiError>, toasts: &mut Toasts) -> Vec<Effect> {
        self.form.submitting = false;
        match result {
            Ok(()) => {
                toasts.success("User created successfully!");
                if self.form.visible {
                    self.toggle_add_form();
                }
                vec![Self::load()]
            }
            Err(e) => {
                tracing::warn!("creating user failed: {e}");
                toasts.error("Failed to create user");
                Vec::new()
            }
        }
    }

    pub fn on_deleted(
        &mut self,
        id: u64,
        result: Result<(), ApiError>,
        toasts: &mut Toasts,
    ) -> Vec<Effect> {
        match result {
            Ok(()) => {
                tracing::info!(id, "user deleted");
                toasts.success("User deleted successfully!");
                vec![Self::load()]
            }
            Err(e) => {
                tracing::warn!(id, "deleting user failed: {e}");
                toasts.error("Failed to delete user");
                Vec::new()
            }
        }
    }

    /// Select the found user. A user created since the last load triggers a
    /// reload and is selected when it lands.
    pub fn on_found(
        &mut self,
        username: &str,
        result: Result<User, ApiError>,
        toasts: &mut Toasts,
    ) -> Vec<Effect> {
        match result {
            Ok(user) => {
                if let Some(idx) = self.users.iter().position(|u| u.id == user.id) {
                    self.cursor = idx;
                    Vec::new()
                } else {
                    self.pending_select = Some(user.id);
                    toasts.info(format!("Reloading users to show {username}"));
                    vec![Self::load()]
                }
            }
            Err(e) if e.is_not_found() => {
                toasts.warning(format!("No user named {username}"));
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("user search failed: {e}");
                toasts.error("Failed to search users");
                Vec::new()
            }
        }
    }
}
