// Input forms for the three create operations
//
// The adapters (TUI, HTTP) fill a form and call `submit`. A form validates
// its own fields first (text must be non-blank after trimming, selections
// must be made), then hands the values to the store unchanged. On success
// the form resets; on failure it keeps what the user typed.

use crate::entities::{Course, CourseType, Registration};
use crate::error::StoreError;
use crate::store::{CourseFilter, RelationalStore};
use crate::views::CourseView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Blank(&'static str),

    #[error("select a {0}")]
    NoSelection(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn require_text(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Blank(field));
    }
    Ok(())
}

fn require_selection<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, FormError> {
    match value.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(FormError::NoSelection(field)),
    }
}

// ============================================================================
// COURSE TYPE FORM
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseTypeForm {
    pub name: String,
}

impl CourseTypeForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require_text(&self.name, "course type name")
    }

    pub fn submit(&mut self, store: &RelationalStore) -> Result<CourseType, FormError> {
        self.validate()?;
        let course_type = store.create_course_type(self.name.clone())?;
        *self = Self::default();
        Ok(course_type)
    }
}

// ============================================================================
// COURSE FORM
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseForm {
    pub name: String,
    pub type_id: Option<String>,
}

impl CourseForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require_text(&self.name, "course name")?;
        require_selection(&self.type_id, "course type")?;
        Ok(())
    }

    pub fn submit(&mut self, store: &RelationalStore) -> Result<Course, FormError> {
        self.validate()?;
        let type_id = require_selection(&self.type_id, "course type")?;
        let course = store.create_course(self.name.clone(), type_id)?;
        *self = Self::default();
        Ok(course)
    }
}

// ============================================================================
// REGISTRATION FORM
// ============================================================================

/// Student registration
///
/// `type_filter` narrows the selectable courses; a course can only be picked
/// once a type is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub student_name: String,
    pub type_filter: Option<String>,
    pub course_id: Option<String>,
}

impl RegistrationForm {
    pub fn course_selection_enabled(&self) -> bool {
        self.type_filter.as_deref().is_some_and(|id| !id.is_empty())
    }

    fn filter(&self) -> CourseFilter {
        match self.type_filter.as_deref() {
            Some(id) if !id.is_empty() => CourseFilter::by_type(id),
            _ => CourseFilter::all(),
        }
    }

    /// Courses offered for the current type filter (all when unfiltered)
    pub fn course_options(&self, store: &RelationalStore) -> Vec<CourseView> {
        store.joined_course_view_filtered(&self.filter())
    }

    /// Change the type filter, dropping a course choice that no longer fits
    pub fn set_type_filter(&mut self, store: &RelationalStore, type_id: Option<String>) {
        self.type_filter = type_id;

        let still_offered = self.course_id.as_deref().is_some_and(|course_id| {
            store
                .resolve_course(course_id)
                .is_some_and(|course| self.filter().matches(&course))
        });
        if !still_offered {
            self.course_id = None;
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require_text(&self.student_name, "student name")?;
        require_selection(&self.course_id, "course")?;
        Ok(())
    }

    pub fn submit(&mut self, store: &RelationalStore) -> Result<Registration, FormError> {
        self.validate()?;
        let course_id = require_selection(&self.course_id, "course")?;
        let registration = store.create_registration(self.student_name.clone(), course_id)?;
        *self = Self::default();
        Ok(registration)
    }
}
