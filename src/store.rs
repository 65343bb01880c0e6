// 🗄️ Relational Store - sole owner of the three collections
//
// CourseType ← Course ← Registration
//
// Rules:
// - Collections only grow. There is no update or delete path.
// - Insertion order is the iteration order.
// - A create call checks its foreign key and appends under ONE write lock,
//   so concurrent handles can never observe or produce a dangling reference.
//
// Cloning a store clones the handle, not the data: every clone sees the same
// collections.

use crate::config::{NamePolicy, StoreConfig};
use crate::entities::{Course, CourseType, EntityKind, Registration};
use crate::error::{Result, StoreError};
use crate::views::{CourseView, RegistrationView, Resolved, StoreStats};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// TABLE
// ============================================================================

/// Ordered mapping from id to entity
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Table {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn append(&mut self, id: String, row: T) {
        debug_assert!(!self.index.contains_key(&id), "duplicate id {}", id);
        self.index.insert(id, self.rows.len());
        self.rows.push(row);
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn snapshot(&self) -> Vec<T> {
        self.rows.clone()
    }
}

#[derive(Debug)]
struct Collections {
    course_types: Table<CourseType>,
    courses: Table<Course>,
    registrations: Table<Registration>,
}

impl Collections {
    fn new() -> Self {
        Collections {
            course_types: Table::new(),
            courses: Table::new(),
            registrations: Table::new(),
        }
    }

    fn course_view(&self, course: &Course) -> CourseView {
        let resolved_type: Resolved<CourseType> =
            self.course_types.get(&course.type_id).cloned().into();

        if !resolved_type.is_found() {
            tracing::warn!(
                course_id = %course.id,
                type_id = %course.type_id,
                "course references a missing course type"
            );
        }

        CourseView {
            course: course.clone(),
            resolved_type,
        }
    }

    fn registration_view(&self, registration: &Registration) -> RegistrationView {
        let Some(course) = self.courses.get(&registration.course_id) else {
            tracing::warn!(
                registration_id = %registration.id,
                course_id = %registration.course_id,
                "registration references a missing course"
            );
            return RegistrationView {
                registration: registration.clone(),
                course: Resolved::NotFound,
                course_type: Resolved::NotFound,
            };
        };

        let CourseView {
            course,
            resolved_type,
        } = self.course_view(course);

        RegistrationView {
            registration: registration.clone(),
            course: Resolved::Found(course),
            course_type: resolved_type,
        }
    }
}

// ============================================================================
// COURSE FILTER
// ============================================================================

/// Optional restriction for `list_courses`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub type_id: Option<String>,
}

impl CourseFilter {
    /// No restriction
    pub fn all() -> Self {
        CourseFilter::default()
    }

    /// Only courses of the given type
    pub fn by_type(type_id: impl Into<String>) -> Self {
        CourseFilter {
            type_id: Some(type_id.into()),
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        match &self.type_id {
            Some(type_id) => course.is_of_type(type_id),
            None => true,
        }
    }
}

// ============================================================================
// RELATIONAL STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RelationalStore {
    collections: Arc<RwLock<Collections>>,
    config: StoreConfig,
}

impl RelationalStore {
    /// Create new empty store with the default (strict) name policy
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        RelationalStore {
            collections: Arc::new(RwLock::new(Collections::new())),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Collections are append-only, so a writer that panicked cannot have
    // left a half-applied row behind; recovering the guard is sound.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check_name(&self, entity: EntityKind, name: &str) -> Result<()> {
        if self.config.name_policy == NamePolicy::Strict && name.trim().is_empty() {
            tracing::warn!(%entity, "rejected empty name");
            return Err(StoreError::EmptyName { entity });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Create a course type. Fails only on a blank name under the strict policy.
    pub fn create_course_type(&self, name: impl Into<String>) -> Result<CourseType> {
        let name = name.into();
        self.check_name(EntityKind::CourseType, &name)?;

        let course_type = CourseType::new(name);
        self.write()
            .course_types
            .append(course_type.id.clone(), course_type.clone());

        tracing::debug!(id = %course_type.id, name = %course_type.name, "created course type");
        Ok(course_type)
    }

    /// Create a course under an existing course type
    ///
    /// Returns `StoreError::Reference` if `type_id` is unknown; the course
    /// collection is left untouched in that case.
    pub fn create_course(&self, name: impl Into<String>, type_id: &str) -> Result<Course> {
        let name = name.into();
        self.check_name(EntityKind::Course, &name)?;

        let mut collections = self.write();
        if !collections.course_types.contains(type_id) {
            tracing::warn!(type_id, "rejected course with unknown course type");
            return Err(StoreError::Reference {
                entity: EntityKind::CourseType,
                id: type_id.to_string(),
            });
        }

        let course = Course::new(name, type_id);
        collections
            .courses
            .append(course.id.clone(), course.clone());
        drop(collections);

        tracing::debug!(id = %course.id, name = %course.name, type_id, "created course");
        Ok(course)
    }

    /// Register a student for an existing course
    pub fn create_registration(
        &self,
        student_name: impl Into<String>,
        course_id: &str,
    ) -> Result<Registration> {
        let student_name = student_name.into();
        self.check_name(EntityKind::Registration, &student_name)?;

        let mut collections = self.write();
        if !collections.courses.contains(course_id) {
            tracing::warn!(course_id, "rejected registration for unknown course");
            return Err(StoreError::Reference {
                entity: EntityKind::Course,
                id: course_id.to_string(),
            });
        }

        let registration = Registration::new(student_name, course_id);
        collections
            .registrations
            .append(registration.id.clone(), registration.clone());
        drop(collections);

        tracing::debug!(id = %registration.id, course_id, "created registration");
        Ok(registration)
    }

    // ------------------------------------------------------------------------
    // Queries (all return snapshots)
    // ------------------------------------------------------------------------

    /// All course types in insertion order
    pub fn list_course_types(&self) -> Vec<CourseType> {
        self.read().course_types.snapshot()
    }

    /// Courses in insertion order, optionally restricted to one type
    ///
    /// An unknown type id simply matches nothing.
    pub fn list_courses(&self, filter: &CourseFilter) -> Vec<Course> {
        self.read()
            .courses
            .rows
            .iter()
            .filter(|course| filter.matches(course))
            .cloned()
            .collect()
    }

    /// All registrations in insertion order
    pub fn list_registrations(&self) -> Vec<Registration> {
        self.read().registrations.snapshot()
    }

    /// Find course type by UUID
    pub fn resolve_course_type(&self, id: &str) -> Option<CourseType> {
        self.read().course_types.get(id).cloned()
    }

    /// Find course by UUID
    pub fn resolve_course(&self, id: &str) -> Option<Course> {
        self.read().courses.get(id).cloned()
    }

    /// Every course paired with its resolved type
    pub fn joined_course_view(&self) -> Vec<CourseView> {
        let collections = self.read();
        collections
            .courses
            .rows
            .iter()
            .map(|course| collections.course_view(course))
            .collect()
    }

    /// Courses of one type, paired with their resolved type
    pub fn joined_course_view_filtered(&self, filter: &CourseFilter) -> Vec<CourseView> {
        let collections = self.read();
        collections
            .courses
            .rows
            .iter()
            .filter(|course| filter.matches(course))
            .map(|course| collections.course_view(course))
            .collect()
    }

    /// Every registration fully denormalized (registration, course, type)
    pub fn joined_registration_view(&self) -> Vec<RegistrationView> {
        let collections = self.read();
        collections
            .registrations
            .rows
            .iter()
            .map(|registration| collections.registration_view(registration))
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        let collections = self.read();
        StoreStats {
            course_types: collections.course_types.len(),
            courses: collections.courses.len(),
            registrations: collections.registrations.len(),
        }
    }

    /// Append rows without any reference check, to simulate a corrupted store
    #[cfg(test)]
    pub(crate) fn insert_unchecked(
        &self,
        courses: Vec<Course>,
        registrations: Vec<Registration>,
    ) {
        let mut collections = self.write();
        for course in courses {
            collections.courses.append(course.id.clone(), course);
        }
        for registration in registrations {
            collections
                .registrations
                .append(registration.id.clone(), registration);
        }
    }
}

impl Default for RelationalStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded() -> (RelationalStore, CourseType, Course) {
        let store = RelationalStore::new();
        let science = store.create_course_type("Science").unwrap();
        let physics = store.create_course("Physics 101", &science.id).unwrap();
        (store, science, physics)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RelationalStore::new();

        assert!(store.list_course_types().is_empty());
        assert!(store.list_courses(&CourseFilter::all()).is_empty());
        assert!(store.list_registrations().is_empty());
        assert!(store.joined_course_view().is_empty());
        assert!(store.joined_registration_view().is_empty());
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[test]
    fn test_concrete_scenario() {
        let store = RelationalStore::new();

        // 1
        let t1 = store.create_course_type("Science").unwrap();

        // 2
        let c1 = store.create_course("Physics 101", &t1.id).unwrap();
        assert_eq!(store.list_courses(&CourseFilter::all()), vec![c1.clone()]);
        assert_eq!(
            store.joined_course_view(),
            vec![CourseView {
                course: c1.clone(),
                resolved_type: Resolved::Found(t1.clone()),
            }]
        );

        // 3
        let r1 = store.create_registration("Alice", &c1.id).unwrap();
        assert_eq!(
            store.joined_registration_view(),
            vec![RegistrationView {
                registration: r1,
                course: Resolved::Found(c1.clone()),
                course_type: Resolved::Found(t1.clone()),
            }]
        );

        // 4
        let err = store
            .create_course("Bad Course", "nonexistent-id")
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Reference {
                entity: EntityKind::CourseType,
                id: "nonexistent-id".to_string(),
            }
        );
        assert_eq!(store.list_courses(&CourseFilter::all()), vec![c1.clone()]);

        // 5
        let t2 = store.create_course_type("Math").unwrap();
        let c2 = store.create_course("Algebra", &t2.id).unwrap();
        assert_eq!(store.list_courses(&CourseFilter::by_type(&t1.id)), vec![c1]);
        assert_eq!(store.list_courses(&CourseFilter::by_type(&t2.id)), vec![c2]);
    }

    #[test]
    fn test_create_course_type_returns_usable_id() {
        let store = RelationalStore::new();
        let science = store.create_course_type("Science").unwrap();

        assert_eq!(store.resolve_course_type(&science.id), Some(science.clone()));
        assert!(store.create_course("Physics 101", &science.id).is_ok());
    }

    #[test]
    fn test_ids_unique_within_collection() {
        let store = RelationalStore::new();
        let mut type_ids = HashSet::new();
        let mut course_ids = HashSet::new();
        let mut registration_ids = HashSet::new();

        for i in 0..20 {
            let course_type = store.create_course_type(format!("Type {}", i)).unwrap();
            assert!(type_ids.insert(course_type.id.clone()));

            let course = store
                .create_course(format!("Course {}", i), &course_type.id)
                .unwrap();
            assert!(course_ids.insert(course.id.clone()));

            let registration = store
                .create_registration(format!("Student {}", i), &course.id)
                .unwrap();
            assert!(registration_ids.insert(registration.id));
        }

        assert_eq!(store.stats().course_types, 20);
        assert_eq!(store.stats().courses, 20);
        assert_eq!(store.stats().registrations, 20);
    }

    #[test]
    fn test_order_preserved_across_interleaving() {
        let store = RelationalStore::new();

        let a = store.create_course_type("A").unwrap();
        let a1 = store.create_course("A1", &a.id).unwrap();
        let b = store.create_course_type("B").unwrap();
        let r1 = store.create_registration("Zoe", &a1.id).unwrap();
        let b1 = store.create_course("B1", &b.id).unwrap();
        let a2 = store.create_course("A2", &a.id).unwrap();
        let c = store.create_course_type("C").unwrap();
        let r2 = store.create_registration("Adam", &b1.id).unwrap();
        let r3 = store.create_registration("Mia", &a1.id).unwrap();

        assert_eq!(store.list_course_types(), vec![a, b, c]);
        assert_eq!(
            store.list_courses(&CourseFilter::all()),
            vec![a1, b1, a2]
        );
        assert_eq!(store.list_registrations(), vec![r1, r2, r3]);
    }

    #[test]
    fn test_filter_is_ordered_subset() {
        let store = RelationalStore::new();
        let science = store.create_course_type("Science").unwrap();
        let math = store.create_course_type("Math").unwrap();

        store.create_course("Physics", &science.id).unwrap();
        store.create_course("Algebra", &math.id).unwrap();
        store.create_course("Chemistry", &science.id).unwrap();
        store.create_course("Geometry", &math.id).unwrap();

        for type_id in [&science.id, &math.id] {
            let expected: Vec<Course> = store
                .list_courses(&CourseFilter::all())
                .into_iter()
                .filter(|c| &c.type_id == type_id)
                .collect();
            assert_eq!(store.list_courses(&CourseFilter::by_type(type_id)), expected);
        }

        let names: Vec<String> = store
            .list_courses(&CourseFilter::by_type(&science.id))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Physics", "Chemistry"]);
    }

    #[test]
    fn test_filter_with_no_matches_is_empty() {
        let (store, _, _) = seeded();
        let empty_type = store.create_course_type("Art").unwrap();

        assert!(store
            .list_courses(&CourseFilter::by_type(&empty_type.id))
            .is_empty());
        assert!(store
            .list_courses(&CourseFilter::by_type("nonexistent-id"))
            .is_empty());
    }

    #[test]
    fn test_dangling_registration_rejected() {
        let (store, _, physics) = seeded();
        store.create_registration("Alice", &physics.id).unwrap();

        let err = store
            .create_registration("Bob", "nonexistent-id")
            .unwrap_err();

        assert!(err.is_reference());
        assert_eq!(
            err,
            StoreError::Reference {
                entity: EntityKind::Course,
                id: "nonexistent-id".to_string(),
            }
        );
        assert_eq!(store.list_registrations().len(), 1);
    }

    #[test]
    fn test_course_type_id_is_not_a_course_id() {
        let (store, science, _) = seeded();

        // ids are only unique per collection; a type id never resolves as a course
        assert!(store.create_registration("Alice", &science.id).is_err());
    }

    #[test]
    fn test_references_valid_after_every_operation() {
        let store = RelationalStore::new();

        let check = |store: &RelationalStore| {
            for course in store.list_courses(&CourseFilter::all()) {
                assert!(store.resolve_course_type(&course.type_id).is_some());
            }
            for registration in store.list_registrations() {
                assert!(store.resolve_course(&registration.course_id).is_some());
            }
        };

        let science = store.create_course_type("Science").unwrap();
        check(&store);
        let physics = store.create_course("Physics", &science.id).unwrap();
        check(&store);
        let _ = store.create_course("Ghost", "missing");
        check(&store);
        store.create_registration("Alice", &physics.id).unwrap();
        check(&store);
        let _ = store.create_registration("Bob", "missing");
        check(&store);
    }

    #[test]
    fn test_strict_policy_rejects_blank_names() {
        let (store, science, physics) = seeded();

        assert_eq!(
            store.create_course_type("   ").unwrap_err(),
            StoreError::EmptyName {
                entity: EntityKind::CourseType
            }
        );
        assert_eq!(
            store.create_course("", &science.id).unwrap_err(),
            StoreError::EmptyName {
                entity: EntityKind::Course
            }
        );
        assert_eq!(
            store.create_registration("\t\n", &physics.id).unwrap_err(),
            StoreError::EmptyName {
                entity: EntityKind::Registration
            }
        );

        assert_eq!(store.stats().course_types, 1);
        assert_eq!(store.stats().courses, 1);
        assert_eq!(store.stats().registrations, 0);
    }

    #[test]
    fn test_permissive_policy_accepts_blank_names() {
        let store = RelationalStore::with_config(StoreConfig {
            name_policy: NamePolicy::Permissive,
        });

        let blank = store.create_course_type("").unwrap();
        let course = store.create_course("  ", &blank.id).unwrap();
        store.create_registration("", &course.id).unwrap();

        assert_eq!(store.stats().registrations, 1);
    }

    #[test]
    fn test_names_stored_as_given() {
        let store = RelationalStore::new();
        let padded = store.create_course_type("  Science ").unwrap();

        assert_eq!(padded.name, "  Science ");
        assert_eq!(store.list_course_types()[0].name, "  Science ");
    }

    #[test]
    fn test_reference_checked_before_blank_name_under_permissive() {
        let store = RelationalStore::with_config(StoreConfig {
            name_policy: NamePolicy::Permissive,
        });

        assert!(store.create_course("", "missing").unwrap_err().is_reference());
    }

    #[test]
    fn test_snapshots_are_detached() {
        let (store, science, _) = seeded();
        let before = store.list_courses(&CourseFilter::all());

        store.create_course("Chemistry", &science.id).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(store.list_courses(&CourseFilter::all()).len(), 2);
    }

    #[test]
    fn test_clones_share_collections() {
        let store = RelationalStore::new();
        let handle = store.clone();

        let science = handle.create_course_type("Science").unwrap();

        assert_eq!(store.list_course_types(), vec![science]);
    }

    #[test]
    fn test_resolve_unknown_ids() {
        let (store, science, physics) = seeded();

        assert!(store.resolve_course_type("missing").is_none());
        assert!(store.resolve_course("missing").is_none());
        // lookups are per collection
        assert!(store.resolve_course(&science.id).is_none());
        assert!(store.resolve_course_type(&physics.id).is_none());
    }

    #[test]
    fn test_joined_course_view_not_found_sentinel() {
        let (store, science, physics) = seeded();
        let orphan = Course::new("Orphan", "missing-type");
        store.insert_unchecked(vec![orphan.clone()], vec![]);

        let views = store.joined_course_view();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].course, physics);
        assert_eq!(views[0].resolved_type, Resolved::Found(science));
        assert_eq!(views[1].course, orphan);
        assert_eq!(views[1].resolved_type, Resolved::NotFound);
        assert_eq!(views[1].label(), "Orphan (No Type)");
    }

    #[test]
    fn test_joined_registration_view_not_found_sentinel() {
        let (store, _, physics) = seeded();
        let orphan_course = Course::new("Orphan", "missing-type");
        let via_orphan = Registration::new("Bob", orphan_course.id.clone());
        let dangling = Registration::new("Carol", "missing-course");
        store.insert_unchecked(vec![orphan_course.clone()], vec![via_orphan, dangling]);
        store.create_registration("Alice", &physics.id).unwrap();

        let views = store.joined_registration_view();
        assert_eq!(views.len(), 3);

        assert_eq!(views[0].course, Resolved::Found(orphan_course));
        assert_eq!(views[0].course_type, Resolved::NotFound);

        assert_eq!(views[1].course, Resolved::NotFound);
        assert_eq!(views[1].course_type, Resolved::NotFound);
        assert_eq!(views[1].label(), "Carol - Unknown Course (No Type)");

        assert_eq!(views[2].label(), "Alice - Physics 101 (Science)");
    }

    #[test]
    fn test_joined_course_view_filtered() {
        let (store, science, physics) = seeded();
        let math = store.create_course_type("Math").unwrap();
        store.create_course("Algebra", &math.id).unwrap();

        let views = store.joined_course_view_filtered(&CourseFilter::by_type(&science.id));

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].course, physics);
        assert_eq!(views[0].label(), "Physics 101 (Science)");
    }

    #[test]
    fn test_concurrent_creates_keep_integrity() {
        let store = RelationalStore::new();
        let science = store.create_course_type("Science").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let type_id = science.id.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        let course = store
                            .create_course(format!("Course {}-{}", i, j), &type_id)
                            .unwrap();
                        store
                            .create_registration(format!("Student {}-{}", i, j), &course.id)
                            .unwrap();
                        assert!(store.create_course("Bad", "missing").is_err());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = store.stats();
        assert_eq!(stats.courses, 200);
        assert_eq!(stats.registrations, 200);

        let ids: HashSet<String> = store
            .list_courses(&CourseFilter::all())
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids.len(), 200);
        assert!(store
            .joined_registration_view()
            .iter()
            .all(|view| view.course_type.is_found()));
    }
}
