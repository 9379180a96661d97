//! Integration tests for tree lookups and query fragment emission.

use std::sync::Arc;

use modeltree_core::fixtures::company_schema;
use modeltree_core::{Error, FieldRef, JoinType, ModelTree, SchemaSource, TreeBuilder};
use pretty_assertions::assert_eq;

struct Trees {
    office: ModelTree,
    title: ModelTree,
    employee: ModelTree,
    project: ModelTree,
    meeting: ModelTree,
}

impl Trees {
    fn new() -> Self {
        let schema: Arc<dyn SchemaSource> = Arc::new(company_schema());
        let build = |root: &str| {
            TreeBuilder::new(schema.clone())
                .root(root)
                .build()
                .unwrap()
        };
        Self {
            office: build("tests.Office"),
            title: build("tests.Title"),
            employee: build("tests.Employee"),
            project: build("tests.Project"),
            meeting: build("tests.Meeting"),
        }
    }

    fn all(&self) -> [&ModelTree; 5] {
        [
            &self.office,
            &self.title,
            &self.employee,
            &self.project,
            &self.meeting,
        ]
    }
}

/// `[location, salary, name, start_time]`, resolved against the office tree.
fn sample_fields(tree: &ModelTree) -> [FieldRef<'_>; 4] {
    [
        tree.get_field("location", "tests.Office").unwrap(),
        tree.get_field("salary", "tests.Title").unwrap(),
        tree.get_field("name", "tests.Project").unwrap(),
        tree.get_field("start_time", "tests.Meeting").unwrap(),
    ]
}

fn query_strings(tree: &ModelTree, fields: &[FieldRef<'_>]) -> Vec<String> {
    fields
        .iter()
        .map(|f| tree.query_string_for_field(f).unwrap())
        .collect()
}

fn joins_sql(tree: &ModelTree, entity: &str) -> String {
    tree.add_joins(entity).unwrap().0.to_string()
}

#[test]
fn test_get_model() {
    let trees = Trees::new();

    let employee = trees.employee.get_model("tests.Employee", false).unwrap();
    assert_eq!(employee.label(), "tests.Employee");
    let employee = trees.employee.get_model(("tests", "employee"), true).unwrap();
    assert_eq!(employee.label(), "tests.Employee");
}

#[test]
fn test_query_string_for_field() {
    let trees = Trees::new();
    let fields = sample_fields(&trees.office);

    assert_eq!(
        query_strings(&trees.office, &fields),
        vec![
            "location",
            "employee__title__salary",
            "employee__project__name",
            "meeting__start_time"
        ]
    );
    assert_eq!(
        query_strings(&trees.title, &fields),
        vec![
            "employee__office__location",
            "salary",
            "employee__project__name",
            "employee__meeting__start_time"
        ]
    );
    assert_eq!(
        query_strings(&trees.employee, &fields),
        vec![
            "office__location",
            "title__salary",
            "project__name",
            "meeting__start_time"
        ]
    );
    assert_eq!(
        query_strings(&trees.project, &fields),
        vec![
            "meeting__office__location",
            "employees__title__salary",
            "name",
            "meeting__start_time"
        ]
    );
    assert_eq!(
        query_strings(&trees.meeting, &fields),
        vec![
            "office__location",
            "attendees__title__salary",
            "project__name",
            "start_time"
        ]
    );
}

#[test]
fn test_lookup_for_field() {
    let trees = Trees::new();
    let salary = trees.office.get_field("salary", "title").unwrap();

    assert_eq!(
        trees.office.lookup_for_field(&salary, "gte").unwrap(),
        "employee__title__salary__gte"
    );
}

#[test]
fn test_office_joins() {
    let trees = Trees::new();
    let select = r#"SELECT "tests_office"."id", "tests_office"."location" FROM "tests_office""#;

    assert_eq!(
        joins_sql(&trees.office, "tests.Title"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_office\".\"id\" = \"tests_employee\".\"office_id\") \
             LEFT OUTER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.office, "tests.Employee"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_office\".\"id\" = \"tests_employee\".\"office_id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.office, "tests.Project"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_office\".\"id\" = \"tests_employee\".\"office_id\") \
             LEFT OUTER JOIN \"tests_project_employees\" ON (\"tests_employee\".\"id\" = \"tests_project_employees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_project_employees\".\"project_id\" = \"tests_project\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.office, "tests.Meeting"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_meeting\" ON (\"tests_office\".\"id\" = \"tests_meeting\".\"office_id\")"
        )
    );
}

#[test]
fn test_title_joins() {
    let trees = Trees::new();
    let select = r#"SELECT "tests_title"."id", "tests_title"."name", "tests_title"."salary" FROM "tests_title""#;
    let employee = "LEFT OUTER JOIN \"tests_employee\" ON (\"tests_title\".\"id\" = \"tests_employee\".\"title_id\")";

    assert_eq!(
        joins_sql(&trees.title, "tests.Office"),
        format!(
            "{select} {employee} \
             LEFT OUTER JOIN \"tests_office\" ON (\"tests_employee\".\"office_id\" = \"tests_office\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.title, "tests.Employee"),
        format!("{select} {employee}")
    );
    assert_eq!(
        joins_sql(&trees.title, "tests.Meeting"),
        format!(
            "{select} {employee} \
             LEFT OUTER JOIN \"tests_meeting_attendees\" ON (\"tests_employee\".\"id\" = \"tests_meeting_attendees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_meeting\" ON (\"tests_meeting_attendees\".\"meeting_id\" = \"tests_meeting\".\"id\")"
        )
    );
}

#[test]
fn test_employee_joins() {
    let trees = Trees::new();
    let select = r#"SELECT "tests_employee"."id", "tests_employee"."firstName", "tests_employee"."last_name", "tests_employee"."title_id", "tests_employee"."office_id", "tests_employee"."manager_id" FROM "tests_employee""#;

    assert_eq!(
        joins_sql(&trees.employee, "tests.Title"),
        format!(
            "{select} \
             INNER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.employee, "tests.Office"),
        format!(
            "{select} \
             INNER JOIN \"tests_office\" ON (\"tests_employee\".\"office_id\" = \"tests_office\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.employee, "tests.Project"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_project_employees\" ON (\"tests_employee\".\"id\" = \"tests_project_employees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_project_employees\".\"project_id\" = \"tests_project\".\"id\")"
        )
    );
}

#[test]
fn test_project_joins() {
    let trees = Trees::new();
    let select = r#"SELECT "tests_project"."id", "tests_project"."name", "tests_project"."manager_id", "tests_project"."due_date" FROM "tests_project""#;

    assert_eq!(
        joins_sql(&trees.project, "tests.Title"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_project_employees\" ON (\"tests_project\".\"id\" = \"tests_project_employees\".\"project_id\") \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_project_employees\".\"employee_id\" = \"tests_employee\".\"id\") \
             LEFT OUTER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.project, "tests.Meeting"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_meeting\" ON (\"tests_project\".\"id\" = \"tests_meeting\".\"project_id\")"
        )
    );
}

#[test]
fn test_meeting_joins() {
    let trees = Trees::new();
    let select = r#"SELECT "tests_meeting"."id", "tests_meeting"."project_id", "tests_meeting"."office_id", "tests_meeting"."start_time", "tests_meeting"."end_time" FROM "tests_meeting""#;

    assert_eq!(
        joins_sql(&trees.meeting, "tests.Title"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_meeting_attendees\" ON (\"tests_meeting\".\"id\" = \"tests_meeting_attendees\".\"meeting_id\") \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_meeting_attendees\".\"employee_id\" = \"tests_employee\".\"id\") \
             LEFT OUTER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.meeting, "tests.Office"),
        format!(
            "{select} \
             INNER JOIN \"tests_office\" ON (\"tests_meeting\".\"office_id\" = \"tests_office\".\"id\")"
        )
    );
    assert_eq!(
        joins_sql(&trees.meeting, "tests.Project"),
        format!(
            "{select} \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_meeting\".\"project_id\" = \"tests_project\".\"id\")"
        )
    );
}

#[test]
fn test_add_select() {
    let trees = Trees::new();
    let fields = sample_fields(&trees.office);
    let columns = r#""tests_office"."location", "tests_title"."salary", "tests_project"."name", "tests_meeting"."start_time""#;

    assert_eq!(
        trees.office.add_select(&fields).unwrap().to_string(),
        format!(
            "SELECT \"tests_office\".\"id\", {columns} FROM \"tests_office\" \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_office\".\"id\" = \"tests_employee\".\"office_id\") \
             LEFT OUTER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\") \
             LEFT OUTER JOIN \"tests_project_employees\" ON (\"tests_employee\".\"id\" = \"tests_project_employees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_project_employees\".\"project_id\" = \"tests_project\".\"id\") \
             LEFT OUTER JOIN \"tests_meeting\" ON (\"tests_office\".\"id\" = \"tests_meeting\".\"office_id\")"
        )
    );

    assert_eq!(
        trees.employee.add_select(&fields).unwrap().to_string(),
        format!(
            "SELECT \"tests_employee\".\"id\", {columns} FROM \"tests_employee\" \
             INNER JOIN \"tests_office\" ON (\"tests_employee\".\"office_id\" = \"tests_office\".\"id\") \
             INNER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\") \
             LEFT OUTER JOIN \"tests_project_employees\" ON (\"tests_employee\".\"id\" = \"tests_project_employees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_project_employees\".\"project_id\" = \"tests_project\".\"id\") \
             LEFT OUTER JOIN \"tests_meeting_attendees\" ON (\"tests_employee\".\"id\" = \"tests_meeting_attendees\".\"employee_id\") \
             LEFT OUTER JOIN \"tests_meeting\" ON (\"tests_meeting_attendees\".\"meeting_id\" = \"tests_meeting\".\"id\")"
        )
    );

    assert_eq!(
        trees.meeting.add_select(&fields).unwrap().to_string(),
        format!(
            "SELECT \"tests_meeting\".\"id\", {columns} FROM \"tests_meeting\" \
             INNER JOIN \"tests_office\" ON (\"tests_meeting\".\"office_id\" = \"tests_office\".\"id\") \
             LEFT OUTER JOIN \"tests_meeting_attendees\" ON (\"tests_meeting\".\"id\" = \"tests_meeting_attendees\".\"meeting_id\") \
             LEFT OUTER JOIN \"tests_employee\" ON (\"tests_meeting_attendees\".\"employee_id\" = \"tests_employee\".\"id\") \
             LEFT OUTER JOIN \"tests_title\" ON (\"tests_employee\".\"title_id\" = \"tests_title\".\"id\") \
             LEFT OUTER JOIN \"tests_project\" ON (\"tests_meeting\".\"project_id\" = \"tests_project\".\"id\")"
        )
    );
}

#[test]
fn test_add_select_projection_order() {
    let trees = Trees::new();
    let fields = sample_fields(&trees.office);

    let query = trees.title.add_select(&fields).unwrap();
    let projection: Vec<_> = query
        .projection()
        .iter()
        .map(|c| format!("{}.{}", c.alias, c.column))
        .collect();

    assert_eq!(
        projection,
        vec![
            "tests_title.id",
            "tests_office.location",
            "tests_title.salary",
            "tests_project.name",
            "tests_meeting.start_time"
        ]
    );
}

#[test]
fn test_add_joins_reuses_shared_prefix() {
    let trees = Trees::new();
    let mut builder = trees.office.fragment_builder();

    builder.add_joins("tests.Title").unwrap();
    builder.add_joins("tests.Title").unwrap();
    builder.add_joins("tests.Project").unwrap();

    let tables: Vec<_> = builder
        .query()
        .joins()
        .iter()
        .map(|j| j.table.as_str())
        .collect();
    assert_eq!(
        tables,
        vec![
            "tests_employee",
            "tests_title",
            "tests_project_employees",
            "tests_project"
        ]
    );
}

#[test]
fn test_query_strings_and_joins_follow_same_path() {
    let trees = Trees::new();

    for tree in trees.all() {
        for node in tree.nodes() {
            let (query, _) = tree.add_joins(&node.entity).unwrap();
            let path = tree.path_of(node);
            let expected: Vec<String> = path
                .iter()
                .flat_map(|edge| edge.steps())
                .map(|step| step.table)
                .collect();
            let actual: Vec<String> = query.joins().iter().map(|j| j.table.clone()).collect();
            assert_eq!(actual, expected);

            let accessors: Vec<&str> = path.iter().map(|e| e.accessor.as_str()).collect();
            assert_eq!(tree.query_string_of(node), accessors.join("__"));
        }
    }
}

#[test]
fn test_join_type_promotion() {
    let trees = Trees::new();

    // Meeting -> attendees (outer) -> title (inner on its own).
    let (query, _) = trees.meeting.add_joins("tests.Title").unwrap();
    assert!(query
        .joins()
        .iter()
        .all(|j| j.join_type == JoinType::LeftOuter));

    let (query, _) = trees.employee.add_joins("tests.Title").unwrap();
    assert_eq!(query.joins()[0].join_type, JoinType::Inner);
}

#[test]
fn test_unrelated_model_errors() {
    let trees = Trees::new();
    let a = trees.office.schema().entity("tests.A").unwrap();

    assert!(matches!(
        trees.office.get_model("tests.A", false),
        Err(Error::ModelNotRelated { .. })
    ));
    assert!(matches!(
        trees.employee.get_model(a, false),
        Err(Error::ModelNotRelated { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("A", false),
        Err(Error::ModelNotRelated { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("NotARealModel", false),
        Err(Error::ModelDoesNotExist(_))
    ));
    assert!(matches!(
        trees.employee.get_model("NonUniqueModelName", false),
        Err(Error::ModelNotUnique { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("NonUniqueModelName", true),
        Err(Error::ModelNotUnique { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("DisconnectedNonUniqueModelName", false),
        Err(Error::ModelNotUnique { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("DisconnectedNonUniqueModelName", true),
        Err(Error::ModelNotRelated { .. })
    ));
}

#[test]
fn test_local_scope_is_not_widened() {
    let trees = Trees::new();

    // Reachable entities named by the reference; nothing outside the tree.
    let local = trees.employee.get_model("core.NonUniqueModelName", true).unwrap();
    assert_eq!(local.app, "core");
    assert!(matches!(
        trees.employee.get_model("tests.DisconnectedNonUniqueModelName", true),
        Err(Error::ModelNotRelated { .. })
    ));
    assert!(matches!(
        trees.employee.get_model("tests.DisconnectedNonUniqueModelName", false),
        Err(Error::ModelNotRelated { .. })
    ));
}

#[test]
fn test_empty_root() {
    let schema: Arc<dyn SchemaSource> = Arc::new(company_schema());

    assert!(matches!(
        TreeBuilder::new(schema.clone()).build(),
        Err(Error::InvalidRoot)
    ));
    assert!(matches!(
        TreeBuilder::new(schema).root("").build(),
        Err(Error::InvalidRoot)
    ));
}
