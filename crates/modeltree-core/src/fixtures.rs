//! Sample schemas for tests, benches and the CLI demo mode.

use crate::catalog::{EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle};

/// A small company schema.
///
/// ```text
/// Office <-- Employee --> Title        Employee --> Employee (manager)
///              ^   ^
///   employees  |   |  attendees
///           Project <-- Meeting --> Office
///                          ^
///          NonUniqueModelName (tests, core)
/// ```
///
/// `Project.manager_id` is a plain column with no declared relation. The
/// `Disconnected*` models hide their reverse accessors, and `A`/`B` form a
/// cluster unreachable from the rest.
pub fn company_schema() -> SchemaBundle {
    let office = EntityDef::new("tests", "Office")
        .with_field(FieldDef::new("id", ScalarType::Int64))
        .with_field(FieldDef::new("location", ScalarType::String));

    let title = EntityDef::new("tests", "Title")
        .with_field(FieldDef::new("id", ScalarType::Int64))
        .with_field(FieldDef::new("name", ScalarType::String))
        .with_field(FieldDef::new("salary", ScalarType::Decimal));

    let employee = EntityDef::new("tests", "Employee").with_fields([
        FieldDef::new("id", ScalarType::Int64),
        FieldDef::new("first_name", ScalarType::String).with_column("firstName"),
        FieldDef::new("last_name", ScalarType::String),
        FieldDef::new("title_id", ScalarType::Int64),
        FieldDef::new("office_id", ScalarType::Int64),
        FieldDef::optional("manager_id", ScalarType::Int64),
    ]);

    let project = EntityDef::new("tests", "Project").with_fields([
        FieldDef::new("id", ScalarType::Int64),
        FieldDef::new("name", ScalarType::String),
        FieldDef::optional("manager_id", ScalarType::Int64),
        FieldDef::new("due_date", ScalarType::Date),
    ]);

    let meeting = EntityDef::new("tests", "Meeting").with_fields([
        FieldDef::new("id", ScalarType::Int64),
        FieldDef::optional("project_id", ScalarType::Int64),
        FieldDef::new("office_id", ScalarType::Int64),
        FieldDef::new("start_time", ScalarType::Timestamp),
        FieldDef::new("end_time", ScalarType::Timestamp),
    ]);

    let mut schema = SchemaBundle::new()
        .with_entity(office)
        .with_entity(title)
        .with_entity(employee)
        .with_entity(project)
        .with_entity(meeting);

    for app in ["tests", "core"] {
        for name in ["NonUniqueModelName", "DisconnectedNonUniqueModelName"] {
            schema = schema.with_entity(
                EntityDef::new(app, name)
                    .with_field(FieldDef::new("id", ScalarType::Int64))
                    .with_field(FieldDef::new("meeting_id", ScalarType::Int64)),
            );
        }
    }

    schema
        .with_entity(EntityDef::new("tests", "A").with_field(FieldDef::new("id", ScalarType::Int64)))
        .with_entity(
            EntityDef::new("tests", "B")
                .with_field(FieldDef::new("id", ScalarType::Int64))
                .with_field(FieldDef::new("a_id", ScalarType::Int64)),
        )
        .with_relation(RelationDef::many_to_one("title", "tests.Employee", "tests.Title"))
        .with_relation(RelationDef::many_to_one("office", "tests.Employee", "tests.Office"))
        .with_relation(
            RelationDef::many_to_one("manager", "tests.Employee", "tests.Employee")
                .nullable()
                .with_related_name("reports"),
        )
        .with_relation(RelationDef::many_to_many(
            "employees",
            "tests.Project",
            "tests.Employee",
        ))
        .with_relation(
            RelationDef::many_to_one("project", "tests.Meeting", "tests.Project").nullable(),
        )
        .with_relation(RelationDef::many_to_one("office", "tests.Meeting", "tests.Office"))
        .with_relation(RelationDef::many_to_many(
            "attendees",
            "tests.Meeting",
            "tests.Employee",
        ))
        .with_relation(RelationDef::many_to_one(
            "meeting",
            "tests.NonUniqueModelName",
            "tests.Meeting",
        ))
        .with_relation(
            RelationDef::many_to_one(
                "meeting",
                "tests.DisconnectedNonUniqueModelName",
                "tests.Meeting",
            )
            .without_reverse(),
        )
        .with_relation(
            RelationDef::many_to_one("meeting", "core.NonUniqueModelName", "tests.Meeting")
                .with_related_name("core_nonuniquemodelname"),
        )
        .with_relation(
            RelationDef::many_to_one(
                "meeting",
                "core.DisconnectedNonUniqueModelName",
                "tests.Meeting",
            )
            .without_reverse(),
        )
        .with_relation(RelationDef::many_to_one("a", "tests.B", "tests.A"))
}
