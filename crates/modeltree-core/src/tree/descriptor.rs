//! Direction-tagged edges derived from declared relations.
//!
//! Outgoing edges of an entity are enumerated in a fixed order:
//! 1. forward many-to-one / one-to-one relations declared on the entity
//! 2. reverse sides of other entities' many-to-one / one-to-one relations
//! 3. many-to-many relations, declared ones before reverse ones
//!
//! Within each group, declaration order of the schema is preserved. Tree
//! building depends on this order to break ties between equal-length paths.

use std::fmt;

use crate::catalog::{Cardinality, EntityDef, RelationDef, SchemaIndex, SchemaSource, Through};
use crate::error::{Error, Result};

/// Which side of the declared relation the edge leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the declaring entity to its target.
    Forward,
    /// From the target back to the declaring entity.
    Reverse,
}

/// SQL join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    LeftOuter,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => f.write_str("INNER JOIN"),
            JoinType::LeftOuter => f.write_str("LEFT OUTER JOIN"),
        }
    }
}

/// A relation as traversed from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Label of the entity the edge leaves from.
    pub source: String,
    /// Label of the entity the edge arrives at.
    pub target: String,
    /// Query-string segment for this hop.
    pub accessor: String,
    /// Name of the declared relation.
    pub relation: String,
    /// Traversal direction relative to the declaration.
    pub direction: Direction,
    /// Cardinality in the traversed direction.
    pub cardinality: Cardinality,
    /// Whether the declared foreign key accepts NULL.
    pub nullable: bool,
    /// Table of the source entity.
    pub source_table: String,
    /// Table of the target entity.
    pub target_table: String,
    /// Joined column on the source side.
    pub source_column: String,
    /// Joined column on the target side.
    pub target_column: String,
    /// Through table, oriented so `source_column` references the source.
    pub through: Option<Through>,
}

/// One physical join produced by an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
    /// Table being joined.
    pub table: String,
    /// Column on the previously joined table.
    pub lhs_column: String,
    /// Column on `table`.
    pub rhs_column: String,
}

impl Edge {
    /// Check if the edge runs against the declaration.
    pub fn is_reverse(&self) -> bool {
        self.direction == Direction::Reverse
    }

    /// Each source row has at most one target row.
    pub fn is_single_valued(&self) -> bool {
        self.direction == Direction::Forward
            && matches!(
                self.cardinality,
                Cardinality::ManyToOne | Cardinality::OneToOne
            )
    }

    /// INNER only when every source row is guaranteed exactly one target row.
    pub fn join_type(&self) -> JoinType {
        if self.is_single_valued() && !self.nullable {
            JoinType::Inner
        } else {
            JoinType::LeftOuter
        }
    }

    /// Check the accessor or declared relation name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.accessor == name || self.relation == name
    }

    /// Physical joins needed to traverse this edge, in order.
    pub fn steps(&self) -> Vec<JoinStep> {
        match &self.through {
            Some(through) => vec![
                JoinStep {
                    table: through.table.clone(),
                    lhs_column: self.source_column.clone(),
                    rhs_column: through.source_column.clone(),
                },
                JoinStep {
                    table: self.target_table.clone(),
                    lhs_column: through.target_column.clone(),
                    rhs_column: self.target_column.clone(),
                },
            ],
            None => vec![JoinStep {
                table: self.target_table.clone(),
                lhs_column: self.source_column.clone(),
                rhs_column: self.target_column.clone(),
            }],
        }
    }
}

/// Enumerate the outgoing edges of `entity` in tie-break order.
pub fn outgoing_edges(schema: &dyn SchemaSource, entity: &EntityDef) -> Result<Vec<Edge>> {
    edges_from(&SchemaIndex::new(schema), entity)
}

/// Same as [`outgoing_edges`], against an index built once per traversal.
pub(crate) fn edges_from(index: &SchemaIndex<'_>, entity: &EntityDef) -> Result<Vec<Edge>> {
    let label = entity.label();
    let declared = index.relations_from(&label);
    let incoming = index.relations_to(&label);
    let mut edges = Vec::new();

    for relation in declared.iter().filter(|r| !r.is_many_to_many()) {
        let target = lookup(index, &relation.to_entity)?;
        edges.push(forward_fk(relation, entity, target));
    }

    for relation in incoming
        .iter()
        .filter(|r| !r.is_many_to_many() && !r.is_reverse_hidden())
    {
        let declaring = lookup(index, &relation.from_entity)?;
        edges.push(reverse_fk(relation, entity, declaring));
    }

    for relation in declared.iter().filter(|r| r.is_many_to_many()) {
        let target = lookup(index, &relation.to_entity)?;
        edges.push(forward_m2m(relation, entity, target));
    }

    for relation in incoming
        .iter()
        .filter(|r| r.is_many_to_many() && !r.is_reverse_hidden())
    {
        let declaring = lookup(index, &relation.from_entity)?;
        edges.push(reverse_m2m(relation, entity, declaring));
    }

    Ok(edges)
}

fn lookup<'s>(index: &SchemaIndex<'s>, label: &str) -> Result<&'s EntityDef> {
    index
        .entity(label)
        .ok_or_else(|| Error::ModelDoesNotExist(label.to_string()))
}

fn reverse_accessor(relation: &RelationDef, declaring: &EntityDef) -> String {
    relation
        .related_name
        .clone()
        .unwrap_or_else(|| declaring.model_name())
}

fn referenced_column(relation: &RelationDef, target: &EntityDef) -> String {
    relation
        .to_field
        .clone()
        .unwrap_or_else(|| target.identity_column().to_string())
}

fn default_through(relation: &RelationDef, declaring: &EntityDef, target: &EntityDef) -> Through {
    let table = format!("{}_{}", declaring.table(), relation.name);
    if declaring.key() == target.key() {
        let name = declaring.model_name();
        Through::new(table, format!("from_{name}_id"), format!("to_{name}_id"))
    } else {
        Through::new(
            table,
            format!("{}_id", declaring.model_name()),
            format!("{}_id", target.model_name()),
        )
    }
}

fn forward_fk(relation: &RelationDef, source: &EntityDef, target: &EntityDef) -> Edge {
    Edge {
        source: source.label(),
        target: target.label(),
        accessor: relation.name.clone(),
        relation: relation.name.clone(),
        direction: Direction::Forward,
        cardinality: relation.cardinality,
        nullable: relation.nullable,
        source_table: source.table(),
        target_table: target.table(),
        source_column: relation.fk_column(),
        target_column: referenced_column(relation, target),
        through: None,
    }
}

fn reverse_fk(relation: &RelationDef, source: &EntityDef, declaring: &EntityDef) -> Edge {
    let cardinality = match relation.cardinality {
        Cardinality::OneToOne => Cardinality::OneToOne,
        _ => Cardinality::OneToMany,
    };
    Edge {
        source: source.label(),
        target: declaring.label(),
        accessor: reverse_accessor(relation, declaring),
        relation: relation.name.clone(),
        direction: Direction::Reverse,
        cardinality,
        nullable: relation.nullable,
        source_table: source.table(),
        target_table: declaring.table(),
        source_column: referenced_column(relation, source),
        target_column: relation.fk_column(),
        through: None,
    }
}

fn forward_m2m(relation: &RelationDef, source: &EntityDef, target: &EntityDef) -> Edge {
    let through = relation
        .through
        .clone()
        .unwrap_or_else(|| default_through(relation, source, target));
    Edge {
        source: source.label(),
        target: target.label(),
        accessor: relation.name.clone(),
        relation: relation.name.clone(),
        direction: Direction::Forward,
        cardinality: Cardinality::ManyToMany,
        nullable: true,
        source_table: source.table(),
        target_table: target.table(),
        source_column: source.identity_column().to_string(),
        target_column: target.identity_column().to_string(),
        through: Some(through),
    }
}

fn reverse_m2m(relation: &RelationDef, source: &EntityDef, declaring: &EntityDef) -> Edge {
    let declared = relation
        .through
        .clone()
        .unwrap_or_else(|| default_through(relation, declaring, source));
    Edge {
        source: source.label(),
        target: declaring.label(),
        accessor: reverse_accessor(relation, declaring),
        relation: relation.name.clone(),
        direction: Direction::Reverse,
        cardinality: Cardinality::ManyToMany,
        nullable: true,
        source_table: source.table(),
        target_table: declaring.table(),
        source_column: source.identity_column().to_string(),
        target_column: declaring.identity_column().to_string(),
        through: Some(Through::new(
            declared.table,
            declared.target_column,
            declared.source_column,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SchemaBundle;
    use crate::fixtures::company_schema;

    fn edges_of(schema: &SchemaBundle, label: &str) -> Vec<Edge> {
        let entity = schema.entity(label).unwrap();
        outgoing_edges(schema, entity).unwrap()
    }

    fn accessors(edges: &[Edge]) -> Vec<&str> {
        edges.iter().map(|e| e.accessor.as_str()).collect()
    }

    #[test]
    fn test_enumeration_order() {
        let schema = company_schema();

        let employee = edges_of(&schema, "tests.Employee");
        assert_eq!(
            accessors(&employee),
            vec!["title", "office", "manager", "reports", "project", "meeting"]
        );

        let meeting = edges_of(&schema, "tests.Meeting");
        assert_eq!(
            accessors(&meeting),
            vec![
                "project",
                "office",
                "nonuniquemodelname",
                "core_nonuniquemodelname",
                "attendees"
            ]
        );
    }

    #[test]
    fn test_hidden_reverse_is_skipped() {
        let schema = company_schema();
        let meeting = edges_of(&schema, "tests.Meeting");

        assert!(!meeting
            .iter()
            .any(|e| e.target.ends_with("DisconnectedNonUniqueModelName")));
    }

    #[test]
    fn test_forward_edge_columns_and_join_type() {
        let schema = company_schema();
        let employee = edges_of(&schema, "tests.Employee");
        let title = &employee[0];

        assert_eq!(title.direction, Direction::Forward);
        assert_eq!(title.cardinality, Cardinality::ManyToOne);
        assert_eq!(title.source_column, "title_id");
        assert_eq!(title.target_column, "id");
        assert!(title.is_single_valued());
        assert_eq!(title.join_type(), JoinType::Inner);

        let manager = &employee[2];
        assert!(manager.nullable);
        assert_eq!(manager.join_type(), JoinType::LeftOuter);
    }

    #[test]
    fn test_reverse_edge() {
        let schema = company_schema();
        let office = edges_of(&schema, "tests.Office");
        let employee = &office[0];

        assert_eq!(employee.accessor, "employee");
        assert!(employee.is_reverse());
        assert_eq!(employee.cardinality, Cardinality::OneToMany);
        assert_eq!(employee.source_column, "id");
        assert_eq!(employee.target_column, "office_id");
        assert_eq!(employee.join_type(), JoinType::LeftOuter);
    }

    #[test]
    fn test_many_to_many_steps() {
        let schema = company_schema();
        let project = edges_of(&schema, "tests.Project");
        let employees = project.iter().find(|e| e.accessor == "employees").unwrap();

        assert_eq!(employees.join_type(), JoinType::LeftOuter);
        assert_eq!(
            employees.steps(),
            vec![
                JoinStep {
                    table: "tests_project_employees".into(),
                    lhs_column: "id".into(),
                    rhs_column: "project_id".into(),
                },
                JoinStep {
                    table: "tests_employee".into(),
                    lhs_column: "employee_id".into(),
                    rhs_column: "id".into(),
                },
            ]
        );

        let employee = edges_of(&schema, "tests.Employee");
        let project = employee.iter().find(|e| e.accessor == "project").unwrap();
        let steps = project.steps();
        assert_eq!(steps[0].rhs_column, "employee_id");
        assert_eq!(steps[1].lhs_column, "project_id");
        assert_eq!(steps[1].table, "tests_project");
    }

    #[test]
    fn test_self_referential_many_to_many_columns() {
        let schema = SchemaBundle::new()
            .with_entity(EntityDef::new("social", "Person"))
            .with_relation(RelationDef::many_to_many(
                "friends",
                "social.Person",
                "social.Person",
            ));

        let edges = edges_of(&schema, "social.Person");
        let through = edges[0].through.as_ref().unwrap();
        assert_eq!(through.table, "social_person_friends");
        assert_eq!(through.source_column, "from_person_id");
        assert_eq!(through.target_column, "to_person_id");
        assert_eq!(edges[1].accessor, "person");
    }

    #[test]
    fn test_join_type_display() {
        assert_eq!(JoinType::Inner.to_string(), "INNER JOIN");
        assert_eq!(JoinType::LeftOuter.to_string(), "LEFT OUTER JOIN");
    }
}
