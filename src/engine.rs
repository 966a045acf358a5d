//! The graph-to-SQL compiler.
//!
//! Pure and stateless: every call takes a full canvas snapshot and returns a
//! string, so the UI can re-run it on every gesture and diff the output.
mod alias;
mod filters;
mod join_planner;
mod rendering;


use crate::graph::{Connection, FilterClause, Graph, TableNode};
use alias::AliasMap;
use log::info;
use std::fmt::{Display, Formatter};

pub use rendering::EMPTY_GRAPH_PLACEHOLDER;

/// Compiles the current canvas state into a SELECT statement, or the
/// [`EMPTY_GRAPH_PLACEHOLDER`] sentinel when nothing is placed.
pub fn compile(graph: &Graph) -> String {
    compile_parts(graph.nodes(), graph.connections(), graph.filters())
}

/// Same as [`compile`], for callers that hold the pieces separately.
pub fn compile_parts(
    nodes: &[TableNode],
    connections: &[Connection],
    filters: &[FilterClause],
) -> String {
    info!(
        "Compiling {} tables, {} connections, {} filters",
        nodes.len(),
        connections.len(),
        filters.len(),
    );

    let aliases = AliasMap::resolve(nodes);

    let from = match join_planner::plan(nodes, connections, &aliases) {
        Some(from) => from,
        None => return EMPTY_GRAPH_PLACEHOLDER.to_string(),
    };

    let query = SelectQuery {
        select: select_all_columns(nodes, &aliases),
        from,
        filters: filters::compile_filters(filters),
    };

    rendering::render_query(query)
}

/// The canvas selects every column of every placed table, in node order then
/// column order. The select list stays a plain parameter so a column-toggle
/// UI can feed a narrower one through [`SelectQuery`] later.
fn select_all_columns(nodes: &[TableNode], aliases: &AliasMap) -> Vec<QualifiedColumn> {
    nodes
        .iter()
        .flat_map(|node| {
            let alias = aliases.get(node.id).to_string();

            node.columns.iter().map(move |column| QualifiedColumn {
                table_alias: alias.clone(),
                column: column.name.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct SelectQuery {
    pub select: Vec<QualifiedColumn>,
    pub from: FromBlock,
    pub filters: Option<WhereBody>,
}

/// `alias.column`, as it appears in SELECT lists and ON conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QualifiedColumn {
    pub table_alias: String,
    pub column: String,
}

/// The ordered FROM/JOIN section: one anchor table plus one clause per
/// remaining table, exactly as the planner emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FromBlock {
    pub anchor: TableRef,
    pub joins: Vec<JoinClause>,
}

/// `Name AS alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableRef {
    pub table: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JoinClause {
    /// `JOIN target ON processed = incoming`; the processed side is whichever
    /// endpoint was already in the plan, not the drag direction.
    On {
        target: TableRef,
        processed: QualifiedColumn,
        incoming: QualifiedColumn,
    },
    /// Fallback for tables with no path to the anchor.
    Cross { target: TableRef },
}

/// Rendered WHERE body, without the `WHERE` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WhereBody(pub String);

impl Display for QualifiedColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table_alias, self.column)
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} AS {}", self.table, self.alias)
    }
}

impl Display for WhereBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
