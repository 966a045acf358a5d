//! The canvas graph store.
//!
//! Holds everything the user has placed on the canvas: table nodes, the
//! column-to-column connections drawn between them, and the filter rows from
//! the side panel. Node order is first class — it is a `Vec`, not a map —
//! because the compiler's FROM anchor and alias numbering both depend on
//! insertion order.
use crate::error::Error;
use crate::schema::{ColumnSchema, TableSchema};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub primary_key: bool,
}

/// One placed instance of a database table. The same table can be placed
/// twice; each placement gets its own node id and alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableNode {
    pub id: NodeId,
    pub name: String,
    /// User override; `None` means the compiler generates one.
    pub alias: Option<String>,
    pub columns: Vec<Column>,
}

impl TableNode {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// One end of a drawn connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub column: String,
}

impl Endpoint {
    pub fn new(node: NodeId, column: impl Into<String>) -> Self {
        Endpoint {
            node,
            column: column.into(),
        }
    }
}

/// A user-drawn edge between two tables' columns.
///
/// The from/to direction records which way the user dragged; joins are
/// symmetric, so the compiler only uses it to decide ON-clause column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn touches(&self, node: NodeId) -> bool {
        self.from.node == node || self.to.node == node
    }

    fn anchored_on(&self, node: NodeId, column: &str) -> bool {
        (self.from.node == node && self.from.column == column)
            || (self.to.node == node && self.to.column == column)
    }

    /// Same unordered endpoint pair, ignoring drag direction.
    fn links_same_columns(&self, from: &Endpoint, to: &Endpoint) -> bool {
        (self.from == *from && self.to == *to) || (self.from == *to && self.to == *from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One row of the filter panel. Column and operator are kept as the raw UI
/// text because half-filled rows are normal while the user is typing; the
/// compiler skips anything incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub column: String,
    pub operator: String,
    pub value: String,
    /// Ignored for the first surviving clause.
    pub connector: Connector,
}

/// The full canvas state, and the sole input to [`crate::compile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<TableNode>,
    connections: Vec<Connection>,
    filters: Vec<FilterClause>,
    next_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn nodes(&self) -> &[TableNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn filters(&self) -> &[FilterClause] {
        &self.filters
    }

    /// Drop gesture: copies the descriptor onto the canvas.
    pub fn place_table(&mut self, schema: &TableSchema) -> NodeId {
        let id = NodeId(self.next_id());

        debug!("Placing table '{}' as node {id}", schema.table_name);

        self.nodes.push(TableNode {
            id,
            name: schema.table_name.clone(),
            alias: None,
            columns: schema.columns.iter().map(Column::from).collect(),
        });

        id
    }

    /// Removes a node and cascades to every connection touching it.
    pub fn remove_table(&mut self, node: NodeId) {
        self.nodes.retain(|table| table.id != node);
        self.connections.retain(|connection| !connection.touches(node));
    }

    pub fn set_alias(&mut self, node: NodeId, alias: Option<String>) -> Result<(), Error> {
        self.node_mut(node)?.alias = alias;

        Ok(())
    }

    pub fn add_column(&mut self, node: NodeId, column: &ColumnSchema) -> Result<(), Error> {
        self.node_mut(node)?.columns.push(Column::from(column));

        Ok(())
    }

    /// Removes a column and cascades to every connection anchored on it.
    pub fn remove_column(&mut self, node: NodeId, column: &str) -> Result<(), Error> {
        let table = self.node_mut(node)?;
        table.columns.retain(|existing| existing.name != column);

        self.connections
            .retain(|connection| !connection.anchored_on(node, column));

        Ok(())
    }

    /// Connect gesture. Both endpoints must exist, the endpoints must sit on
    /// different nodes, and the unordered pair must not already be linked.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<ConnectionId, Error> {
        if from.node == to.node {
            return Err(Error::SelfConnection(from.node));
        }

        self.require_column(&from)?;
        self.require_column(&to)?;

        if let Some(existing) = self
            .connections
            .iter()
            .find(|connection| connection.links_same_columns(&from, &to))
        {
            return Err(Error::DuplicateConnection {
                existing: existing.id,
            });
        }

        let id = ConnectionId(self.next_id());

        debug!(
            "Connecting {from_node}.{from_column} -> {to_node}.{to_column}",
            from_node = from.node,
            from_column = from.column,
            to_node = to.node,
            to_column = to.column,
        );

        self.connections.push(Connection { id, from, to });

        Ok(id)
    }

    pub fn disconnect(&mut self, connection: ConnectionId) {
        self.connections.retain(|existing| existing.id != connection);
    }

    pub fn add_filter(&mut self, filter: FilterClause) {
        self.filters.push(filter);
    }

    pub fn set_filters(&mut self, filters: Vec<FilterClause>) {
        self.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut TableNode, Error> {
        self.nodes
            .iter_mut()
            .find(|table| table.id == node)
            .ok_or(Error::NodeNotFound(node))
    }

    fn require_column(&self, endpoint: &Endpoint) -> Result<(), Error> {
        let table = self
            .nodes
            .iter()
            .find(|table| table.id == endpoint.node)
            .ok_or(Error::NodeNotFound(endpoint.node))?;

        match table.column(&endpoint.column) {
            Some(_) => Ok(()),
            None => Err(Error::ColumnNotFound {
                node: endpoint.node,
                column: endpoint.column.clone(),
            }),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl From<&ColumnSchema> for Column {
    fn from(schema: &ColumnSchema) -> Self {
        Column {
            name: schema.name.clone(),
            column_type: schema.column_type.clone(),
            primary_key: schema.is_primary_key,
        }
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::TableSchema;

    #[test]
    fn placing_copies_the_descriptor() {
        let mut graph = Graph::new();

        let users = graph.place_table(&users_schema());

        let node = &graph.nodes()[0];
        assert_eq!(node.id, users);
        assert_eq!(node.name, "Users");
        assert_eq!(node.alias, None);
        assert!(node.column("id").unwrap().primary_key);
        assert!(!node.column("name").unwrap().primary_key);
    }

    #[test]
    fn self_connections_are_rejected() {
        let mut graph = Graph::new();
        let users = graph.place_table(&users_schema());

        let result = graph.connect(
            Endpoint::new(users, "id"),
            Endpoint::new(users, "name"),
        );

        assert_eq!(result, Err(Error::SelfConnection(users)));
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn duplicate_and_reverse_duplicate_connections_are_rejected() {
        let mut graph = Graph::new();
        let users = graph.place_table(&users_schema());
        let orders = graph.place_table(&orders_schema());

        let first = graph
            .connect(Endpoint::new(users, "id"), Endpoint::new(orders, "user_id"))
            .unwrap();

        let duplicate = graph.connect(
            Endpoint::new(users, "id"),
            Endpoint::new(orders, "user_id"),
        );
        let reversed = graph.connect(
            Endpoint::new(orders, "user_id"),
            Endpoint::new(users, "id"),
        );

        assert_eq!(duplicate, Err(Error::DuplicateConnection { existing: first }));
        assert_eq!(reversed, Err(Error::DuplicateConnection { existing: first }));
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn connections_must_reference_existing_columns() {
        let mut graph = Graph::new();
        let users = graph.place_table(&users_schema());
        let orders = graph.place_table(&orders_schema());

        let result = graph.connect(
            Endpoint::new(users, "no_such_column"),
            Endpoint::new(orders, "user_id"),
        );

        assert_eq!(
            result,
            Err(Error::ColumnNotFound {
                node: users,
                column: "no_such_column".to_string()
            })
        );
    }

    #[test]
    fn removing_a_table_cascades_to_its_connections() {
        let mut graph = Graph::new();
        let users = graph.place_table(&users_schema());
        let orders = graph.place_table(&orders_schema());
        graph
            .connect(Endpoint::new(users, "id"), Endpoint::new(orders, "user_id"))
            .unwrap();

        graph.remove_table(orders);

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn removing_a_column_cascades_to_connections_anchored_on_it() {
        let mut graph = Graph::new();
        let users = graph.place_table(&users_schema());
        let orders = graph.place_table(&orders_schema());
        graph
            .connect(Endpoint::new(users, "id"), Endpoint::new(orders, "user_id"))
            .unwrap();

        graph.remove_column(orders, "user_id").unwrap();

        assert!(graph.connections().is_empty());
        assert!(graph.nodes()[1].column("user_id").is_none());
    }

    #[test]
    fn node_ids_are_not_reused_after_removal() {
        let mut graph = Graph::new();
        let first = graph.place_table(&users_schema());
        graph.remove_table(first);

        let second = graph.place_table(&users_schema());

        assert_ne!(first, second);
    }

    pub(crate) fn users_schema() -> TableSchema {
        table("Users", &[("id", true), ("name", false)])
    }

    pub(crate) fn orders_schema() -> TableSchema {
        table("Orders", &[("id", true), ("user_id", false)])
    }

    pub(crate) fn table(name: &str, columns: &[(&str, bool)]) -> TableSchema {
        TableSchema {
            table_name: name.to_string(),
            columns: columns
                .iter()
                .map(|(column, primary_key)| ColumnSchema {
                    name: column.to_string(),
                    column_type: "INT".to_string(),
                    is_primary_key: *primary_key,
                })
                .collect(),
        }
    }
}
