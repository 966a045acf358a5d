//! Orders the FROM/JOIN section of the compiled query.
use crate::engine::alias::AliasMap;
use crate::engine::{FromBlock, JoinClause, QualifiedColumn, TableRef};
use crate::graph::{Connection, Endpoint, NodeId, TableNode};
use log::{debug, info};
use std::collections::HashSet;

/// Produces the FROM anchor plus one JOIN or CROSS JOIN clause for every
/// other placed table. Returns `None` for an empty canvas.
///
/// The clause order is a compatibility contract, not a free choice:
///  - the first placed table anchors the FROM clause;
///  - the remaining connections are scanned last-added first, over and over,
///    consuming any connection with exactly one endpoint already in the plan
///    until a full pass consumes nothing;
///  - tables still unreached after convergence get CROSS JOIN clauses in
///    placement order.
///
/// Downstream diffing relies on this exact ordering, so changing it changes
/// every generated query.
pub(crate) fn plan(
    nodes: &[TableNode],
    connections: &[Connection],
    aliases: &AliasMap,
) -> Option<FromBlock> {
    let anchor = nodes.first()?;

    info!(
        "Planning joins from '{}' across {} connections",
        anchor.name,
        connections.len(),
    );

    let mut processed: HashSet<NodeId> = HashSet::new();
    processed.insert(anchor.id);

    let mut remaining: Vec<&Connection> = connections
        .iter()
        .filter(|connection| is_usable(connection, nodes))
        .collect();

    let mut joins = Vec::new();

    loop {
        let mut progress = false;

        // Last-added connection first; consumed entries are spliced out so
        // later passes only see what is still open.
        let mut index = remaining.len();
        while index > 0 {
            index -= 1;
            let connection = remaining[index];

            let from_done = processed.contains(&connection.from.node);
            let to_done = processed.contains(&connection.to.node);

            match (from_done, to_done) {
                // Redundant edge: both tables already joined, nothing to emit.
                (true, true) => {
                    remaining.remove(index);
                }
                (false, false) => {}
                _ => {
                    let (done, incoming) = if from_done {
                        (&connection.from, &connection.to)
                    } else {
                        (&connection.to, &connection.from)
                    };

                    // is_usable resolved both endpoints before the scan, but
                    // degrade to dropping the edge rather than panicking.
                    let Some(target) = node_by_id(nodes, incoming.node) else {
                        remaining.remove(index);
                        continue;
                    };

                    joins.push(JoinClause::On {
                        target: table_ref(target, aliases),
                        processed: qualified(done, aliases),
                        incoming: qualified(incoming, aliases),
                    });

                    processed.insert(incoming.node);
                    remaining.remove(index);
                    progress = true;
                }
            }
        }

        if !progress {
            break;
        }
    }

    // Disconnected subgraphs still have to show up exactly once.
    for node in nodes {
        if processed.insert(node.id) {
            debug!("No join path to '{}', falling back to CROSS JOIN", node.name);

            joins.push(JoinClause::Cross {
                target: table_ref(node, aliases),
            });
        }
    }

    Some(FromBlock {
        anchor: table_ref(anchor, aliases),
        joins,
    })
}

/// Edges pointing at removed tables or columns, and self-edges, are dropped
/// up front: one bad edge must never block compiling the rest of the graph.
fn is_usable(connection: &Connection, nodes: &[TableNode]) -> bool {
    if connection.from.node == connection.to.node {
        debug!("Dropping self-referencing connection {}", connection.id);
        return false;
    }

    let intact = endpoint_exists(&connection.from, nodes) && endpoint_exists(&connection.to, nodes);

    if !intact {
        debug!("Dropping dangling connection {}", connection.id);
    }

    intact
}

fn endpoint_exists(endpoint: &Endpoint, nodes: &[TableNode]) -> bool {
    node_by_id(nodes, endpoint.node)
        .map(|node| node.column(&endpoint.column).is_some())
        .unwrap_or(false)
}

fn node_by_id(nodes: &[TableNode], id: NodeId) -> Option<&TableNode> {
    nodes.iter().find(|node| node.id == id)
}

fn table_ref(node: &TableNode, aliases: &AliasMap) -> TableRef {
    TableRef {
        table: node.name.clone(),
        alias: aliases.get(node.id).to_string(),
    }
}

fn qualified(endpoint: &Endpoint, aliases: &AliasMap) -> QualifiedColumn {
    QualifiedColumn {
        table_alias: aliases.get(endpoint.node).to_string(),
        column: endpoint.column.clone(),
    }
}
