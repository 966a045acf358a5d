//! Table alias resolution.
use crate::graph::{NodeId, TableNode};
use std::collections::HashMap;

/// Node id → alias, recomputed from scratch on every compilation.
///
/// User-set aliases are taken verbatim. Generated ones are the table name's
/// first letter, lowercased, plus the one-based canvas position (`Users` at
/// position 0 → `u1`), so defaults are always distinct within one pass.
#[derive(Debug)]
pub(crate) struct AliasMap {
    aliases: HashMap<NodeId, String>,
}

impl AliasMap {
    pub fn resolve(nodes: &[TableNode]) -> AliasMap {
        let aliases = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| {
                let alias = match &node.alias {
                    Some(user_alias) => user_alias.clone(),
                    None => default_alias(&node.name, position),
                };

                (node.id, alias)
            })
            .collect();

        AliasMap { aliases }
    }

    pub fn get(&self, node: NodeId) -> &str {
        // Every placed node was resolved up front; an unknown id can only
        // come from a dangling edge, which the planner drops before asking.
        self.aliases.get(&node).map(String::as_str).unwrap_or("")
    }
}

fn default_alias(table_name: &str, position: usize) -> String {
    let mut alias = String::new();

    match table_name.chars().next() {
        Some(first_letter) => alias.extend(first_letter.to_lowercase()),
        None => alias.push('t'),
    }

    alias.push_str(&(position + 1).to_string());

    alias
}
