//! Turns the planned query into the final SQL text.
use crate::engine::{FromBlock, JoinClause, SelectQuery};
use std::fmt::{Display, Formatter};

/// What the display sink gets when nothing is on the canvas. A SQL comment,
/// so sinks that always render can still show it, and exported so callers
/// can tell it apart from a real statement without string sniffing.
pub const EMPTY_GRAPH_PLACEHOLDER: &str = "-- no tables placed yet";

pub(crate) fn render_query(query: SelectQuery) -> String {
    format!("{};", query)
}

impl Display for SelectQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some((last, rest)) = self.select.split_last() {
            writeln!(f, "SELECT")?;

            for column in rest {
                writeln!(f, "  {column},")?;
            }

            writeln!(f, "  {last}")?;
        } else {
            // A canvas full of zero-column tables still compiles.
            writeln!(f, "SELECT *")?;
        }

        write!(f, "{}", self.from)?;

        if let Some(filters) = &self.filters {
            write!(f, "\nWHERE {filters}")?;
        }

        Ok(())
    }
}

impl Display for FromBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FROM {}", self.anchor)?;

        for join in &self.joins {
            write!(f, "\n{join}")?;
        }

        Ok(())
    }
}

impl Display for JoinClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinClause::On {
                target,
                processed,
                incoming,
            } => {
                write!(f, "JOIN {target} ON {processed} = {incoming}")
            }
            JoinClause::Cross { target } => write!(f, "CROSS JOIN {target}"),
        }
    }
}
